use std::num::NonZeroU32;

use loopsnake_core::{CellCoord, Command, Direction, Event, GridSize, SimulationConfig};
use loopsnake_system_provisioning::{Config, Provisioning};
use loopsnake_world::{self as world, query, World};

fn new_world(width: u32, height: u32, food_target: u32) -> World {
    let config = SimulationConfig::new(
        GridSize::new(width, height),
        NonZeroU32::new(food_target).expect("non-zero target"),
    );
    World::new(config).expect("valid configuration")
}

fn target(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).expect("non-zero target")
}

/// Feeds events to the provisioning system and applies the commands it emits
/// until the pellet population stops changing.
fn pump_provisioning(world: &mut World, provisioning: &mut Provisioning, mut events: Vec<Event>) {
    loop {
        let mut commands = Vec::new();
        {
            let foods = query::food_view(world);
            let occupancy = query::occupancy_view(world);
            let cycle = query::cycle_view(world);
            provisioning.handle(
                &events,
                &foods,
                occupancy,
                &cycle,
                query::food_target(world),
                &mut commands,
            );
        }
        if commands.is_empty() {
            break;
        }

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}

#[test]
fn target_change_resyncs_in_one_round() {
    let mut world = new_world(8, 8, 1);
    let mut provisioning = Provisioning::new(Config::new(0xFEED));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetFoodTarget { target: target(3) },
        &mut events,
    );
    pump_provisioning(&mut world, &mut provisioning, events);

    let foods = query::food_view(&world);
    assert_eq!(foods.len(), 3);
    let snake = query::snake_view(&world);
    for cell in foods.iter() {
        assert!(!snake.contains(cell), "pellet {cell:?} overlaps the snake");
    }
}

#[test]
fn eaten_pellet_is_replaced() {
    let mut world = new_world(4, 4, 1);
    let mut provisioning = Provisioning::new(Config::new(0xFEED));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceFood {
            cell: CellCoord::new(1, 0),
        },
        &mut events,
    );
    events.clear();
    world::apply(
        &mut world,
        Command::StepSnake {
            direction: Direction::East,
        },
        &mut events,
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::FoodEaten { .. })));

    pump_provisioning(&mut world, &mut provisioning, events);

    let foods = query::food_view(&world);
    assert_eq!(foods.len(), 1);
    assert!(!foods.contains(CellCoord::new(1, 0)));
    assert!(!query::snake_view(&world).contains(foods.cells()[0]));
}

#[test]
fn shrinking_the_target_trims_to_the_oldest_pellets() {
    let mut world = new_world(8, 8, 1);
    let mut provisioning = Provisioning::new(Config::new(0xFEED));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetFoodTarget { target: target(4) },
        &mut events,
    );
    pump_provisioning(&mut world, &mut provisioning, events);
    let before = query::food_view(&world);
    assert_eq!(before.len(), 4);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetFoodTarget { target: target(2) },
        &mut events,
    );
    pump_provisioning(&mut world, &mut provisioning, events);

    let after = query::food_view(&world);
    assert_eq!(after.len(), 2);
    assert_eq!(after.cells(), &before.cells()[..2]);
}

#[test]
fn exhaustion_leaves_the_population_short() {
    let mut world = new_world(4, 4, 1);
    let mut provisioning = Provisioning::new(Config::new(0xFEED));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetFoodTarget { target: target(20) },
        &mut events,
    );
    pump_provisioning(&mut world, &mut provisioning, events);

    // Twelve cells remain after the four-segment snake.
    assert_eq!(query::food_view(&world).len(), 12);
}

#[test]
fn identical_seeds_replay_identical_runs() {
    let script = |seed: u64| {
        let mut world = new_world(6, 6, 1);
        let mut provisioning = Provisioning::new(Config::new(seed));

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetFoodTarget { target: target(5) },
            &mut events,
        );
        pump_provisioning(&mut world, &mut provisioning, events);
        let filled = query::food_view(&world).into_vec();

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetFoodTarget { target: target(2) },
            &mut events,
        );
        pump_provisioning(&mut world, &mut provisioning, events);

        (filled, query::food_view(&world).into_vec())
    };

    assert_eq!(script(42), script(42));
    assert_ne!(script(42), script(43));
}
