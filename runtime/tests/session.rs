use std::num::NonZeroU32;

use loopsnake_core::{CellCoord, Command, ConfigurationError, GridSize, SimulationConfig};
use loopsnake_runtime::{Session, TickReport};
use loopsnake_system_autopilot::{Autopilot, Config as AutopilotConfig};
use loopsnake_system_provisioning::{Config as ProvisioningConfig, Provisioning};
use loopsnake_world::{self as world, query, World};

fn target(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).expect("food target must be non-zero")
}

fn session_on(width: u32, height: u32, food_target: u32, seed: u64) -> Session {
    let config = SimulationConfig::new(GridSize::new(width, height), target(food_target));
    Session::seeded(config, seed).expect("test grid should be traversable")
}

#[test]
fn construction_meets_the_configured_target() {
    let session = session_on(6, 6, 3, 5);

    assert_eq!(session.seed(), 5, "the session should keep its seed");
    assert_eq!(session.tick_index().get(), 0, "construction should not consume a tick");
    assert_eq!(session.snake().len(), 4, "the snake should start at seed length");
    assert_eq!(
        session.foods().len(),
        3,
        "construction should provision up to the configured target"
    );
}

#[test]
fn hostile_grids_are_refused_at_construction() {
    let config = SimulationConfig::new(GridSize::new(4, 5), target(1));

    assert_eq!(
        Session::seeded(config, 1).err(),
        Some(ConfigurationError::OddHeight { height: 5 }),
        "an odd row count cannot host the traversal loop"
    );
}

#[test]
fn first_tick_harvests_an_adjacent_pellet() {
    let config = SimulationConfig::new(GridSize::new(4, 4), target(1));
    let mut world = World::new(config).expect("4x4 grid should be traversable");
    let mut autopilot = Autopilot::new(AutopilotConfig::default());
    let mut provisioning = Provisioning::new(ProvisioningConfig::new(7));
    let pellet = CellCoord::new(1, 0);

    let mut events = Vec::new();
    world::apply(&mut world, Command::PlaceFood { cell: pellet }, &mut events);
    events.clear();
    world::apply(&mut world, Command::Tick, &mut events);

    loop {
        let mut commands = Vec::new();
        {
            let snake = query::snake_view(&world);
            let foods = query::food_view(&world);
            let occupancy = query::occupancy_view(&world);
            let cycle = query::cycle_view(&world);
            let food_target = query::food_target(&world);
            autopilot.handle(&events, &snake, &foods, &cycle, food_target, &mut commands);
            provisioning.handle(&events, &foods, occupancy, &cycle, food_target, &mut commands);
        }
        if commands.is_empty() {
            break;
        }
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    let snake = query::snake_view(&world);
    assert_eq!(snake.head(), Some(pellet), "the head should land on the pellet");
    assert_eq!(snake.len(), 5, "the meal should grow the snake by one segment");
    assert_eq!(query::last_meal(&world), Some(pellet), "the meal should be on record");

    let foods = query::food_view(&world);
    assert_eq!(foods.len(), 1, "provisioning should replace the eaten pellet");
    let replacement = foods.cells()[0];
    assert!(
        !snake.contains(replacement),
        "the replacement pellet should land on a free cell"
    );
}

#[test]
fn raising_the_target_fills_the_playfield_in_one_resync() {
    let mut session = session_on(8, 8, 1, 21);
    assert_eq!(session.foods().len(), 1);

    session.set_food_target(target(3));

    let foods = session.foods();
    assert_eq!(foods.len(), 3, "one resync should reach the new target");
    assert_eq!(session.food_target(), target(3));

    let snake = session.snake();
    for &cell in foods.cells() {
        assert!(!snake.contains(cell), "pellets should avoid the snake");
    }
    let mut distinct = foods.cells().to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), 3, "pellets should occupy distinct cells");
}

#[test]
fn lowering_the_target_trims_newer_pellets() {
    let mut session = session_on(8, 8, 4, 3);
    let before = session.foods();

    session.set_food_target(target(2));

    let after = session.foods();
    assert_eq!(after.len(), 2, "one resync should trim down to the new target");
    assert_eq!(
        after.cells(),
        &before.cells()[..2],
        "the oldest pellets should survive the trim"
    );
}

#[test]
fn plural_targets_keep_the_snake_on_the_loop() {
    let mut session = session_on(6, 6, 2, 9);
    let cells = session.cycle().cells().to_vec();
    let mut meals = 0;

    for step in 1..=40u64 {
        let report = session.tick();

        assert!(report.stepped, "loop following should never be refused");
        assert_eq!(report.tick, step);
        assert_eq!(
            report.head,
            cells[(step as usize) % cells.len()],
            "a plural target should keep the head on the loop"
        );

        if report.ate.is_some() {
            meals += 1;
        }
        assert_eq!(report.length, 4 + meals, "length should grow only by meals");
        assert_eq!(report.food_count, 2, "provisioning should hold the plural target");
    }
}

#[test]
fn equal_seeds_replay_identical_sessions() {
    let reports = |seed: u64| -> Vec<TickReport> {
        let config = SimulationConfig::new(GridSize::new(6, 6), target(1));
        let mut session = Session::seeded(config, seed).expect("6x6 grid should be traversable");
        (0..120).map(|_| session.tick()).collect()
    };

    assert_eq!(reports(77), reports(77), "equal seeds should replay identically");
    assert_ne!(reports(77), reports(78), "distinct seeds should diverge");
}

#[test]
fn entropy_construction_draws_distinct_seeds() {
    let config = SimulationConfig::new(GridSize::new(4, 4), target(1));

    let first = Session::new(config).expect("4x4 grid should be traversable");
    let second = Session::new(config).expect("4x4 grid should be traversable");

    assert_ne!(
        first.seed(),
        second.seed(),
        "entropy construction should draw a fresh seed per session"
    );
}

#[test]
fn long_hunting_runs_keep_the_snake_whole() {
    let mut session = session_on(10, 10, 1, 1234);
    let grid = session.grid();
    let mut meals = 0;

    for _ in 0..500 {
        let report = session.tick();

        if report.ate.is_some() {
            meals += 1;
        }
        assert_eq!(report.length, 4 + meals, "length should track meals exactly");
        assert_eq!(report.food_count, 1, "the pellet population should hold its target");

        let snake = session.snake();
        let mut seen = snake.segments().to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), snake.len(), "segments should never overlap");
        for &cell in snake.segments() {
            assert!(grid.contains(cell), "segments should stay on the playfield");
        }
    }

    assert!(meals > 0, "five hundred ticks should feed the snake at least once");
}
