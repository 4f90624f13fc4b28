#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session façade that drives a complete Loopsnake simulation.
//!
//! A [`Session`] owns the authoritative world together with the autopilot and
//! provisioning systems and pumps the command/event loop between them: each
//! seed command is applied to the world, the resulting events are offered to
//! every system, and the commands the systems emit are applied in turn until
//! the batch quiesces. Calls return only once the simulation is at rest, so
//! callers observe whole ticks and whole resyncs, never intermediate states.

use std::num::NonZeroU32;

use loopsnake_core::{
    CellCoord, Command, ConfigurationError, CycleView, Event, FoodView, GridSize,
    SimulationConfig, SnakeView, TickIndex,
};
use loopsnake_system_autopilot::{Autopilot, Config as AutopilotConfig};
use loopsnake_system_provisioning::{Config as ProvisioningConfig, Provisioning};
use loopsnake_world::{self as world, query, World};

/// Owns the world and the systems, advancing the simulation one tick at a time.
#[derive(Debug)]
pub struct Session {
    world: World,
    autopilot: Autopilot,
    provisioning: Provisioning,
    seed: u64,
}

/// Summary of a single simulation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Ordinal of the completed tick.
    pub tick: u64,
    /// Cell occupied by the snake's head once the tick settled.
    pub head: CellCoord,
    /// Number of cells the snake occupies.
    pub length: usize,
    /// Cell of the pellet consumed this tick, if any.
    pub ate: Option<CellCoord>,
    /// Number of pellets in play once provisioning settled.
    pub food_count: usize,
    /// Indicates whether the snake advanced; a refused step leaves it parked.
    pub stepped: bool,
}

impl Session {
    /// Creates a session with a fresh entropy seed.
    ///
    /// Returns a [`ConfigurationError`] when the grid cannot host the
    /// traversal loop.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        Self::seeded(config, rand::random())
    }

    /// Creates a session whose pellet draws replay deterministically.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, ConfigurationError> {
        Self::with_planner(config, seed, AutopilotConfig::default())
    }

    /// Creates a session with explicit planner tuning.
    pub fn with_planner(
        config: SimulationConfig,
        seed: u64,
        planner: AutopilotConfig,
    ) -> Result<Self, ConfigurationError> {
        let world = World::new(config)?;
        let mut session = Self {
            world,
            autopilot: Autopilot::new(planner),
            provisioning: Provisioning::new(ProvisioningConfig::new(seed)),
            seed,
        };

        // Announcing the configured target seeds the pellet population before
        // the first tick.
        let _ = session.pump(Command::SetFoodTarget {
            target: config.food_target(),
        });
        Ok(session)
    }

    /// Advances the simulation by exactly one tick and reports the outcome.
    pub fn tick(&mut self) -> TickReport {
        let events = self.pump(Command::Tick);

        let mut ate = None;
        let mut stepped = false;
        for event in &events {
            match event {
                Event::FoodEaten { cell } => ate = Some(*cell),
                Event::SnakeAdvanced { .. } => stepped = true,
                _ => {}
            }
        }

        let snake = query::snake_view(&self.world);
        TickReport {
            tick: query::tick_index(&self.world).get(),
            head: snake.head().unwrap_or(CellCoord::new(0, 0)),
            length: snake.len(),
            ate,
            food_count: query::food_view(&self.world).len(),
            stepped,
        }
    }

    /// Adopts a new pellet population target and resyncs to it immediately.
    pub fn set_food_target(&mut self, target: NonZeroU32) {
        let _ = self.pump(Command::SetFoodTarget { target });
    }

    /// Seed driving the session's pellet draws.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Banner adapters may display when the session boots.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Dimensions of the playfield.
    #[must_use]
    pub fn grid(&self) -> GridSize {
        query::grid(&self.world)
    }

    /// Read-only snapshot of the snake, head first.
    #[must_use]
    pub fn snake(&self) -> SnakeView {
        query::snake_view(&self.world)
    }

    /// Read-only snapshot of the pellets in placement order.
    #[must_use]
    pub fn foods(&self) -> FoodView {
        query::food_view(&self.world)
    }

    /// Read-only view of the traversal loop the autopilot falls back to.
    #[must_use]
    pub fn cycle(&self) -> CycleView<'_> {
        query::cycle_view(&self.world)
    }

    /// Pellet population target currently in force.
    #[must_use]
    pub fn food_target(&self) -> NonZeroU32 {
        query::food_target(&self.world)
    }

    /// Ordinal of the most recently completed tick.
    #[must_use]
    pub fn tick_index(&self) -> TickIndex {
        query::tick_index(&self.world)
    }

    /// Cell of the pellet consumed during the current tick, if any.
    #[must_use]
    pub fn last_meal(&self) -> Option<CellCoord> {
        query::last_meal(&self.world)
    }

    /// Applies the seed command and cycles events through the systems until
    /// no further commands are produced, returning every event observed.
    fn pump(&mut self, command: Command) -> Vec<Event> {
        let mut history = Vec::new();
        let mut commands = vec![command];

        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            let mut next = Vec::new();
            {
                let snake = query::snake_view(&self.world);
                let foods = query::food_view(&self.world);
                let occupancy = query::occupancy_view(&self.world);
                let cycle = query::cycle_view(&self.world);
                let target = query::food_target(&self.world);
                self.autopilot
                    .handle(&events, &snake, &foods, &cycle, target, &mut next);
                self.provisioning
                    .handle(&events, &foods, occupancy, &cycle, target, &mut next);
            }

            history.extend(events);
            commands = next;
        }

        history
    }
}
