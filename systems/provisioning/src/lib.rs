#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic provisioning system that keeps the pellet population on target.

use std::cmp::Ordering;
use std::num::NonZeroU32;

use loopsnake_core::{CellCoord, Command, CycleView, Event, FoodView, OccupancyView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the provisioning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided draw seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that refills or trims the pellet population after each change.
#[derive(Debug)]
pub struct Provisioning {
    rng: ChaCha8Rng,
    pool: Vec<CellCoord>,
}

impl Provisioning {
    /// Creates a new provisioning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            pool: Vec::new(),
        }
    }

    /// Consumes events and immutable views to emit pellet commands.
    ///
    /// A resync triggers on [`Event::FoodEaten`] and
    /// [`Event::FoodTargetChanged`]. Surplus pellets are removed newest
    /// first; a deficit is filled with uniform draws from the free cells
    /// gathered in traversal-loop order, stopping early once the playfield
    /// runs dry.
    pub fn handle(
        &mut self,
        events: &[Event],
        foods: &FoodView,
        occupancy: OccupancyView<'_>,
        cycle: &CycleView<'_>,
        food_target: NonZeroU32,
        out: &mut Vec<Command>,
    ) {
        let resync_needed = events.iter().any(|event| {
            matches!(
                event,
                Event::FoodEaten { .. } | Event::FoodTargetChanged { .. }
            )
        });
        if !resync_needed {
            return;
        }

        let target = usize::try_from(food_target.get()).unwrap_or(usize::MAX);
        let population = foods.len();

        match population.cmp(&target) {
            Ordering::Equal => {}
            Ordering::Greater => {
                let surplus = population - target;
                for &cell in foods.cells().iter().rev().take(surplus) {
                    out.push(Command::RemoveFood { cell });
                }
            }
            Ordering::Less => {
                self.pool.clear();
                for &cell in cycle.cells() {
                    if occupancy.is_free(cell) {
                        self.pool.push(cell);
                    }
                }

                let deficit = target - population;
                for _ in 0..deficit {
                    if self.pool.is_empty() {
                        break;
                    }
                    let index = self.rng.gen_range(0..self.pool.len());
                    let cell = self.pool.swap_remove(index);
                    out.push(Command::PlaceFood { cell });
                }
            }
        }
    }
}
