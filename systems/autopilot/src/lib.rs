#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic autoplay system that steers the snake without input.
//!
//! Every tick the planner emits exactly one step command. The default plan
//! follows the precomputed traversal loop, which is collision-free for any
//! snake length. When the hunting conditions hold the planner instead takes
//! the greedy neighbour that closes in on the nearest pellet, but only after
//! proving the move leaves the snake an escape route.

use std::num::NonZeroU32;

use loopsnake_core::{
    CellCoord, Command, CycleView, Direction, Event, FoodView, GridSize, SnakeView,
};

mod reachability;

use reachability::ReachabilityProbe;

/// Snake length at which the planner stops hunting by default.
const DEFAULT_ENGAGEMENT_CEILING: u32 = 50;

/// Tuning parameters for the autoplay planner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    engagement_ceiling: u32,
}

impl Config {
    /// Creates a configuration with an explicit engagement ceiling.
    #[must_use]
    pub const fn new(engagement_ceiling: u32) -> Self {
        Self { engagement_ceiling }
    }

    /// Snake length at which the planner abandons hunting and follows the
    /// traversal loop exclusively.
    #[must_use]
    pub const fn engagement_ceiling(&self) -> u32 {
        self.engagement_ceiling
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_ENGAGEMENT_CEILING)
    }
}

/// Pure system that reacts to world events and emits snake step commands.
#[derive(Debug, Default)]
pub struct Autopilot {
    config: Config,
    probe: ReachabilityProbe,
    candidates: Vec<CellCoord>,
    safe: Vec<CellCoord>,
    simulated: Vec<CellCoord>,
}

impl Autopilot {
    /// Creates an autopilot with the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Consumes world events and immutable views to emit one step command.
    ///
    /// The command is emitted only for batches containing
    /// [`Event::TimeAdvanced`], so replaying the same batch twice within a
    /// tick cannot double-step the snake.
    pub fn handle(
        &mut self,
        events: &[Event],
        snake: &SnakeView,
        foods: &FoodView,
        cycle: &CycleView<'_>,
        food_target: NonZeroU32,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let Some(head) = snake.head() else {
            return;
        };
        let Some(fallback) = cycle.successor_of(head) else {
            return;
        };

        let destination = self
            .hunt(head, snake, foods, cycle, food_target)
            .unwrap_or(fallback);

        if let Some(direction) = Direction::between(head, destination) {
            out.push(Command::StepSnake { direction });
        }
    }

    /// Plans a greedy step toward the nearest pellet, if hunting applies.
    ///
    /// Hunting requires at least one pellet in play, a snake below the
    /// engagement ceiling, and a food population target of exactly one. The
    /// surviving candidate that minimises pellet distance, then forward loop
    /// distance, wins.
    fn hunt(
        &mut self,
        head: CellCoord,
        snake: &SnakeView,
        foods: &FoodView,
        cycle: &CycleView<'_>,
        food_target: NonZeroU32,
    ) -> Option<CellCoord> {
        if foods.is_empty() || food_target.get() != 1 {
            return None;
        }
        let length = u32::try_from(snake.len()).unwrap_or(u32::MAX);
        if length >= self.config.engagement_ceiling {
            return None;
        }

        let target = nearest_pellet(head, foods)?;
        let grid = cycle.grid();
        let tail = snake.tail();

        self.candidates.clear();
        for neighbor in grid.neighbors(head) {
            if snake.contains(neighbor) && Some(neighbor) != tail {
                continue;
            }
            self.candidates.push(neighbor);
        }
        if self.candidates.is_empty() {
            return None;
        }

        self.safe.clear();
        for index in 0..self.candidates.len() {
            let candidate = self.candidates[index];
            if simulate_step_escape(
                &mut self.probe,
                &mut self.simulated,
                candidate,
                snake,
                foods,
                grid,
            ) {
                self.safe.push(candidate);
            }
        }

        // With no provably safe candidate the raw set stands in, which keeps
        // every tick total; the world still validates the resulting step.
        let pool = if self.safe.is_empty() {
            &self.candidates
        } else {
            &self.safe
        };

        let mut best: Option<Candidate> = None;
        for &cell in pool {
            let candidate = Candidate {
                cell,
                hunger: cell.manhattan_distance(target),
                loop_distance: cycle.forward_distance(head, cell)?,
            };
            best = Some(match best {
                None => candidate,
                Some(existing) => {
                    if candidate.is_better_than(existing) {
                        candidate
                    } else {
                        existing
                    }
                }
            });
        }

        best.map(|candidate| candidate.cell)
    }
}

/// Reports whether stepping the snake onto `candidate` leaves an escape open.
///
/// The step is simulated first: the candidate becomes the new head, and the
/// tail is shed unless the candidate holds a pellet. A simulation that folds
/// the snake onto itself fails outright; otherwise the simulated tail must
/// remain reachable from the new head with the rest of the simulated body
/// blocking the way.
#[must_use]
pub fn step_preserves_escape(
    candidate: CellCoord,
    snake: &SnakeView,
    foods: &FoodView,
    grid: GridSize,
) -> bool {
    let mut probe = ReachabilityProbe::default();
    let mut simulated = Vec::with_capacity(snake.len() + 1);
    simulate_step_escape(&mut probe, &mut simulated, candidate, snake, foods, grid)
}

fn simulate_step_escape(
    probe: &mut ReachabilityProbe,
    simulated: &mut Vec<CellCoord>,
    candidate: CellCoord,
    snake: &SnakeView,
    foods: &FoodView,
    grid: GridSize,
) -> bool {
    if !grid.contains(candidate) {
        return false;
    }

    let grows = foods.contains(candidate);
    simulated.clear();
    simulated.push(candidate);
    simulated.extend(snake.iter());
    if !grows {
        let _ = simulated.pop();
    }

    let Some(new_tail) = simulated.last().copied() else {
        return false;
    };
    if simulated[1..].contains(&candidate) {
        return false;
    }

    let blocked_len = simulated.len().saturating_sub(1);
    let blocked = &simulated[..blocked_len];

    probe.has_path(grid, candidate, new_tail, |cell| blocked.contains(&cell))
}

fn nearest_pellet(head: CellCoord, foods: &FoodView) -> Option<CellCoord> {
    let mut best: Option<(u32, CellCoord)> = None;
    for cell in foods.iter() {
        let distance = head.manhattan_distance(cell);
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, cell)),
        }
    }
    best.map(|(_, cell)| cell)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    cell: CellCoord,
    hunger: u32,
    loop_distance: u32,
}

impl Candidate {
    fn is_better_than(self, other: Candidate) -> bool {
        (self.hunger, self.loop_distance) < (other.hunger, other.loop_distance)
    }
}
