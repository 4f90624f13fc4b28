#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Loopsnake.

use std::collections::VecDeque;
use std::num::NonZeroU32;

use loopsnake_core::{
    CellCoord, Command, ConfigurationError, Direction, Event, GridSize, Occupant, PlacementError,
    SimulationConfig, StepError, TickIndex, WELCOME_BANNER,
};

mod cycle;

use cycle::HamiltonianCycle;

/// Number of segments the snake starts with.
const SEED_SNAKE_LENGTH: usize = 4;

/// Represents the authoritative Loopsnake world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridSize,
    cycle: HamiltonianCycle,
    snake: Snake,
    foods: FoodField,
    occupancy: OccupancyGrid,
    food_target: NonZeroU32,
    tick_index: TickIndex,
    last_meal: Option<CellCoord>,
}

impl World {
    /// Creates a new world ready for simulation.
    ///
    /// Validates the configuration, precomputes the traversal loop, and seeds
    /// the snake with its head on the loop origin and its body on the final
    /// loop cells. Returns a [`ConfigurationError`] when the grid cannot host
    /// the loop.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let grid = config.grid();
        let cycle = HamiltonianCycle::build(grid);
        let snake = Snake::seeded_on(&cycle);
        let mut occupancy = OccupancyGrid::new(grid);
        occupancy.seed_with(&snake);

        Ok(Self {
            banner: WELCOME_BANNER,
            grid,
            cycle,
            snake,
            foods: FoodField::default(),
            occupancy,
            food_target: config.food_target(),
            tick_index: TickIndex::default(),
            last_meal: None,
        })
    }

    fn step_snake(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(head) = self.snake.head() else {
            return;
        };

        let Some(next) = direction.step_from(head, self.grid) else {
            out_events.push(Event::SnakeStepRejected {
                direction,
                reason: StepError::OutOfBounds,
            });
            return;
        };

        let grows = self.foods.contains(next);
        let vacating_tail = !grows && self.snake.tail() == Some(next);
        if self.snake.occupies(next) && !vacating_tail {
            out_events.push(Event::SnakeStepRejected {
                direction,
                reason: StepError::SelfCollision,
            });
            return;
        }

        if grows {
            let removed = self.foods.remove(next);
            debug_assert!(removed);
            self.last_meal = Some(next);
        }

        let shed = self.snake.advance(next, grows);
        if let Some(tail) = shed {
            self.occupancy.set(tail, Occupant::Empty);
        }
        self.occupancy.set(next, Occupant::SnakeSegment);

        out_events.push(Event::SnakeAdvanced {
            from: head,
            to: next,
            grew: grows,
        });
        if grows {
            out_events.push(Event::FoodEaten { cell: next });
        }
    }

    fn place_food(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if !self.grid.contains(cell) {
            out_events.push(Event::FoodPlacementRejected {
                cell,
                reason: PlacementError::OutOfBounds,
            });
            return;
        }
        if !self.occupancy.is_free(cell) {
            out_events.push(Event::FoodPlacementRejected {
                cell,
                reason: PlacementError::Occupied,
            });
            return;
        }

        self.foods.place(cell);
        self.occupancy.set(cell, Occupant::Food);
        out_events.push(Event::FoodPlaced { cell });
    }

    fn remove_food(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.foods.remove(cell) {
            self.occupancy.set(cell, Occupant::Empty);
            out_events.push(Event::FoodRemoved { cell });
        } else {
            out_events.push(Event::FoodRemovalRejected { cell });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = TickIndex::new(world.tick_index.get().saturating_add(1));
            world.last_meal = None;
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::StepSnake { direction } => {
            world.step_snake(direction, out_events);
        }
        Command::PlaceFood { cell } => {
            world.place_food(cell, out_events);
        }
        Command::RemoveFood { cell } => {
            world.remove_food(cell, out_events);
        }
        Command::SetFoodTarget { target } => {
            world.food_target = target;
            out_events.push(Event::FoodTargetChanged { target });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::num::NonZeroU32;

    use super::World;
    use loopsnake_core::{
        CellCoord, CycleView, FoodView, GridSize, OccupancyView, SnakeView, TickIndex,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the playfield the world was configured with.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.grid
    }

    /// Captures a read-only snapshot of the snake, head first.
    #[must_use]
    pub fn snake_view(world: &World) -> SnakeView {
        SnakeView::from_segments(world.snake.segments().collect())
    }

    /// Captures a read-only snapshot of the food pellets in placement order.
    #[must_use]
    pub fn food_view(world: &World) -> FoodView {
        FoodView::from_cells(world.foods.cells().to_vec())
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView::new(world.occupancy.cells(), world.grid)
    }

    /// Exposes a read-only view of the precomputed traversal loop.
    #[must_use]
    pub fn cycle_view(world: &World) -> CycleView<'_> {
        world.cycle.view()
    }

    /// Number of food pellets the world currently keeps in play.
    #[must_use]
    pub fn food_target(world: &World) -> NonZeroU32 {
        world.food_target
    }

    /// Ordinal of the most recently started tick.
    #[must_use]
    pub fn tick_index(world: &World) -> TickIndex {
        world.tick_index
    }

    /// Cell of the pellet consumed during the current tick, if any.
    #[must_use]
    pub fn last_meal(world: &World) -> Option<CellCoord> {
        world.last_meal
    }
}

#[derive(Clone, Debug)]
struct Snake {
    segments: VecDeque<CellCoord>,
}

impl Snake {
    /// Seeds the snake with its head on the loop origin and its remaining
    /// segments on the final loop cells, directly behind the head in
    /// traversal order.
    fn seeded_on(cycle: &HamiltonianCycle) -> Self {
        let mut segments = VecDeque::with_capacity(SEED_SNAKE_LENGTH);
        if let Some(head) = cycle.cell_at(0) {
            segments.push_back(head);
        }
        for offset in 1..SEED_SNAKE_LENGTH {
            let Some(cell) = cycle
                .len()
                .checked_sub(offset)
                .and_then(|position| cycle.cell_at(position))
            else {
                break;
            };
            segments.push_back(cell);
        }
        Self { segments }
    }

    fn head(&self) -> Option<CellCoord> {
        self.segments.front().copied()
    }

    fn tail(&self) -> Option<CellCoord> {
        self.segments.back().copied()
    }

    fn occupies(&self, cell: CellCoord) -> bool {
        self.segments.contains(&cell)
    }

    /// Moves the head onto `to`, shedding and returning the tail cell unless
    /// the snake grows.
    fn advance(&mut self, to: CellCoord, grow: bool) -> Option<CellCoord> {
        let shed = if grow { None } else { self.segments.pop_back() };
        self.segments.push_front(to);
        shed
    }

    fn segments(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.segments.iter().copied()
    }
}

#[derive(Clone, Debug, Default)]
struct FoodField {
    cells: Vec<CellCoord>,
}

impl FoodField {
    fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    fn place(&mut self, cell: CellCoord) {
        self.cells.push(cell);
    }

    /// Removes the pellet at `cell`, preserving the placement order of the
    /// remaining pellets. Returns whether a pellet was present.
    fn remove(&mut self, cell: CellCoord) -> bool {
        match self.cells.iter().position(|candidate| *candidate == cell) {
            Some(position) => {
                let _ = self.cells.remove(position);
                true
            }
            None => false,
        }
    }

    fn cells(&self) -> &[CellCoord] {
        &self.cells
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    grid: GridSize,
    cells: Vec<Occupant>,
}

impl OccupancyGrid {
    fn new(grid: GridSize) -> Self {
        Self {
            grid,
            cells: vec![Occupant::Empty; grid.cell_count()],
        }
    }

    fn seed_with(&mut self, snake: &Snake) {
        self.cells.fill(Occupant::Empty);
        for cell in snake.segments() {
            self.set(cell, Occupant::SnakeSegment);
        }
    }

    fn is_free(&self, cell: CellCoord) -> bool {
        self.grid
            .index_of(cell)
            .and_then(|index| self.cells.get(index))
            .is_some_and(|occupant| *occupant == Occupant::Empty)
    }

    fn set(&mut self, cell: CellCoord, occupant: Occupant) {
        if let Some(index) = self.grid.index_of(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = occupant;
            }
        }
    }

    fn cells(&self) -> &[Occupant] {
        &self.cells
    }
}
