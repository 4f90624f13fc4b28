#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Loopsnake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::borrow::Cow;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Loopsnake.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by one tick.
    Tick,
    /// Requests that the snake advance a single step in the specified direction.
    StepSnake {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests placement of a food pellet on the provided cell.
    PlaceFood {
        /// Cell the pellet should occupy.
        cell: CellCoord,
    },
    /// Requests removal of the food pellet occupying the provided cell.
    RemoveFood {
        /// Cell whose pellet should be removed.
        cell: CellCoord,
    },
    /// Requests that the world adopt a new food population target.
    SetFoodTarget {
        /// Number of pellets the world should keep in play.
        target: NonZeroU32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Ordinal of the tick that just began.
        tick: TickIndex,
    },
    /// Confirms that the snake head moved between two cells.
    SnakeAdvanced {
        /// Cell the head occupied before moving.
        from: CellCoord,
        /// Cell the head occupies after completing the move.
        to: CellCoord,
        /// Indicates whether the snake grew instead of shedding its tail.
        grew: bool,
    },
    /// Confirms that the snake consumed a food pellet.
    FoodEaten {
        /// Cell the consumed pellet occupied.
        cell: CellCoord,
    },
    /// Confirms that a food pellet was placed into the world.
    FoodPlaced {
        /// Cell the new pellet occupies.
        cell: CellCoord,
    },
    /// Confirms that a food pellet was removed from the world.
    FoodRemoved {
        /// Cell the pellet occupied before removal.
        cell: CellCoord,
    },
    /// Announces that the world adopted a new food population target.
    FoodTargetChanged {
        /// Number of pellets the world now keeps in play.
        target: NonZeroU32,
    },
    /// Reports that a snake step request was rejected.
    SnakeStepRejected {
        /// Direction provided in the step request.
        direction: Direction,
        /// Specific reason the step failed.
        reason: StepError,
    },
    /// Reports that a food placement request was rejected.
    FoodPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a food removal request named a cell without a pellet.
    FoodRemovalRejected {
        /// Cell provided in the removal request.
        cell: CellCoord,
    },
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Determines the direction leading from one cell to an adjacent cell.
    ///
    /// Returns `None` when the cells are not orthogonal neighbours.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }

    /// Computes the cell one step from `cell` in this direction.
    ///
    /// Returns `None` when the step would leave the grid.
    #[must_use]
    pub fn step_from(self, cell: CellCoord, grid: GridSize) -> Option<CellCoord> {
        let next = match self {
            Self::North => {
                let row = cell.row().checked_sub(1)?;
                CellCoord::new(cell.column(), row)
            }
            Self::East => CellCoord::new(cell.column() + 1, cell.row()),
            Self::South => CellCoord::new(cell.column(), cell.row() + 1),
            Self::West => {
                let column = cell.column().checked_sub(1)?;
                CellCoord::new(column, cell.row())
            }
        };

        grid.contains(next).then_some(next)
    }
}

/// Ordinal of a simulation tick, starting from one for the first tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickIndex(u64);

impl TickIndex {
    /// Creates a new tick ordinal with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the ordinal.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Dimensions of the rectangular playfield measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new grid descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reports whether the provided cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Converts a cell into its row-major index within a dense grid buffer.
    ///
    /// Returns `None` when the cell lies outside the grid bounds.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    /// Iterates the orthogonal in-bounds neighbours of the provided cell.
    ///
    /// Neighbours are yielded in a fixed north, west, east, south order with
    /// no wraparound at the grid edges.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> NeighborIter {
        let mut neighbors = NeighborIter::default();

        if cell.row() > 0 {
            neighbors.push(CellCoord::new(cell.column(), cell.row() - 1));
        }
        if cell.column() > 0 {
            neighbors.push(CellCoord::new(cell.column() - 1, cell.row()));
        }
        if cell.column() + 1 < self.width {
            neighbors.push(CellCoord::new(cell.column() + 1, cell.row()));
        }
        if cell.row() + 1 < self.height {
            neighbors.push(CellCoord::new(cell.column(), cell.row() + 1));
        }

        neighbors
    }
}

/// Fixed-capacity iterator over the orthogonal neighbours of a cell.
#[derive(Clone, Debug, Default)]
pub struct NeighborIter {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// Contents of a single playfield cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// Nothing occupies the cell.
    #[default]
    Empty,
    /// A segment of the snake occupies the cell.
    SnakeSegment,
    /// A food pellet occupies the cell.
    Food,
}

/// Startup parameters for a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    grid: GridSize,
    food_target: NonZeroU32,
}

impl SimulationConfig {
    /// Creates a new configuration from a grid and a food population target.
    #[must_use]
    pub const fn new(grid: GridSize, food_target: NonZeroU32) -> Self {
        Self { grid, food_target }
    }

    /// Dimensions of the playfield.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Number of food pellets the world keeps in play.
    #[must_use]
    pub const fn food_target(&self) -> NonZeroU32 {
        self.food_target
    }

    /// Checks that the grid can host the traversal loop.
    ///
    /// The loop sweeps the interior columns row by row and returns along
    /// column zero, which requires at least two columns and an even, positive
    /// number of rows.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let width = self.grid.width();
        let height = self.grid.height();

        if width < 2 {
            return Err(ConfigurationError::NarrowWidth { width });
        }
        if height == 0 {
            return Err(ConfigurationError::ShortHeight { height });
        }
        if height % 2 != 0 {
            return Err(ConfigurationError::OddHeight { height });
        }

        Ok(())
    }
}

/// Reasons a simulation configuration may be rejected at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigurationError {
    /// The grid has fewer than the two columns the traversal loop requires.
    #[error("grid width {width} is too narrow; the traversal loop needs at least 2 columns")]
    NarrowWidth {
        /// Width provided in the rejected configuration.
        width: u32,
    },
    /// The grid has no rows at all.
    #[error("grid height {height} is too short; the traversal loop needs at least 2 rows")]
    ShortHeight {
        /// Height provided in the rejected configuration.
        height: u32,
    },
    /// The grid has an odd number of rows, which the traversal loop cannot close.
    #[error("grid height {height} is odd; the traversal loop needs an even number of rows")]
    OddHeight {
        /// Height provided in the rejected configuration.
        height: u32,
    },
}

/// Reasons a snake step request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepError {
    /// The step would carry the head beyond the grid bounds.
    OutOfBounds,
    /// The step would land on a snake segment that is not vacating this tick.
    SelfCollision,
}

/// Reasons a food placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies beyond the configured grid bounds.
    OutOfBounds,
    /// The requested cell is already occupied by the snake or another pellet.
    Occupied,
}

/// Read-only snapshot of the snake's segments.
///
/// Segments are ordered head first; consecutive segments occupy adjacent
/// cells and no cell appears twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnakeView {
    segments: Vec<CellCoord>,
}

impl SnakeView {
    /// Creates a new snake view from head-first segments.
    #[must_use]
    pub fn from_segments(segments: Vec<CellCoord>) -> Self {
        Self { segments }
    }

    /// Cell occupied by the snake's head.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.segments.first().copied()
    }

    /// Cell occupied by the snake's tail.
    #[must_use]
    pub fn tail(&self) -> Option<CellCoord> {
        self.segments.last().copied()
    }

    /// Number of cells the snake occupies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Reports whether the view captured no segments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in head-first order.
    #[must_use]
    pub fn segments(&self) -> &[CellCoord] {
        &self.segments
    }

    /// Iterator over the segments in head-first order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.segments.iter().copied()
    }

    /// Reports whether any segment occupies the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.segments.contains(&cell)
    }

    /// Consumes the view, yielding the underlying segments.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.segments
    }
}

/// Read-only snapshot of the food pellets in play.
///
/// Pellets are ordered by placement, oldest first, which fixes the iteration
/// order observed by systems.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FoodView {
    cells: Vec<CellCoord>,
}

impl FoodView {
    /// Creates a new food view from pellet cells in placement order.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Number of pellets in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no pellets are in play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pellet cells in placement order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Iterator over the pellet cells in placement order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Reports whether a pellet occupies the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Consumes the view, yielding the underlying pellet cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Occupant],
    grid: GridSize,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Occupant], grid: GridSize) -> Self {
        debug_assert_eq!(cells.len(), grid.cell_count());
        Self { cells, grid }
    }

    /// Returns the occupant of the provided cell.
    ///
    /// Returns `None` when the cell lies outside the grid bounds.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.grid
            .index_of(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell is empty and available for placement.
    ///
    /// Cells outside the grid bounds are never free.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.occupant(cell) == Some(Occupant::Empty)
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Occupant> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }
}

/// Read-only view of the precomputed traversal loop.
///
/// The loop visits every grid cell exactly once; consecutive cells, wrapping
/// from the final cell back to the first, are orthogonal neighbours.
#[derive(Clone, Debug)]
pub struct CycleView<'a> {
    cells: Cow<'a, [CellCoord]>,
    positions: Cow<'a, [u32]>,
    grid: GridSize,
}

impl<'a> CycleView<'a> {
    /// Captures a view backed by borrowed loop storage.
    ///
    /// `cells` lists the loop in traversal order; `positions` maps the
    /// row-major index of each cell back to its loop position.
    #[must_use]
    pub fn new(cells: &'a [CellCoord], positions: &'a [u32], grid: GridSize) -> Self {
        debug_assert_eq!(cells.len(), grid.cell_count());
        debug_assert_eq!(positions.len(), grid.cell_count());
        Self {
            cells: Cow::Borrowed(cells),
            positions: Cow::Borrowed(positions),
            grid,
        }
    }

    /// Builds a view that owns its loop storage.
    #[must_use]
    pub fn from_owned(cells: Vec<CellCoord>, positions: Vec<u32>, grid: GridSize) -> CycleView<'static> {
        debug_assert_eq!(cells.len(), grid.cell_count());
        debug_assert_eq!(positions.len(), grid.cell_count());
        CycleView {
            cells: Cow::Owned(cells),
            positions: Cow::Owned(positions),
            grid,
        }
    }

    /// Number of cells on the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the loop is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Loop cells in traversal order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Dimensions of the grid the loop covers.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Returns the cell at the provided loop position.
    #[must_use]
    pub fn cell_at(&self, position: u32) -> Option<CellCoord> {
        self.cells.get(usize::try_from(position).ok()?).copied()
    }

    /// Returns the loop position of the provided cell.
    ///
    /// Every in-bounds cell lies on the loop, so this fails only for cells
    /// outside the grid.
    #[must_use]
    pub fn position_of(&self, cell: CellCoord) -> Option<u32> {
        self.grid
            .index_of(cell)
            .and_then(|index| self.positions.get(index).copied())
    }

    /// Returns the cell that follows the provided cell on the loop.
    ///
    /// The loop wraps, so the final cell's successor is the first cell.
    #[must_use]
    pub fn successor_of(&self, cell: CellCoord) -> Option<CellCoord> {
        let position = self.position_of(cell)?;
        let length = u32::try_from(self.cells.len()).ok()?;
        let next = (position + 1) % length;
        self.cell_at(next)
    }

    /// Counts the loop steps needed to travel from one cell to another.
    ///
    /// The distance from a cell to itself is zero.
    #[must_use]
    pub fn forward_distance(&self, from: CellCoord, to: CellCoord) -> Option<u32> {
        let start = self.position_of(from)?;
        let end = self.position_of(to)?;
        let length = u32::try_from(self.cells.len()).ok()?;
        Some((end + length - start) % length)
    }
}
