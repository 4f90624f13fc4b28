//! Precomputed traversal loop used by the world crate.

use loopsnake_core::{CellCoord, CycleView, GridSize};

/// Closed tour visiting every playfield cell exactly once.
///
/// The tour sweeps row zero left to right, combs the remaining rows through
/// columns one and up, alternating direction per row, and finally returns to
/// the origin down column zero. It exists for any grid with at least two
/// columns and an even, positive number of rows, which is exactly what
/// configuration validation guarantees before construction.
#[derive(Clone, Debug)]
pub(crate) struct HamiltonianCycle {
    cells: Vec<CellCoord>,
    positions: Vec<u32>,
    grid: GridSize,
}

impl HamiltonianCycle {
    /// Builds the tour for the provided grid.
    #[must_use]
    pub(crate) fn build(grid: GridSize) -> Self {
        let width = grid.width();
        let height = grid.height();
        let mut cells = Vec::with_capacity(grid.cell_count());

        cells.push(CellCoord::new(0, 0));
        for column in 1..width {
            cells.push(CellCoord::new(column, 0));
        }
        for row in 1..height {
            if row % 2 == 1 {
                for column in (1..width).rev() {
                    cells.push(CellCoord::new(column, row));
                }
            } else {
                for column in 1..width {
                    cells.push(CellCoord::new(column, row));
                }
            }
        }
        for row in (1..height).rev() {
            cells.push(CellCoord::new(0, row));
        }

        debug_assert_eq!(cells.len(), grid.cell_count());

        let mut positions = vec![0_u32; grid.cell_count()];
        for (position, cell) in cells.iter().enumerate() {
            if let (Some(index), Ok(position)) = (grid.index_of(*cell), u32::try_from(position)) {
                positions[index] = position;
            }
        }

        Self {
            cells,
            positions,
            grid,
        }
    }

    /// Number of cells on the tour.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Cell at the provided tour position.
    #[must_use]
    pub(crate) fn cell_at(&self, position: usize) -> Option<CellCoord> {
        self.cells.get(position).copied()
    }

    /// Captures a read-only view over the tour storage.
    #[must_use]
    pub(crate) fn view(&self) -> CycleView<'_> {
        CycleView::new(&self.cells, &self.positions, self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tour_visits_every_cell_exactly_once() {
        let grid = GridSize::new(4, 4);
        let cycle = HamiltonianCycle::build(grid);

        assert_eq!(cycle.len(), grid.cell_count());
        let distinct: HashSet<CellCoord> = cycle.view().cells().iter().copied().collect();
        assert_eq!(distinct.len(), grid.cell_count());
    }

    #[test]
    fn consecutive_tour_cells_are_neighbours_with_wraparound() {
        for (width, height) in [(2, 2), (4, 4), (5, 6), (9, 4)] {
            let grid = GridSize::new(width, height);
            let cycle = HamiltonianCycle::build(grid);
            let cells = cycle.view().cells().to_vec();

            for pair in cells.windows(2) {
                assert_eq!(
                    pair[0].manhattan_distance(pair[1]),
                    1,
                    "broken tour on {width}x{height} between {:?} and {:?}",
                    pair[0],
                    pair[1]
                );
            }
            let first = cells[0];
            let last = cells[cells.len() - 1];
            assert_eq!(last.manhattan_distance(first), 1);
        }
    }

    #[test]
    fn tour_starts_at_origin_and_returns_down_column_zero() {
        let cycle = HamiltonianCycle::build(GridSize::new(4, 4));

        assert_eq!(cycle.cell_at(0), Some(CellCoord::new(0, 0)));
        assert_eq!(cycle.cell_at(1), Some(CellCoord::new(1, 0)));
        assert_eq!(cycle.cell_at(cycle.len() - 1), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn view_positions_invert_the_tour_order() {
        let cycle = HamiltonianCycle::build(GridSize::new(6, 4));
        let view = cycle.view();

        for (position, cell) in view.cells().iter().enumerate() {
            assert_eq!(view.position_of(*cell), Some(position as u32));
        }
    }
}
