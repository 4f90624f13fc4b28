//! Escape-route probing used by the autoplay planner.

use std::collections::VecDeque;

use loopsnake_core::{CellCoord, GridSize};

/// Breadth-first probe that answers reachability queries on the playfield.
///
/// Scratch storage is reused across calls so steady-state planning allocates
/// nothing; each answer depends only on the provided arguments.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReachabilityProbe {
    visited: Vec<bool>,
    frontier: VecDeque<CellCoord>,
}

impl ReachabilityProbe {
    /// Reports whether `target` can be reached from `start` through cells the
    /// `is_blocked` closure leaves open.
    ///
    /// Neither `start` nor `target` is ever treated as blocked, whatever the
    /// closure says about them.
    pub(crate) fn has_path<F>(
        &mut self,
        grid: GridSize,
        start: CellCoord,
        target: CellCoord,
        mut is_blocked: F,
    ) -> bool
    where
        F: FnMut(CellCoord) -> bool,
    {
        if !grid.contains(start) || !grid.contains(target) {
            return false;
        }
        if start == target {
            return true;
        }

        let cell_count = grid.cell_count();
        if self.visited.len() != cell_count {
            self.visited = vec![false; cell_count];
        } else {
            self.visited.fill(false);
        }
        self.frontier.clear();

        if let Some(index) = grid.index_of(start) {
            self.visited[index] = true;
        }
        self.frontier.push_back(start);

        while let Some(cell) = self.frontier.pop_front() {
            for neighbor in grid.neighbors(cell) {
                if neighbor == target {
                    return true;
                }

                let Some(index) = grid.index_of(neighbor) else {
                    continue;
                };
                if self.visited[index] || is_blocked(neighbor) {
                    continue;
                }

                self.visited[index] = true;
                self.frontier.push_back(neighbor);
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_finds_paths_on_an_open_grid() {
        let mut probe = ReachabilityProbe::default();
        let grid = GridSize::new(4, 4);

        assert!(probe.has_path(grid, CellCoord::new(0, 0), CellCoord::new(3, 3), |_| false));
        assert!(probe.has_path(grid, CellCoord::new(2, 2), CellCoord::new(2, 2), |_| false));
    }

    #[test]
    fn probe_respects_blocking_walls() {
        let mut probe = ReachabilityProbe::default();
        let grid = GridSize::new(4, 4);
        let wall = |cell: CellCoord| cell.column() == 1;

        assert!(!probe.has_path(grid, CellCoord::new(0, 0), CellCoord::new(3, 0), wall));

        let gated = |cell: CellCoord| cell.column() == 1 && cell.row() != 3;
        assert!(probe.has_path(grid, CellCoord::new(0, 0), CellCoord::new(3, 0), gated));
    }

    #[test]
    fn endpoints_are_never_blocked() {
        let mut probe = ReachabilityProbe::default();
        let grid = GridSize::new(4, 4);

        assert!(probe.has_path(grid, CellCoord::new(0, 0), CellCoord::new(0, 1), |_| true));
        assert!(!probe.has_path(grid, CellCoord::new(0, 0), CellCoord::new(0, 2), |_| true));
    }

    #[test]
    fn out_of_bounds_endpoints_are_unreachable() {
        let mut probe = ReachabilityProbe::default();
        let grid = GridSize::new(4, 4);

        assert!(!probe.has_path(grid, CellCoord::new(0, 0), CellCoord::new(4, 0), |_| false));
        assert!(!probe.has_path(grid, CellCoord::new(0, 4), CellCoord::new(0, 0), |_| false));
    }
}
