use std::fmt;

use loopsnake_core::CellCoord;
use loopsnake_runtime::Session;
use serde::Serialize;

/// Final state of a simulation run, captured once the requested ticks elapse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct RunSummary {
    /// Number of ticks the run simulated.
    pub ticks: u64,
    /// Seed that drove the run's pellet draws.
    pub seed: u64,
    /// Number of grid columns in the playfield.
    pub width: u32,
    /// Number of grid rows in the playfield.
    pub height: u32,
    /// Pellet population target in force when the run ended.
    pub food_target: u32,
    /// Number of pellets the snake consumed.
    pub meals: u64,
    /// Number of ticks on which the world refused the planned step.
    pub refusals: u64,
    /// Number of cells the snake occupied when the run ended.
    pub length: usize,
    /// Number of pellets in play when the run ended.
    pub pellets: usize,
    /// Cell occupied by the snake's head when the run ended.
    pub head: Option<CellCoord>,
}

impl RunSummary {
    /// Captures the session state alongside the tallies kept during the run.
    #[must_use]
    pub(crate) fn capture(session: &Session, ticks: u64, meals: u64, refusals: u64) -> Self {
        let grid = session.grid();
        let snake = session.snake();

        Self {
            ticks,
            seed: session.seed(),
            width: grid.width(),
            height: grid.height(),
            food_target: session.food_target().get(),
            meals,
            refusals,
            length: snake.len(),
            pellets: session.foods().len(),
            head: snake.head(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks    {}", self.ticks)?;
        writeln!(f, "seed     {}", self.seed)?;
        writeln!(f, "meals    {}", self.meals)?;
        writeln!(f, "refusals {}", self.refusals)?;
        writeln!(f, "length   {}", self.length)?;
        write!(f, "pellets  {}", self.pellets)?;
        if let Some(head) = self.head {
            write!(f, "\nhead     ({}, {})", head.column(), head.row())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use loopsnake_core::{GridSize, SimulationConfig};

    use super::*;

    fn sample() -> RunSummary {
        RunSummary {
            ticks: 250,
            seed: 9,
            width: 12,
            height: 10,
            food_target: 2,
            meals: 31,
            refusals: 0,
            length: 35,
            pellets: 2,
            head: Some(CellCoord::new(3, 4)),
        }
    }

    #[test]
    fn summaries_serialise_with_named_fields() {
        let value = serde_json::to_value(sample()).expect("summary serialises");

        assert_eq!(value["ticks"], 250);
        assert_eq!(value["seed"], 9);
        assert_eq!(value["width"], 12);
        assert_eq!(value["height"], 10);
        assert_eq!(value["food_target"], 2);
        assert_eq!(value["meals"], 31);
        assert_eq!(value["length"], 35);
        assert_eq!(value["head"]["column"], 3);
        assert_eq!(value["head"]["row"], 4);
    }

    #[test]
    fn summaries_render_one_fact_per_line() {
        let text = sample().to_string();

        assert!(text.contains("ticks    250"));
        assert!(text.contains("seed     9"));
        assert!(text.contains("meals    31"));
        assert!(text.contains("length   35"));
        assert!(text.contains("head     (3, 4)"));
    }

    #[test]
    fn capture_reflects_the_session_state() {
        let config = SimulationConfig::new(GridSize::new(6, 6), NonZeroU32::MIN);
        let mut session = Session::seeded(config, 11).expect("6x6 grid should be traversable");

        let mut meals = 0;
        for _ in 0..10 {
            if session.tick().ate.is_some() {
                meals += 1;
            }
        }

        let summary = RunSummary::capture(&session, 10, meals, 0);

        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.seed, 11);
        assert_eq!(summary.width, 6);
        assert_eq!(summary.height, 6);
        assert_eq!(summary.food_target, 1);
        assert_eq!(summary.length, session.snake().len());
        assert_eq!(summary.pellets, session.foods().len());
        assert_eq!(summary.head, session.snake().head());
        assert_eq!(
            summary.length,
            4 + summary.meals as usize,
            "length should grow only by meals"
        );
    }
}
