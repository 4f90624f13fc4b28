#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Loopsnake simulation to completion.

use std::num::NonZeroU32;

use anyhow::Result;
use clap::Parser;
use loopsnake_core::{GridSize, SimulationConfig};
use loopsnake_runtime::{Session, TickReport};
use loopsnake_system_autopilot::Config as PlannerConfig;

mod summary;

use summary::RunSummary;

/// Command-line arguments accepted by the Loopsnake binary.
#[derive(Debug, Parser)]
#[command(name = "loopsnake")]
#[command(version, about = "Self-playing snake simulation")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = 20)]
    width: u32,

    /// Grid height in cells; the traversal loop needs an even row count
    #[arg(long, default_value_t = 20)]
    height: u32,

    /// Number of pellets kept in play
    #[arg(long, default_value_t = NonZeroU32::MIN)]
    food_target: NonZeroU32,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Seed for pellet placement; drawn from entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Snake length at which the autopilot stops hunting pellets
    #[arg(long, default_value_t = PlannerConfig::default().engagement_ceiling())]
    engagement_ceiling: u32,

    /// Print one line per tick while the run unfolds
    #[arg(long, conflicts_with = "json")]
    trace: bool,

    /// Emit the final summary as JSON
    #[arg(long)]
    json: bool,
}

/// Entry point for the Loopsnake command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let grid = GridSize::new(cli.width, cli.height);
    let config = SimulationConfig::new(grid, cli.food_target);
    let seed = cli.seed.unwrap_or_else(rand::random);
    let planner = PlannerConfig::new(cli.engagement_ceiling);
    let mut session = Session::with_planner(config, seed, planner)?;

    if !cli.json {
        println!("{}", session.welcome_banner());
        println!(
            "grid {}x{}  food target {}  seed {seed}",
            grid.width(),
            grid.height(),
            cli.food_target
        );
    }

    let mut meals = 0;
    let mut refusals = 0;
    for _ in 0..cli.ticks {
        let report = session.tick();
        if report.ate.is_some() {
            meals += 1;
        }
        if !report.stepped {
            refusals += 1;
        }
        if cli.trace {
            print_trace(&report);
        }
    }

    let summary = RunSummary::capture(&session, cli.ticks, meals, refusals);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }

    Ok(())
}

fn print_trace(report: &TickReport) {
    let mut line = format!(
        "tick {:>5}  head ({:>2}, {:>2})  length {:>3}  pellets {}",
        report.tick,
        report.head.column(),
        report.head.row(),
        report.length,
        report.food_count
    );
    if let Some(cell) = report.ate {
        line.push_str(&format!("  ate ({}, {})", cell.column(), cell.row()));
    }
    if !report.stepped {
        line.push_str("  parked");
    }
    println!("{line}");
}
