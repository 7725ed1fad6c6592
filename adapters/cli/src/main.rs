#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that embeds the Snake Pilot pathfinder.

mod autoplay;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use snake_pilot_core::Board;
use tracing_subscriber::EnvFilter;

use crate::{
    autoplay::Game,
    scenario::{parse_body, parse_cell, Scenario},
};

/// Steers a snake across a wrap-around board with A* search.
#[derive(Debug, Parser)]
#[command(name = "snake-pilot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Prints the next move for a single board snapshot.
    NextMove(NextMoveArgs),
    /// Plays a headless game where the pathfinder steers every tick.
    Autoplay(AutoplayArgs),
}

#[derive(Debug, Args)]
struct NextMoveArgs {
    /// TOML scenario describing the board, body and goal.
    #[arg(long, conflicts_with_all = ["width", "height", "body", "goal"])]
    scenario: Option<PathBuf>,
    /// Number of board columns.
    #[arg(long)]
    width: Option<u32>,
    /// Number of board rows.
    #[arg(long)]
    height: Option<u32>,
    /// Head-first body cells, e.g. "10,10;10,11;10,12".
    #[arg(long)]
    body: Option<String>,
    /// Goal cell, e.g. "5,5".
    #[arg(long)]
    goal: Option<String>,
    /// Also print the full path.
    #[arg(long)]
    show_path: bool,
}

impl NextMoveArgs {
    fn scenario(&self) -> Result<Scenario> {
        if let Some(path) = &self.scenario {
            return Scenario::load(path);
        }

        let mut scenario = Scenario::example();
        if let Some(width) = self.width {
            scenario.width = width;
        }
        if let Some(height) = self.height {
            scenario.height = height;
        }
        if let Some(body) = &self.body {
            scenario.body = parse_body(body).context("invalid --body argument")?;
        }
        if let Some(goal) = &self.goal {
            scenario.goal = parse_cell(goal).context("invalid --goal argument")?;
        }

        Ok(scenario)
    }
}

#[derive(Debug, Args)]
struct AutoplayArgs {
    /// Number of board columns.
    #[arg(long, default_value_t = 20)]
    width: u32,
    /// Number of board rows.
    #[arg(long, default_value_t = 15)]
    height: u32,
    /// Maximum number of ticks to play.
    #[arg(long, default_value_t = 1_000)]
    ticks: u32,
    /// Seed for apple placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Entry point for the Snake Pilot command-line interface.
fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        CliCommand::NextMove(args) => next_move(&args),
        CliCommand::Autoplay(args) => autoplay(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn next_move(args: &NextMoveArgs) -> Result<()> {
    let query = args.scenario()?.into_query()?;
    let direction = query.finder.get_next_move(&query.body, query.goal);
    println!("{direction}");

    if args.show_path {
        match query.finder.find_path(&query.body, query.goal) {
            Some(path) => {
                let cells: Vec<_> = path.cells().iter().map(ToString::to_string).collect();
                println!("path ({} steps): {}", path.steps(), cells.join(" -> "));
            }
            None => println!("no path to {}", query.goal),
        }
    }

    Ok(())
}

fn autoplay(args: &AutoplayArgs) -> Result<()> {
    let board = Board::new(args.width, args.height).context("invalid board dimensions")?;
    let summary = Game::new(board, args.seed)?.run(args.ticks)?;
    println!("{summary}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn inline_arguments_override_example() {
        let cli = Cli::try_parse_from([
            "snake-pilot",
            "next-move",
            "--width",
            "6",
            "--body",
            "1,1;1,2",
            "--goal",
            "5,1",
        ])
        .expect("arguments parse");
        let CliCommand::NextMove(args) = cli.command else {
            panic!("expected next-move command");
        };

        let scenario = args.scenario().expect("scenario builds");
        assert_eq!(scenario.width, 6);
        assert_eq!(scenario.height, Scenario::example().height);

        let query = scenario.into_query().expect("scenario is valid");
        assert_eq!(
            query.finder.get_next_move(&query.body, query.goal),
            snake_pilot_core::Direction::Left
        );
    }

    #[test]
    fn scenario_file_conflicts_with_inline_arguments() {
        let result = Cli::try_parse_from([
            "snake-pilot",
            "next-move",
            "--scenario",
            "board.toml",
            "--width",
            "6",
        ]);
        assert!(result.is_err());
    }
}
