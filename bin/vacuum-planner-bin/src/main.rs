/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Plans a sequence of actions that moves a robot around a Vacuum World grid and vacuums all
//! dirty cells.
//!
//! ```text
//! vacuum-planner plan uniform-cost tiny-1.txt
//! vacuum-planner generate --width 5 --height 4 --dirty 3 --seed 42 > tiny-1.txt
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rand::SeedableRng;
use serde::Serialize;
use vacuum_planner::{PlannerConfig, SearchResult, Strategy};
use vacuum_world_logic::generate::{random_world, to_world_file, GeneratorConfig};
use vacuum_world_logic::{Action, World};

#[derive(Parser, Debug)]
#[command(name = "vacuum-planner", version, about = "Vacuum World search planner")]
struct Cli {
    /// Log more. Repeat for more detail: -v info, -vv debug, -vvv trace. RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a world file for a plan that cleans every dirty cell.
    Plan(PlanArgs),

    /// Print a random world file.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Search algorithm: uniform-cost or depth-first.
    #[arg(env = "VACUUM_PLANNER_ALGORITHM")]
    algorithm: Strategy,

    /// World file: column count, row count, then the grid rows.
    world_file: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip replaying the plan against the world before reporting it.
    #[arg(long)]
    no_verify: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of columns.
    #[arg(long)]
    width: usize,

    /// Number of rows.
    #[arg(long)]
    height: usize,

    /// Probability of each cell being a wall.
    #[arg(long, default_value_t = 0.2)]
    walls: f64,

    /// Number of dirty cells.
    #[arg(long, default_value_t = 3)]
    dirty: usize,

    /// RNG seed. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One action per line, then the node counts.
    Text,
    /// A single JSON object.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Solved,
    Exhausted,
}

#[derive(Debug, Serialize)]
struct JsonReport {
    algorithm: Strategy,
    solved: bool,
    actions: Vec<String>,
    generated: u64,
    expanded: u64,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_world(path: &Path) -> anyhow::Result<World> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read world file {}", path.display()))?;
    text.parse::<World>()
        .with_context(|| format!("invalid world file {}", path.display()))
}

fn write_report<W: Write>(
    out: &mut W,
    algorithm: Strategy,
    result: &SearchResult<Action>,
    format: OutputFormat,
) -> io::Result<()> {
    let statistics = result.statistics();
    match format {
        OutputFormat::Text => {
            match result.actions() {
                Some(actions) => {
                    for action in actions {
                        writeln!(out, "{}", action)?;
                    }
                }
                None => writeln!(out, "Could not reach all dirty squares")?,
            }
            writeln!(out, "{} nodes generated", statistics.generated)?;
            writeln!(out, "{} nodes expanded", statistics.expanded)?;
        }
        OutputFormat::Json => {
            let report = JsonReport {
                algorithm,
                solved: result.is_solved(),
                actions: result
                    .actions()
                    .unwrap_or_default()
                    .iter()
                    .map(Action::to_string)
                    .collect(),
                generated: statistics.generated,
                expanded: statistics.expanded,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_plan<W: Write>(args: &PlanArgs, out: &mut W) -> anyhow::Result<Outcome> {
    let world = load_world(&args.world_file)?;
    let config = PlannerConfig {
        strategy: args.algorithm,
        verify_plan: !args.no_verify,
    };
    let result = vacuum_planner::plan(&world, &config)
        .context("planner produced an invalid plan")?;
    write_report(out, args.algorithm, &result, args.format)?;

    if result.is_solved() {
        Ok(Outcome::Solved)
    } else {
        warn!(
            "{} dirty cells, not all reachable from {}",
            world.dirty_cells().len(),
            world.start()
        );
        Ok(Outcome::Exhausted)
    }
}

fn run_generate<W: Write>(args: &GenerateArgs, out: &mut W) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("generating world with seed {}", seed);
    let config = GeneratorConfig {
        width: args.width,
        height: args.height,
        wall_probability: args.walls,
        dirty_count: args.dirty,
    };
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    let world = random_world(&config, &mut rng).context("failed to generate world")?;
    write!(out, "{}", to_world_file(&world))?;
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Plan(args) => match run_plan(args, &mut out)? {
            Outcome::Solved => Ok(ExitCode::SUCCESS),
            Outcome::Exhausted => Ok(ExitCode::FAILURE),
        },
        Command::Generate(args) => {
            run_generate(args, &mut out)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
