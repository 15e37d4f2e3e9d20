//! Puzzle runner
//!
//! Usage:
//!     advent run 8
//!     advent run 8 --real
//!     advent run 9 --input ~/puzzles/day09.txt --json
//!     advent all
//!     advent list

mod inputs;

use advent_core::{solve, Answers, Dataset, Day};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Solve the daily puzzles from bundled or local inputs
#[derive(Parser)]
#[command(name = "advent")]
#[command(version)]
#[command(about = "Daily puzzle solvers", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one day
    Run {
        /// Day number, e.g. 8 or day08
        day: Day,

        /// Use the real input instead of the worked example
        #[arg(long)]
        real: bool,

        /// Read the input from this file. Implies --real.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print answers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Solve every day
    All {
        /// Use the real inputs instead of the worked examples
        #[arg(long)]
        real: bool,

        /// Print answers as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available days
    List,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Files passed with `--input` use the real dataset
fn dataset(real: bool, input: Option<&Path>) -> Dataset {
    if real || input.is_some() {
        Dataset::Real
    } else {
        Dataset::Sample
    }
}

fn run_day(day: Day, dataset: Dataset, input: Option<&Path>) -> Result<Answers> {
    let text = inputs::load(day, dataset, input)?;
    info!(%day, ?dataset, "solving");
    solve(day, dataset, &text).with_context(|| format!("{} failed", day))
}

fn print_answers(answers: &Answers) {
    println!("{}", answers.day);
    println!("  Part 1: {}", answers.part_one);
    match answers.part_two {
        Some(value) => println!("  Part 2: {}", value),
        None => println!("  Part 2: -"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            day,
            real,
            input,
            json,
        } => {
            let input = input.as_deref();
            let answers = run_day(day, dataset(real, input), input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answers)?);
            } else {
                print_answers(&answers);
            }
        }
        Commands::All { real, json } => {
            let all = Day::all()
                .iter()
                .map(|&day| run_day(day, dataset(real, None), None))
                .collect::<Result<Vec<_>>>()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for answers in &all {
                    print_answers(answers);
                }
            }
        }
        Commands::List => {
            for day in Day::all() {
                println!("{:>2}  {}", day.number(), day.title());
            }
            if let Some(dir) = inputs::data_dir() {
                println!();
                println!("Real inputs are read from {}", dir.display());
            }
        }
    }

    Ok(())
}
