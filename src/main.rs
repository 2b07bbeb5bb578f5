//! Mountain Climber CLI - run and survey headless climbing sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::path::PathBuf;
use std::process::ExitCode;

/// Mountain Climber - a deterministic turn-based climbing simulation
#[derive(Parser, Debug)]
#[command(name = "mountain-climber")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log verbosity (-v warn, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single session and print the result
    Simulate {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Segments on the generated route
        #[arg(long, default_value = "20")]
        segments: usize,

        /// Number of climbers
        #[arg(short, long, default_value = "4")]
        climbers: usize,

        /// Maximum turns
        #[arg(short, long, default_value = "200")]
        turns: u32,

        /// Rules file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run many sessions in parallel and aggregate statistics
    Survey {
        /// Number of sessions to run
        #[arg(short = 'n', long, default_value = "1000")]
        sessions: u64,

        /// Starting seed (increments for each session)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Segments on each generated route
        #[arg(long, default_value = "20")]
        segments: usize,

        /// Climbers per session
        #[arg(short, long, default_value = "4")]
        climbers: usize,

        /// Rules file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SurveyFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Run the built-in scenario checks
    Selftest {
        /// Only run checks whose label starts with this section number
        filter: Option<u32>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("mountain_climber")
        .build();
    if let Err(e) = WriteLogger::init(level, config, std::io::stderr()) {
        eprintln!("Warning: logging disabled: {e}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Simulate {
            seed,
            segments,
            climbers,
            turns,
            config,
            format,
        } => cli::simulate::execute(seed, segments, climbers, turns, config.as_deref(), format),

        Commands::Survey {
            sessions,
            seed,
            threads,
            segments,
            climbers,
            config,
            format,
            progress,
        } => cli::survey::execute(
            sessions,
            seed,
            threads,
            segments,
            climbers,
            config.as_deref(),
            format,
            progress,
        ),

        Commands::Selftest { filter } => cli::selftest::execute(filter),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
