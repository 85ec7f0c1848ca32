//! Floodbot CLI - play games and inspect flow fields.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Floodbot - frontier flow-field bot
#[derive(Parser, Debug)]
#[command(name = "floodbot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game over stdin/stdout using the server's text protocol
    Play {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Production multiplier a cell must exceed before moving
        #[arg(short, long)]
        threshold: Option<u16>,

        /// What to do when a turn fails
        #[arg(short, long)]
        fallback: Option<cli::FallbackArg>,
    },

    /// Compute the flow field and moves for one snapshot file
    Plan {
        /// Snapshot JSON file
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Production multiplier a cell must exceed before moving
        #[arg(short, long)]
        threshold: Option<u16>,
    },

    /// Generate a random snapshot
    Generate {
        /// Map width
        #[arg(long, default_value = "30")]
        width: u16,

        /// Map height
        #[arg(long, default_value = "30")]
        height: u16,

        /// Number of players (1-8)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Acting player recorded in the snapshot
        #[arg(long, default_value = "1")]
        player: u8,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    // stdout carries the game protocol, so logs go to stderr.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Play {
            config,
            threshold,
            fallback,
        } => cli::play::execute(config.as_deref(), threshold, fallback),

        Commands::Plan {
            snapshot,
            format,
            threshold,
        } => cli::plan::execute(&snapshot, format, threshold),

        Commands::Generate {
            width,
            height,
            players,
            seed,
            player,
            output,
        } => cli::generate::execute(width, height, players, seed, player, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
