//! Kingdom CLI - inspect snapshots, project balances and plan contract writes.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Kingdom - client-side toolkit for the Kingdom contract on BSC
#[derive(Parser, Debug)]
#[command(name = "kingdom")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rules override file (JSON, missing fields keep the contract defaults)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Clock override in unix seconds (default: system clock)
    #[arg(long, global = true)]
    now: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Project stored balances to now
    Theory {
        /// Snapshot file (getKingdom result as JSON)
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// List occupied and free tiles
    Tiles {
        /// Snapshot file (getKingdom result as JSON)
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Also list free tiles
        #[arg(long)]
        free: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Show upgrade cost and affordability of every building
    Upgrades {
        /// Snapshot file (getKingdom result as JSON)
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Show battle cooldown, readiness and reward preview
    Battle {
        /// Snapshot file (getKingdom result as JSON)
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Win chance to preview (clamped to 40-60)
        #[arg(short, long, default_value = "50", allow_negative_numbers = true)]
        win_chance: i64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Validate a write and print the contract call as JSON
    Plan {
        #[command(subcommand)]
        action: cli::plan::PlanAction,
    },

    /// Interactive TUI with live projected balances
    Watch {
        /// Snapshot file, re-read on every refetch
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Seconds between snapshot re-reads (default: 30)
        #[arg(long, default_value = "30")]
        refetch: u64,
    },

    /// Check that a snapshot file normalizes cleanly
    Validate {
        /// Snapshot file to validate
        #[arg(required = true)]
        snapshot: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = cli::Context::new(args.rules, args.now).and_then(|ctx| match args.command {
        Commands::Theory { snapshot, format } => cli::theory::execute(&ctx, snapshot, format),

        Commands::Tiles {
            snapshot,
            free,
            format,
        } => cli::tiles::execute(snapshot, free, format),

        Commands::Upgrades { snapshot, format } => cli::upgrades::execute(&ctx, snapshot, format),

        Commands::Battle {
            snapshot,
            win_chance,
            format,
        } => cli::battle::execute(&ctx, snapshot, win_chance, format),

        Commands::Plan { action } => cli::plan::execute(&ctx, action),

        Commands::Watch { snapshot, refetch } => cli::watch::execute(&ctx, snapshot, refetch),

        Commands::Validate { snapshot } => cli::validate::execute(snapshot),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
