//! Enclave CLI - administer and play a territory-capture game stored in a
//! state file.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Enclave - a grid territory-capture engine
#[derive(Parser, Debug)]
#[command(name = "enclave")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game state file
    #[arg(short, long, global = true, default_value = "enclave.json")]
    state: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity
    #[arg(long, global = true, default_value = "warn")]
    log_level: cli::LogLevel,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty state file
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Register a new player
    Register {
        /// Unique player name
        name: String,

        /// Register with the admin role
        #[arg(long)]
        admin: bool,
    },

    /// Show a player's role, points and tile count
    Profile {
        /// Player id
        player: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Claim a cell
    #[command(allow_negative_numbers = true)]
    Place {
        /// Acting player id
        #[arg(short, long)]
        player: u32,

        /// X coordinate
        x: String,

        /// Y coordinate
        y: String,
    },

    /// Grow the playable range (admin)
    #[command(allow_negative_numbers = true)]
    Range {
        /// Acting admin id
        #[arg(short, long)]
        actor: u32,

        /// Inclusive lower x bound
        min_x: i32,

        /// Exclusive upper x bound
        max_x: i32,

        /// Inclusive lower y bound
        min_y: i32,

        /// Exclusive upper y bound
        max_y: i32,
    },

    /// Run an evaluation pass (admin)
    Evaluate {
        /// Acting admin id
        #[arg(short, long)]
        actor: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Add (or with a negative value, remove) points (admin)
    #[command(allow_negative_numbers = true)]
    Grant {
        /// Acting admin id
        #[arg(short, long)]
        actor: u32,

        /// Target player id
        target: u32,

        /// Points to add
        points: String,
    },

    /// Change a player's role (admin)
    Role {
        /// Acting admin id
        #[arg(short, long)]
        actor: u32,

        /// Target player id
        target: u32,

        /// New role: user or admin
        role: String,
    },

    /// Show users ranked by tile count
    Standings {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Show the ownership grid of the current range
    #[command(allow_negative_numbers = true)]
    Grid {
        /// Show only this part of the range: MIN_X MAX_X MIN_Y MAX_Y
        #[arg(long, num_args = 4, value_names = ["MIN_X", "MAX_X", "MIN_Y", "MAX_Y"])]
        window: Option<Vec<i32>>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Simulate many players placing tiles in parallel, then evaluate
    Simulate {
        /// Number of simulated players
        #[arg(short, long, default_value = "8")]
        players: u32,

        /// Grid side length
        #[arg(long, default_value = "64")]
        size: i32,

        /// Placement attempts per player
        #[arg(short = 'n', long, default_value = "400")]
        placements: u32,

        /// Random seed (default: random)
        #[arg(long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(args.log_level);

    let ctx = cli::Context {
        state: args.state,
        config: args.config,
    };

    let result = match args.command {
        Commands::Init { force } => cli::play::init(&ctx, force),
        Commands::Register { name, admin } => cli::play::register(&ctx, &name, admin),
        Commands::Profile { player, format } => cli::play::profile(&ctx, player, format),
        Commands::Place { player, x, y } => cli::play::place(&ctx, player, &x, &y),
        Commands::Range {
            actor,
            min_x,
            max_x,
            min_y,
            max_y,
        } => cli::admin::range(&ctx, actor, [min_x, max_x, min_y, max_y]),
        Commands::Evaluate { actor, format } => cli::admin::evaluate(&ctx, actor, format),
        Commands::Grant {
            actor,
            target,
            points,
        } => cli::admin::grant(&ctx, actor, target, &points),
        Commands::Role {
            actor,
            target,
            role,
        } => cli::admin::role(&ctx, actor, target, &role),
        Commands::Standings { format } => cli::view::standings(&ctx, format),
        Commands::Grid { window, format } => cli::view::grid(&ctx, window.as_deref(), format),
        Commands::Simulate {
            players,
            size,
            placements,
            seed,
            threads,
            format,
            progress,
        } => cli::simulate::execute(&ctx, players, size, placements, seed, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
