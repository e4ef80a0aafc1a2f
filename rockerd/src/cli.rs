use clap::{Parser, Subcommand};
use rocker_core::{Address, Hash, PlanetId};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rockerd")]
#[command(about = "Planet mining engine operator", long_about = None)]
pub struct Args {
    /// Path to configuration file (optional, uses defaults if not provided)
    #[arg(short, long)]
    pub config_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Largest sphere radius accepted for generation
    #[arg(long)]
    pub max_radius: Option<i64>,

    /// Ledger units charged per fuel unit
    #[arg(long)]
    pub fuel_price: Option<u64>,

    /// Append audit events to this JSON-lines file
    #[arg(long)]
    pub events_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count (and optionally list) the blocks of a sphere
    Sphere {
        #[arg(long, allow_hyphen_values = true)]
        radius: i64,

        /// Print every block instead of the count only
        #[arg(long)]
        list: bool,
    },

    /// Run one mining attempt against the configured state
    Mine {
        #[arg(long)]
        planet: PlanetId,

        #[arg(long)]
        claimed: u64,

        #[arg(long)]
        fuel: u64,

        /// Time spent in seconds
        #[arg(long)]
        time: u64,

        #[arg(long, default_value = "1")]
        mission: u32,

        #[arg(long)]
        miner: Address,

        /// Commit hash (32 bytes hex)
        #[arg(long)]
        hash: Hash,

        /// Submit as this caller instead of the operator
        #[arg(long)]
        caller: Option<Address>,
    },

    /// Apply a JSON array of actions in order
    Replay {
        #[arg(long)]
        script: PathBuf,
    },
}

pub fn parse_args() -> Args {
    Args::parse()
}
