//! Command-line interface for puissance.

use clap::{Parser, Subcommand};
use puissance::Starter;

/// Puissance - connect four against the computer
#[derive(Parser, Debug)]
#[command(name = "puissance")]
#[command(about = "Connect four in the terminal against a scripted opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for the opponent's random moves
        #[arg(long)]
        seed: Option<u64>,

        /// Opponent thinking delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Who plays first (prompted for when omitted)
        #[arg(long, value_enum)]
        starter: Option<Starter>,

        /// Print every game event as a JSON line instead of the board
        #[arg(long)]
        json_events: bool,
    },

    /// Print the rules
    Rules,
}
