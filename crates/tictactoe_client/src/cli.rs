//! Command-line interface for tictactoe_client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tictactoe_api::GameStatus;

/// Terminal client for the remote tic-tac-toe service
#[derive(Parser, Debug)]
#[command(name = "tictactoe_client")]
#[command(about = "Play tic-tac-toe against other players on a remote service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Subcommand to run (defaults to the interactive client)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive terminal client
    Tui,

    /// Print one page of games
    Games {
        /// Only list games with this status (open, progress, finished)
        #[arg(long)]
        status: Option<GameStatus>,

        /// Row offset of the page
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Print one page of player rankings
    Rankings {
        /// Row offset of the page
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Log in and remember the token
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Create an account (does not log in)
    Register {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored token
    Logout,
}
