//! Command-line interface for strictly_tictactoe_server.

use clap::{Parser, Subcommand};

/// Strictly Tic-Tac-Toe - two-player match server over TCP
#[derive(Parser, Debug)]
#[command(name = "strictly_tictactoe_server")]
#[command(about = "Pairs players over TCP and referees tic-tac-toe matches", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the match server
    Serve {
        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },

    /// Connect to a server and play from the terminal
    Client {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short, long, default_value_t = strictly_tictactoe_server::DEFAULT_PORT)]
        port: u16,
    },
}
