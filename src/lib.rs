//! Strictly Tic-Tac-Toe - networked two-player match server
//!
//! Pairs players connecting over TCP and referees a game of tic-tac-toe
//! between them using a line-oriented text protocol.
//!
//! # Architecture
//!
//! - **Games**: the board engine (validation, win/draw detection, render)
//! - **Session**: the per-match turn loop and teardown
//! - **Dispatcher**: pairs connections and runs one task per match
//! - **Endpoint**: the line channel a session talks to each player through
//! - **Client**: terminal relay for a human player
//!
//! # Example
//!
//! ```no_run
//! use strictly_tictactoe_server::{Dispatcher, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:6789").await?;
//! serve(listener, Dispatcher::new()).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod dispatcher;
mod endpoint;
mod games;
mod protocol;
mod session;

/// Interactive terminal client.
pub mod client;

// Crate-level exports - Configuration
pub use config::{ConfigError, DEFAULT_PORT, ServerConfig};

// Crate-level exports - Dispatcher
pub use dispatcher::{Dispatcher, serve};

// Crate-level exports - Endpoints
pub use endpoint::{Endpoint, EndpointError, LineEndpoint, MAX_LINE_BYTES, TcpEndpoint};

// Crate-level exports - Protocol
pub use protocol::Notice;

// Crate-level exports - Session
pub use session::{MatchReport, MatchSession, MatchState, PlayerDisconnected};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{Board, Cell, Mark, Move, MoveError, Outcome, Slot, rules};
