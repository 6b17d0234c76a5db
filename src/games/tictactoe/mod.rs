//! Tic-tac-toe board engine.
//!
//! The engine is a plain state holder: the [`Board`] validates and applies
//! moves and evaluates terminal conditions. Turn order and player I/O belong
//! to the match session that owns the board.

mod action;
mod board;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use board::Board;
pub use types::{Cell, Mark, Outcome, Slot};
