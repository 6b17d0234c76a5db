//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a board. Rules are kept apart from board
//! storage so the line-check order stays fixed in one place.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner};
