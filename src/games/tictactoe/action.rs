//! Move parsing for tic-tac-toe.
//!
//! A move arrives as one line of text, `row col`. Parsing only checks
//! shape; whether the coordinates are on the board and free is the
//! board's call.

use derive_more::{Display, Error};
use tracing::instrument;

/// A candidate move: a `(row, col)` pair as typed by the player.
///
/// Coordinates are not range-checked here, so `5 5` parses and is later
/// rejected by [`Board::is_valid_move`](super::Board::is_valid_move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("({row}, {col})")]
pub struct Move {
    /// Row index, valid in `[0, 2]`.
    pub row: i64,
    /// Column index, valid in `[0, 2]`.
    pub col: i64,
}

impl Move {
    /// Creates a new move.
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Parses a `row col` line: exactly two whitespace-separated integers.
    #[instrument]
    pub fn parse(line: &str) -> Result<Self, MoveError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [row, col] = tokens.as_slice() else {
            return Err(MoveError::TokenCount(tokens.len()));
        };
        Ok(Self {
            row: parse_coordinate(row)?,
            col: parse_coordinate(col)?,
        })
    }
}

fn parse_coordinate(token: &str) -> Result<i64, MoveError> {
    token
        .parse::<i64>()
        .map_err(|_| MoveError::NotANumber(token.to_string()))
}

/// Why a candidate move was refused. Every variant is recoverable: the
/// player is asked again.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Line did not hold exactly two tokens.
    #[display("Expected 2 coordinates, got {_0}")]
    TokenCount(#[error(not(source))] usize),

    /// A token was not an integer.
    #[display("Not a number: {_0:?}")]
    NotANumber(#[error(not(source))] String),

    /// Coordinates off the board or onto an occupied cell.
    #[display("Position ({row}, {col}) is not available")]
    Rejected {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },
}
