//! The 3x3 board and its move/termination operations.

use super::rules;
use super::types::{Cell, Mark, Outcome, Slot};
use std::fmt;
use tracing::{debug, instrument, trace};

/// Side length of the board.
pub const SIZE: usize = 3;

/// 3x3 tic-tac-toe board.
///
/// Holds nothing but the grid. All operations are synchronous and only
/// [`Board::apply_move`] mutates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
}

/// Converts raw coordinates into grid indices when both are in range.
fn grid_index(row: i64, col: i64) -> Option<(usize, usize)> {
    let row = usize::try_from(row).ok().filter(|r| *r < SIZE)?;
    let col = usize::try_from(col).ok().filter(|c| *c < SIZE)?;
    Some((row, col))
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `(row, col)`, or `None` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Rows of the board, top to bottom.
    pub fn rows(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.cells
    }

    /// A move is valid iff both coordinates lie in `[0, 2]` and the cell is empty.
    ///
    /// Out-of-range coordinates are an ordinary `false`, not an error.
    pub fn is_valid_move(&self, row: i64, col: i64) -> bool {
        grid_index(row, col).is_some_and(|(r, c)| self.cells[r][c] == Cell::Empty)
    }

    /// Places `slot`'s mark at `(row, col)`.
    ///
    /// Does nothing unless [`Board::is_valid_move`] holds. Callers check
    /// validity first; there is no failure signal.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, slot: Slot, row: i64, col: i64) {
        match grid_index(row, col) {
            Some((r, c)) if self.cells[r][c] == Cell::Empty => {
                self.cells[r][c] = Cell::Occupied(slot.mark());
                debug!(mark = %slot.mark(), "Mark placed");
            }
            _ => trace!("Ignoring move onto invalid cell"),
        }
    }

    /// Returns the mark forming three in a row, if any.
    ///
    /// Lines are checked in a fixed order: both diagonals, then rows, then
    /// columns.
    pub fn evaluate_winner(&self) -> Option<Mark> {
        rules::check_winner(self)
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Terminal outcome of the board, if it has one. A win takes precedence
    /// over a full board.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.evaluate_winner() {
            Some(mark) => Some(Outcome::Winner(mark)),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }

    /// Renders the board as three newline-terminated `c|c|c` rows.
    pub fn render(&self) -> String {
        let mut result = String::with_capacity(SIZE * (2 * SIZE));
        for row in &self.cells {
            for (col, cell) in row.iter().enumerate() {
                result.push(cell.symbol());
                if col < SIZE - 1 {
                    result.push('|');
                }
            }
            result.push('\n');
        }
        result
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
