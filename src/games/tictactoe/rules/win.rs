//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark};
use tracing::instrument;

/// Every winning line as `(row, col)` triples, in evaluation order:
/// both diagonals, then rows top to bottom, then columns left to right.
pub const LINES: [[(usize, usize); 3]; 8] = [
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
];

/// Checks if there is a winner on the board.
///
/// Returns the mark of the first completed line in [`LINES`] order,
/// `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|[a, b, c]| {
        let first = board.cell(a.0, a.1)?;
        if first != Cell::Empty
            && Some(first) == board.cell(b.0, b.1)
            && Some(first) == board.cell(c.0, c.1)
        {
            first.mark()
        } else {
            None
        }
    })
}
