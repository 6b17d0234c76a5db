//! Wire protocol: every line the server sends to a player.
//!
//! The protocol is line-oriented text. Each [`Notice`] displays as exactly
//! one line without its terminator; board renders follow `CurrentBoard` and
//! `FinalBoard` as three more lines.

use crate::games::tictactoe::Mark;
use derive_more::Display;

/// Outbound status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Notice {
    /// Tells a player which mark they play.
    #[display("You are player {_0}")]
    Assigned(Mark),
    /// Sent to the first arrival of a pair.
    #[display("Waiting for another player to connect...")]
    AwaitingOpponentConnection,
    /// Sent to the player who is not on move.
    #[display("Waiting for opponent's move...")]
    AwaitingOpponentMove,
    /// Precedes a board render during play.
    #[display("Current board:")]
    CurrentBoard,
    /// Prompts the active player for a `row col` line.
    #[display("Your turn to move!")]
    YourTurn,
    /// The last line was not a playable move.
    #[display("Invalid position! Try again!")]
    InvalidPosition,
    /// Outcome for the winner.
    #[display("YOU WON!")]
    Won,
    /// Outcome for the loser.
    #[display("YOU LOST!")]
    Lost,
    /// Outcome for both players on a full board.
    #[display("IT'S A DRAW!")]
    Draw,
    /// Precedes the board render after the game ends.
    #[display("Final board:")]
    FinalBoard,
    /// Last line of a finished match.
    #[display("Terminating connection...")]
    Terminating,
    /// Last line when the peer disconnected mid-match.
    #[display("The other player has left! Terminating connection...")]
    OpponentLeft,
}

impl Notice {
    /// Lines after which the client is expected to answer with a move.
    pub fn expects_move(line: &str) -> bool {
        line.starts_with(&Notice::YourTurn.to_string())
            || line.starts_with(&Notice::InvalidPosition.to_string())
    }

    /// Lines after which the server closes the connection.
    pub fn ends_session(line: &str) -> bool {
        line.starts_with(&Notice::Terminating.to_string())
            || line.starts_with(&Notice::OpponentLeft.to_string())
    }
}
