//! Match session: one game between two endpoints, from pairing to teardown.
//!
//! The session owns its [`Board`] and both player endpoints outright. Only
//! the active slot's endpoint is ever read, so nothing here is shared or
//! locked.

use crate::endpoint::{Endpoint, EndpointError};
use crate::games::tictactoe::{Board, Move, MoveError, Outcome, Slot};
use crate::protocol::Notice;
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Where a session is in its turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Waiting for the given slot to send a valid move.
    AwaitingMove(Slot),
    /// The slot's move is on the board; outcome not yet evaluated.
    MoveApplied(Slot),
    /// Terminal. No transitions leave this state.
    Finished(Outcome),
}

/// An endpoint failed mid-match. Fatal to this match only.
#[derive(Debug, Display, Error)]
#[display("Player in slot {slot} is unreachable: {source}")]
pub struct PlayerDisconnected {
    /// Slot whose endpoint failed.
    pub slot: Slot,
    /// Underlying channel failure.
    pub source: EndpointError,
}

/// Summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    /// Match identifier used in logs.
    pub match_id: u64,
    /// Final result, or `None` when a player left first.
    pub outcome: Option<Outcome>,
    /// Moves applied to the board.
    pub moves: usize,
    /// Slot whose endpoint failed, if the match was abandoned.
    pub abandoned_by: Option<Slot>,
}

/// One tic-tac-toe match between two player endpoints.
#[derive(Debug)]
pub struct MatchSession<E> {
    id: u64,
    board: Board,
    players: [E; 2],
    state: MatchState,
    moves: usize,
}

impl<E: Endpoint> MatchSession<E> {
    /// Creates a session. `first` plays X and moves first, `second` plays O.
    pub fn new(first: E, second: E) -> Self {
        Self::with_id(0, first, second)
    }

    /// Creates a session with an identifier for log correlation.
    pub fn with_id(id: u64, first: E, second: E) -> Self {
        Self {
            id,
            board: Board::new(),
            players: [first, second],
            state: MatchState::AwaitingMove(Slot::First),
            moves: 0,
        }
    }

    /// Current state of the turn loop.
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// The session's board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Plays the match to completion and closes both endpoints.
    ///
    /// Never fails: a lost endpoint ends the match through the
    /// "other player has left" path and is reported in the
    /// [`MatchReport`].
    #[instrument(skip(self), fields(match_id = self.id))]
    pub async fn run(mut self) -> MatchReport {
        info!(
            first = self.players[0].label(),
            second = self.players[1].label(),
            "Match started"
        );

        match self.play().await {
            Ok(outcome) => {
                info!(%outcome, moves = self.moves, "Match finished");
                self.report(Some(outcome), None)
            }
            Err(failure) => {
                warn!(slot = %failure.slot, error = %failure.source, "Player left, abandoning match");
                self.abandon(failure.slot).await;
                self.report(None, Some(failure.slot))
            }
        }
    }

    fn report(&self, outcome: Option<Outcome>, abandoned_by: Option<Slot>) -> MatchReport {
        MatchReport {
            match_id: self.id,
            outcome,
            moves: self.moves,
            abandoned_by,
        }
    }

    /// Normal path: turn loop, then end-of-game messaging and teardown.
    async fn play(&mut self) -> Result<Outcome, PlayerDisconnected> {
        self.send(Slot::First, Notice::Assigned(Slot::First.mark()))
            .await?;
        self.send(Slot::Second, Notice::Assigned(Slot::Second.mark()))
            .await?;
        self.send(Slot::Second, Notice::AwaitingOpponentMove).await?;

        let mut slot = Slot::First;
        let outcome = loop {
            self.state = MatchState::AwaitingMove(slot);
            self.send_board(slot).await?;
            self.send(slot, Notice::YourTurn).await?;

            let mv = self.read_move(slot).await?;
            self.board.apply_move(slot, mv.row, mv.col);
            self.moves += 1;
            self.state = MatchState::MoveApplied(slot);
            debug!(%slot, row = mv.row, col = mv.col, moves = self.moves, "Move applied");

            if let Some(outcome) = self.board.outcome() {
                self.state = MatchState::Finished(outcome);
                break outcome;
            }

            self.send_board(slot).await?;
            self.send(slot, Notice::AwaitingOpponentMove).await?;
            slot = slot.other();
        };

        self.finish(outcome).await?;
        Ok(outcome)
    }

    /// Reads lines from `slot` until one is a playable move.
    ///
    /// Malformed, over-long or rejected lines get a retry notice, with no
    /// limit on attempts. Only an endpoint failure ends the wait.
    #[instrument(skip(self), fields(match_id = self.id))]
    async fn read_move(&mut self, slot: Slot) -> Result<Move, PlayerDisconnected> {
        loop {
            let line = match self.endpoint(slot).recv_line().await {
                Ok(line) => line,
                Err(EndpointError::LineTooLong) => {
                    debug!(%slot, "Over-long line, asking again");
                    self.send(slot, Notice::InvalidPosition).await?;
                    continue;
                }
                Err(source) => return Err(PlayerDisconnected { slot, source }),
            };
            match self.validate(&line) {
                Ok(mv) => return Ok(mv),
                Err(err) => {
                    debug!(%slot, line = %line, error = %err, "Invalid move, asking again");
                    self.send(slot, Notice::InvalidPosition).await?;
                }
            }
        }
    }

    fn validate(&self, line: &str) -> Result<Move, MoveError> {
        let mv = Move::parse(line)?;
        if self.board.is_valid_move(mv.row, mv.col) {
            Ok(mv)
        } else {
            Err(MoveError::Rejected {
                row: mv.row,
                col: mv.col,
            })
        }
    }

    /// End-of-game messaging: outcome, final board, termination, close.
    async fn finish(&mut self, outcome: Outcome) -> Result<(), PlayerDisconnected> {
        match outcome.winning_slot() {
            Some(winner) => {
                self.send(winner, Notice::Won).await?;
                self.send(winner.other(), Notice::Lost).await?;
            }
            None => {
                for slot in Slot::BOTH {
                    self.send(slot, Notice::Draw).await?;
                }
            }
        }

        for slot in Slot::BOTH {
            self.send_final_board(slot).await?;
        }

        for slot in Slot::BOTH {
            self.send(slot, Notice::Terminating).await?;
        }

        self.close_all().await;
        Ok(())
    }

    /// Failure path: tell the surviving player, then close both endpoints
    /// regardless of what fails along the way.
    async fn abandon(&mut self, departed: Slot) {
        let survivor = departed.other();
        if let Err(err) = self
            .endpoint(survivor)
            .send_notice(Notice::OpponentLeft)
            .await
        {
            debug!(slot = %survivor, error = %err, "Could not notify remaining player");
        }
        self.close_all().await;
    }

    async fn close_all(&mut self) {
        for slot in Slot::BOTH {
            if let Err(err) = self.endpoint(slot).close().await {
                debug!(%slot, error = %err, "Error while closing endpoint");
            }
        }
    }

    fn endpoint(&mut self, slot: Slot) -> &mut E {
        &mut self.players[slot.index()]
    }

    async fn send(&mut self, slot: Slot, notice: Notice) -> Result<(), PlayerDisconnected> {
        self.endpoint(slot)
            .send_notice(notice)
            .await
            .map_err(|source| PlayerDisconnected { slot, source })
    }

    async fn send_board(&mut self, slot: Slot) -> Result<(), PlayerDisconnected> {
        self.send(slot, Notice::CurrentBoard).await?;
        self.players[slot.index()]
            .send_board(&self.board)
            .await
            .map_err(|source| PlayerDisconnected { slot, source })
    }

    async fn send_final_board(&mut self, slot: Slot) -> Result<(), PlayerDisconnected> {
        self.send(slot, Notice::FinalBoard).await?;
        self.players[slot.index()]
            .send_board(&self.board)
            .await
            .map_err(|source| PlayerDisconnected { slot, source })
    }
}
