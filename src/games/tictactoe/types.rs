//! Core domain types for tic-tac-toe.

use derive_more::Display;

/// Mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(test, derive(strum::EnumIter))]
pub enum Mark {
    /// Mark X (slot 0, moves first).
    #[display("X")]
    X,
    /// Mark O (slot 1).
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Returns the slot that plays this mark.
    pub fn slot(self) -> Slot {
        match self {
            Mark::X => Slot::First,
            Mark::O => Slot::Second,
        }
    }
}

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nothing placed yet.
    #[default]
    Empty,
    /// Cell holds a mark. Never reverts to empty.
    Occupied(Mark),
}

impl Cell {
    /// Single-character symbol used in board renders.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Occupied(Mark::X) => 'X',
            Cell::Occupied(Mark::O) => 'O',
        }
    }

    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// Player ordinal within a match, fixed by connection arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Slot {
    /// Slot 0, first to connect, plays X.
    #[display("0")]
    First,
    /// Slot 1, second to connect, plays O.
    #[display("1")]
    Second,
}

impl Slot {
    /// Both slots in arrival order.
    pub const BOTH: [Slot; 2] = [Slot::First, Slot::Second];

    /// Maps an ordinal to a slot. Only 0 and 1 are slots.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Slot::First),
            1 => Some(Slot::Second),
            _ => None,
        }
    }

    /// Ordinal of this slot (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    /// Mark played by this slot.
    pub fn mark(self) -> Mark {
        match self {
            Slot::First => Mark::X,
            Slot::Second => Mark::O,
        }
    }

    /// The other slot in the match.
    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

/// Terminal result of a match. Computed once, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Outcome {
    /// A mark completed a line.
    #[display("{_0} wins")]
    Winner(Mark),
    /// Board filled with no completed line.
    #[display("draw")]
    Draw,
}

impl Outcome {
    /// Slot that won, if the match did not end in a draw.
    pub fn winning_slot(self) -> Option<Slot> {
        match self {
            Outcome::Winner(mark) => Some(mark.slot()),
            Outcome::Draw => None,
        }
    }
}
