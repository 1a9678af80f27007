use core::fmt;
use serde::{Deserialize, Serialize};

/// Per-competitor automaton state. Exactly one holds at any instant.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    Inactive,
    BeingScrambled,
    Scrambling,
    Waiting,
    TakingTurn,
    Won,
    Lost,
    Tied,
}

impl Status {
    /// Terminal for the round; only a reset exits these.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Won | Status::Lost | Status::Tied)
    }

    /// Statuses whose countdown timer is running.
    pub fn is_running(self) -> bool {
        matches!(self, Status::Scrambling | Status::TakingTurn)
    }

    /// Class name handed to the rendering sink.
    pub fn class(self) -> &'static str {
        match self {
            Status::Inactive => "inactive",
            Status::BeingScrambled => "being-scrambled",
            Status::Scrambling => "scrambling",
            Status::Waiting => "waiting",
            Status::TakingTurn => "taking-turn",
            Status::Won => "won",
            Status::Lost => "lost",
            Status::Tied => "tied",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class())
    }
}

/// Round-wide macro-state, coarser than per-competitor status.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Scrambling,
    Solving,
}

/// The face a move turns. The first move of a turn locks the family for the
/// rest of that turn.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MoveFamily {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl MoveFamily {
    pub fn letter(self) -> char {
        match self {
            MoveFamily::U => 'U',
            MoveFamily::D => 'D',
            MoveFamily::L => 'L',
            MoveFamily::R => 'R',
            MoveFamily::F => 'F',
            MoveFamily::B => 'B',
        }
    }
}

impl fmt::Display for MoveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One discrete sensor move: a face family plus a signed quarter-turn count.
/// `amount` is positive for clockwise turns; coalescing sums magnitudes, so
/// amounts beyond ±2 can appear in a logged sequence.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Move {
    pub family: MoveFamily,
    pub amount: i8,
}

impl Move {
    pub fn cw(family: MoveFamily) -> Self {
        Move { family, amount: 1 }
    }

    pub fn ccw(family: MoveFamily) -> Self {
        Move { family, amount: -1 }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mag = self.amount.unsigned_abs();
        match (mag, self.amount < 0) {
            (1, false) => write!(f, "{}", self.family),
            (1, true) => write!(f, "{}'", self.family),
            (n, false) => write!(f, "{}{}", self.family, n),
            (n, true) => write!(f, "{}{}'", self.family, n),
        }
    }
}

/// Terminal outcome a competitor reports for itself.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    Won,
    Lost,
    Tied,
}

/// Message a competitor operation hands back to the orchestrator instead of
/// calling into it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompetitorSignal {
    /// Voluntary turn completion (turn-end trigger).
    TurnDone,
    /// The competitor reached a terminal status on its own.
    Finished(Verdict),
}

/// Snapshot handed to the rendering sink; never read back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayState {
    pub time_text: String,
    pub move_count: u32,
    pub status_class: &'static str,
    pub solution: String,
}
