use thiserror::Error;

use crate::types::Status;

/// Failures surfaced by the duel core.
///
/// Invalid transitions are reportable values, not aborts: out-of-order
/// external signals (a late key press, a stray sensor event) can produce
/// them during normal operation. A failed operation leaves the competitor's
/// status, remaining time, and move counter untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DuelError {
    /// A status change was requested from a state outside its legal set.
    #[error("competitor {index}: illegal transition {from} -> {to}")]
    InvalidTransition {
        index: usize,
        from: Status,
        to: Status,
    },

    /// An operation with a declared status precondition was invoked outside
    /// that set (e.g. a time tick on a finished competitor).
    #[error("competitor {index}: {op} is not legal while {from}")]
    IllegalOperation {
        index: usize,
        op: &'static str,
        from: Status,
    },

    /// A round needs at least two registered competitors.
    #[error("need at least two competitors to start a round, have {count}")]
    NotEnoughCompetitors { count: usize },

    /// Input was routed to a competitor slot that does not exist.
    #[error("no competitor at index {index}")]
    UnknownCompetitor { index: usize },
}
