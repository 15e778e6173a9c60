use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

use super::SessionPhase;

/// Reasons a session refuses a request. None of them mutate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionError {
    #[error("session is {phase} and not accepting this input")]
    NotAcceptingInput { phase: SessionPhase },

    #[error("no resolved move is waiting to settle")]
    NothingToSettle,

    #[error("insufficient funds: {required} required, {available} available")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("no snapshot left to undo")]
    HistoryEmpty,

    #[error("no tile at {0}")]
    EmptyCell(Position),

    #[error("cannot destroy the last tile on the board")]
    LastTile,

    #[error("swap needs two distinct cells, got {0} twice")]
    SameCell(Position),
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAcceptingInput { .. } => ErrorSeverity::Rejected,
            Self::NothingToSettle => ErrorSeverity::Internal,
            Self::InsufficientFunds { .. }
            | Self::HistoryEmpty
            | Self::EmptyCell(_)
            | Self::LastTile
            | Self::SameCell(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAcceptingInput { .. } => "NOT_ACCEPTING_INPUT",
            Self::NothingToSettle => "NOTHING_TO_SETTLE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::HistoryEmpty => "HISTORY_EMPTY",
            Self::EmptyCell(_) => "EMPTY_CELL",
            Self::LastTile => "LAST_TILE",
            Self::SameCell(_) => "SAME_CELL",
        }
    }
}
