//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and the session so
//! clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ErrorSeverity, GameError, SessionError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl RuntimeError {
    /// Severity of the underlying failure, for deciding what to show the
    /// player. Channel and I/O failures are internal.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Session(error) => error.severity(),
            _ => ErrorSeverity::Internal,
        }
    }

    /// The session error, if this is a refused request.
    pub fn as_session(&self) -> Option<&SessionError> {
        match self {
            Self::Session(error) => Some(error),
            _ => None,
        }
    }
}
