//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections, worker coordination failures, and repository
//! errors so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::PersistenceError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine rejected or failed the action; committed state is
    /// untouched.
    #[error(transparent)]
    Engine(#[from] combat_core::ExecuteError),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The engine returned a result variant the submitting helper did not
    /// expect. Indicates a wiring bug, not a player error.
    #[error("unexpected engine result for {action}")]
    UnexpectedResult { action: &'static str },
}
