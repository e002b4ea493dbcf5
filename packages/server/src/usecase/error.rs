//! UseCase 層のエラー定義
//!
//! Collaborator failures are passed through to the caller; the use cases do not
//! retry and leave nothing to roll back.

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError};

/// Errors returned by the join use case
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// Broadcasting the join notice or roster failed
    #[error("failed to broadcast join: {0}")]
    Broadcast(MessagePushError),

    /// Loading the history failed
    #[error("failed to load history: {0}")]
    History(RepositoryError),

    /// Delivering the history to the caller failed
    #[error("failed to deliver history: {0}")]
    Delivery(MessagePushError),
}

/// Errors returned by the send use case
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// The message could not be stored; nothing was broadcast
    #[error("failed to persist message: {0}")]
    Persist(RepositoryError),

    /// The message was stored but the broadcast failed
    #[error("failed to broadcast message: {0}")]
    Broadcast(MessagePushError),
}
