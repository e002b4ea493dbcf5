//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// MessageBody validation error
    #[error("MessageBody cannot be empty or whitespace-only")]
    MessageBodyBlank,

    /// MessageId invalid format error (not a valid UUID format)
    #[error("MessageId must be a valid UUID format (got: {0})")]
    MessageIdInvalidFormat(String),
}

/// Errors reported by the message storage collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The storage backend could not be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A query failed or returned data that could not be mapped
    #[error("storage query failed: {0}")]
    Query(String),
}

/// Errors reported by the transport collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// The target connection is not registered with the pusher
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// The outbound channel of the connection is closed
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// The event could not be encoded for the wire
    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// Errors related to the per-connection session lifecycle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The connection already announced a display name
    #[error("connection already joined as '{0}'")]
    AlreadyJoined(String),

    /// The connection has not announced a display name yet
    #[error("connection has not joined yet")]
    NotJoined,

    /// The connection is closed
    #[error("connection is disconnected")]
    Disconnected,
}
