//! Core domain models for the chat relay.

use super::{
    factory::MessageIdFactory,
    value_object::{MessageBody, MessageId, Timestamp},
};

/// A persisted chat message.
///
/// Immutable once created. The author is free text supplied by the sender and
/// is not required to match any display name currently in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message identifier
    pub id: MessageId,
    /// Author name as supplied by the sender
    pub author: String,
    /// Message text
    pub body: String,
    /// Creation time (UTC)
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Compose a new message with a fresh identifier.
    ///
    /// Taking a [`MessageBody`] guarantees new messages are never blank.
    pub fn compose(author: String, body: MessageBody, timestamp: Timestamp) -> Self {
        Self {
            id: MessageIdFactory::generate(),
            author,
            body: body.into_string(),
            timestamp,
        }
    }

    /// Rebuild a message loaded from storage, as stored.
    pub fn restore(id: MessageId, author: String, body: String, timestamp: Timestamp) -> Self {
        Self {
            id,
            author,
            body,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_compose_assigns_unique_ids() {
        // テスト項目: 新しいメッセージごとに異なる ID が割り当てられる
        // given (前提条件):
        let timestamp = Timestamp::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let body = MessageBody::new("Hello".to_string()).unwrap();

        // when (操作):
        let first = ChatMessage::compose("alice".to_string(), body.clone(), timestamp);
        let second = ChatMessage::compose("alice".to_string(), body, timestamp);

        // then (期待する結果):
        assert_ne!(first.id, second.id);
        assert_eq!(first.author, "alice");
        assert_eq!(first.body, "Hello");
        assert_eq!(first.timestamp, timestamp);
    }
}
