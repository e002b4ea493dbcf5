//! Identifier factories.
//!
//! Identifiers are generated here rather than in the value objects so the
//! value objects stay plain data.

use uuid::Uuid;

use super::value_object::{ConnectionId, MessageId};

/// Factory for transport-assigned connection identifiers
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new random (UUID v4) ConnectionId
    pub fn generate() -> ConnectionId {
        ConnectionId::from(Uuid::new_v4())
    }
}

/// Factory for persisted message identifiers
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new random (UUID v4) MessageId
    pub fn generate() -> MessageId {
        MessageId::new(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_connection_ids_are_unique() {
        // テスト項目: 生成された ConnectionId が重複しない
        // given (前提条件):
        let count = 1000;

        // when (操作):
        let ids: HashSet<ConnectionId> =
            (0..count).map(|_| ConnectionIdFactory::generate()).collect();

        // then (期待する結果):
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_generate_connection_id_is_uuid() {
        // テスト項目: ConnectionId が UUID 形式である
        // given (前提条件):
        let id = ConnectionIdFactory::generate();

        // when (操作):
        let parsed = Uuid::parse_str(id.as_str());

        // then (期待する結果):
        assert!(parsed.is_ok());
    }
}
