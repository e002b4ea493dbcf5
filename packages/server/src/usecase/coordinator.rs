//! Chat session coordinator.
//!
//! Single entry point for the transport layer. Bundles the join, send and leave
//! use cases over one shared presence registry.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, Departure, DisplayName, MessagePusher, MessageRepository,
    PresenceRegistry,
};

use super::{
    error::{JoinError, SendMessageError},
    join_chat::JoinChatUseCase,
    leave_chat::LeaveChatUseCase,
    send_message::SendMessageUseCase,
};

/// Handles the lifecycle events of every connection.
///
/// Safe to share between connection tasks (`Arc<ChatSessionCoordinator>`); the
/// registry is the only mutable shared state.
pub struct ChatSessionCoordinator {
    registry: Arc<PresenceRegistry>,
    join_chat: JoinChatUseCase,
    send_message: SendMessageUseCase,
    leave_chat: LeaveChatUseCase,
}

impl ChatSessionCoordinator {
    /// Create a coordinator over the given collaborators.
    ///
    /// # Arguments
    ///
    /// * `registry` - Presence registry shared by all connections
    /// * `repository` - Message history storage
    /// * `message_pusher` - Transport used for broadcast and direct delivery
    /// * `clock` - Source of message and display timestamps
    /// * `history_limit` - Number of recent messages sent to a joining connection
    pub fn new(
        registry: Arc<PresenceRegistry>,
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        Self {
            join_chat: JoinChatUseCase::new(
                registry.clone(),
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                history_limit,
            ),
            send_message: SendMessageUseCase::new(repository, message_pusher.clone(), clock),
            leave_chat: LeaveChatUseCase::new(registry.clone(), message_pusher),
            registry,
        }
    }

    /// A connection announced its display name.
    pub async fn on_join(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
    ) -> Result<DisplayName, JoinError> {
        self.join_chat.execute(connection_id, raw_name).await
    }

    /// A message was sent under `author`.
    pub async fn on_send(
        &self,
        author: &str,
        body: &str,
    ) -> Result<Option<ChatMessage>, SendMessageError> {
        self.send_message.execute(author, body).await
    }

    /// The transport closed a connection. Never fails.
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) -> Option<Departure> {
        self.leave_chat.execute(connection_id).await
    }

    /// Current roster snapshot.
    pub fn roster(&self) -> Vec<DisplayName> {
        self.registry.roster()
    }
}
