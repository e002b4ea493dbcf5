//! WebSocket message DTOs for the chat relay.

use serde::{Deserialize, Serialize};

/// Server → client message type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    UserJoined,
    RosterUpdated,
    HistoryLoaded,
    MessageReceived,
    UserLeft,
}

/// One displayed chat line. `timestamp` is the UTC time of day (`HH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub user: String,
    pub message: String,
    pub timestamp: String,
}

/// Someone joined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJoinedMessage {
    pub r#type: MessageType,
    pub name: String,
}

/// Sorted, distinct display names currently online
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterUpdatedMessage {
    pub r#type: MessageType,
    pub users: Vec<String>,
}

/// Recent history, oldest first (sent to the joining connection only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryLoadedMessage {
    pub r#type: MessageType,
    pub messages: Vec<ChatLine>,
}

/// A new chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReceivedMessage {
    pub r#type: MessageType,
    #[serde(flatten)]
    pub line: ChatLine,
}

/// The last connection of a name went away
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLeftMessage {
    pub r#type: MessageType,
    pub name: String,
}

/// Client → server messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Announce a display name
    Join { name: String },
    /// Send a chat message under `user`
    Send { user: String, message: String },
}
