//! Events the relay emits to connected clients.

use super::{
    entity::ChatMessage,
    value_object::{DisplayName, Timestamp},
};

/// A message as shown to clients: author, body and the time it is displayed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedMessage {
    pub author: String,
    pub body: String,
    pub sent_at: Timestamp,
}

impl DisplayedMessage {
    /// Display a message that was just created.
    pub fn from_live(message: &ChatMessage) -> Self {
        Self {
            author: message.author.clone(),
            body: message.body.clone(),
            sent_at: message.timestamp,
        }
    }

    /// Display a message loaded from history.
    ///
    /// An implausible stored timestamp (zeroed or missing) is shown as `now`.
    /// The stored record itself is left untouched.
    pub fn from_history(message: ChatMessage, now: Timestamp) -> Self {
        let sent_at = if message.timestamp.is_plausible() {
            message.timestamp
        } else {
            now
        };
        Self {
            author: message.author,
            body: message.body,
            sent_at,
        }
    }
}

/// Named events delivered over the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Someone joined (broadcast)
    UserJoined(DisplayName),
    /// Sorted, distinct display names currently present (broadcast)
    RosterUpdated(Vec<DisplayName>),
    /// Recent history, oldest first (caller only)
    HistoryLoaded(Vec<DisplayedMessage>),
    /// A new message (broadcast, sender included)
    MessageReceived(DisplayedMessage),
    /// The last connection of a name went away (broadcast)
    UserLeft(DisplayName),
}

impl ChatEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserJoined(_) => "user-joined",
            Self::RosterUpdated(_) => "roster-updated",
            Self::HistoryLoaded(_) => "history-loaded",
            Self::MessageReceived(_) => "message-received",
            Self::UserLeft(_) => "user-left",
        }
    }
}
