//! Conversion logic between domain events and wire DTOs.

use crate::domain::{ChatEvent, DisplayName, DisplayedMessage};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<&DisplayedMessage> for dto::ChatLine {
    fn from(message: &DisplayedMessage) -> Self {
        Self {
            user: message.author.clone(),
            message: message.body.clone(),
            timestamp: message.sent_at.time_of_day(),
        }
    }
}

fn names_to_strings(names: &[DisplayName]) -> Vec<String> {
    names.iter().map(|name| name.as_str().to_string()).collect()
}

/// Encode a domain event as the JSON text frame sent to clients.
pub fn encode_event(event: &ChatEvent) -> Result<String, serde_json::Error> {
    match event {
        ChatEvent::UserJoined(name) => serde_json::to_string(&dto::UserJoinedMessage {
            r#type: dto::MessageType::UserJoined,
            name: name.as_str().to_string(),
        }),
        ChatEvent::RosterUpdated(names) => serde_json::to_string(&dto::RosterUpdatedMessage {
            r#type: dto::MessageType::RosterUpdated,
            users: names_to_strings(names),
        }),
        ChatEvent::HistoryLoaded(messages) => serde_json::to_string(&dto::HistoryLoadedMessage {
            r#type: dto::MessageType::HistoryLoaded,
            messages: messages.iter().map(dto::ChatLine::from).collect(),
        }),
        ChatEvent::MessageReceived(message) => {
            serde_json::to_string(&dto::MessageReceivedMessage {
                r#type: dto::MessageType::MessageReceived,
                line: message.into(),
            })
        }
        ChatEvent::UserLeft(name) => serde_json::to_string(&dto::UserLeftMessage {
            r#type: dto::MessageType::UserLeft,
            name: name.as_str().to_string(),
        }),
    }
}

/// Decode a client text frame.
pub fn decode_client_message(text: &str) -> Result<dto::ClientMessage, serde_json::Error> {
    serde_json::from_str(text)
}
