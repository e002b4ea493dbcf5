//! Domain layer for the chat relay.
//!
//! This module contains the presence registry, the message model and the
//! collaborator interfaces. It is independent of DTOs and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod presence;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::ChatMessage;
pub use error::{MessagePushError, RepositoryError, SessionError, ValueObjectError};
pub use event::{ChatEvent, DisplayedMessage};
pub use factory::{ConnectionIdFactory, MessageIdFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use presence::{Departure, PresenceRegistry};
pub use repository::MessageRepository;
#[cfg(test)]
pub use repository::MockMessageRepository;
pub use session::SessionState;
pub use value_object::{
    ConnectionId, DisplayName, FALLBACK_DISPLAY_NAME, MessageBody, MessageId, Timestamp,
};
