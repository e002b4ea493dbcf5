//! Test doubles shared by the use-case tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{ChatEvent, ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// Who an event was addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    All,
    Only(ConnectionId),
}

/// MessagePusher that records every event in delivery order.
#[derive(Default)]
pub struct RecordingPusher {
    events: Mutex<Vec<(Audience, ChatEvent)>>,
    fail_broadcasts: bool,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pusher whose broadcasts always fail.
    pub fn failing() -> Self {
        Self {
            fail_broadcasts: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<(Audience, ChatEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<ChatEvent> {
        self.events()
            .into_iter()
            .filter(|(audience, _)| *audience == Audience::All)
            .map(|(_, event)| event)
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {
        // No-op for mock
    }

    async fn unregister_client(&self, _connection_id: &ConnectionId) {
        // No-op for mock
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError> {
        self.events
            .lock()
            .unwrap()
            .push((Audience::Only(connection_id.clone()), event.clone()));
        Ok(())
    }

    async fn broadcast(&self, event: &ChatEvent) -> Result<(), MessagePushError> {
        if self.fail_broadcasts {
            return Err(MessagePushError::PushFailed("channel closed".to_string()));
        }
        self.events
            .lock()
            .unwrap()
            .push((Audience::All, event.clone()));
        Ok(())
    }
}
