//! Server state shared by all handlers.

use std::sync::Arc;

use crate::{domain::MessagePusher, usecase::ChatSessionCoordinator};

/// Shared application state
pub struct AppState {
    /// ChatSessionCoordinator（接続ライフサイクルの窓口）
    pub coordinator: Arc<ChatSessionCoordinator>,
    /// MessagePusher（イベント通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
}
