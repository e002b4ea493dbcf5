//! UseCase: 切断処理（OnDisconnect）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatUseCase::execute() メソッド
//! - 最後の接続が切れたときだけ user-left / roster を通知すること
//!
//! ### なぜこのテストが必要か
//! - 同じ名前の別タブが残っている間は退室通知が出ないことを保証
//! - 切断処理がトランスポートの後始末を失敗させないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：最後の接続の切断
//! - エッジケース：同名の接続が残っている切断、未参加の接続の切断
//! - 異常系：ブロードキャスト失敗（ログのみ）

use std::sync::Arc;

use crate::domain::{ChatEvent, ConnectionId, Departure, MessagePusher, PresenceRegistry};

/// 切断のユースケース
pub struct LeaveChatUseCase {
    /// Presence Registry（接続中の表示名の管理）
    registry: Arc<PresenceRegistry>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveChatUseCase {
    /// 新しい LeaveChatUseCase を作成
    pub fn new(registry: Arc<PresenceRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// Never fails: broadcast errors are logged and swallowed so the transport
    /// teardown always completes.
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - the connection had joined
    /// * `None` - the connection never joined (no-op)
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let Some(departure) = self.registry.leave(connection_id) else {
            tracing::debug!(
                "Connection '{}' closed without joining, nothing to do",
                connection_id
            );
            return None;
        };

        if !departure.became_empty {
            tracing::info!(
                "Connection '{}' of '{}' closed, other connections remain",
                connection_id,
                departure.name
            );
            return Some(departure);
        }

        tracing::info!(
            "'{}' left (last connection '{}' closed)",
            departure.name,
            connection_id
        );
        if let Err(e) = self
            .message_pusher
            .broadcast(&ChatEvent::UserLeft(departure.name.clone()))
            .await
        {
            tracing::error!("Failed to broadcast user-left for '{}': {}", departure.name, e);
        }
        if let Err(e) = self
            .message_pusher
            .broadcast(&ChatEvent::RosterUpdated(self.registry.roster()))
            .await
        {
            tracing::error!("Failed to broadcast roster after '{}' left: {}", departure.name, e);
        }

        Some(departure)
    }
}
