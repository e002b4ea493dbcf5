//! UseCase: 参加処理（OnJoin）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 表示名の正規化、Presence Registry への登録、イベントの送信順序
//!
//! ### なぜこのテストが必要か
//! - join / roster のブロードキャストが履歴配信より先に行われることを保証
//! - 履歴が参加した接続だけに送られる（ブロードキャストされない）ことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加、同名での複数接続
//! - エッジケース：空の表示名、ゼロ値の保存時刻、履歴件数の上限
//! - 異常系：ストレージ障害

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatEvent, ConnectionId, DisplayName, DisplayedMessage, MessagePusher, MessageRepository,
    PresenceRegistry, Timestamp,
};

use super::error::JoinError;

/// Number of history messages delivered to a joining connection
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// 参加のユースケース
pub struct JoinChatUseCase {
    /// Presence Registry（接続中の表示名の管理）
    registry: Arc<PresenceRegistry>,
    /// Repository（メッセージ履歴の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    history_limit: usize,
}

impl JoinChatUseCase {
    /// 新しい JoinChatUseCase を作成
    pub fn new(
        registry: Arc<PresenceRegistry>,
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        Self {
            registry,
            repository,
            message_pusher,
            clock,
            history_limit,
        }
    }

    /// 参加を実行
    ///
    /// 1. normalize the raw name
    /// 2. register the connection in the registry (a connection that was
    ///    registered under another name announces `user-left` for it if it was
    ///    the last one there)
    /// 3. broadcast `user-joined`, then `roster-updated`
    /// 4. send the recent history to the caller only
    ///
    /// # Returns
    ///
    /// * `Ok(DisplayName)` - the name the connection joined under
    /// * `Err(JoinError)` - a collaborator failed (the registration stays in place
    ///   and is cleaned up by the disconnect)
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
    ) -> Result<DisplayName, JoinError> {
        let name = DisplayName::normalize(raw_name);

        let moved = self.registry.join(name.clone(), connection_id.clone());
        tracing::info!("Connection '{}' joined as '{}'", connection_id, name);

        if let Some(departure) = moved
            && departure.became_empty
        {
            self.message_pusher
                .broadcast(&ChatEvent::UserLeft(departure.name))
                .await
                .map_err(JoinError::Broadcast)?;
        }

        self.message_pusher
            .broadcast(&ChatEvent::UserJoined(name.clone()))
            .await
            .map_err(JoinError::Broadcast)?;
        self.message_pusher
            .broadcast(&ChatEvent::RosterUpdated(self.registry.roster()))
            .await
            .map_err(JoinError::Broadcast)?;

        let history = self.load_history().await?;
        tracing::debug!(
            "Sending {} history message(s) to '{}'",
            history.len(),
            connection_id
        );
        self.message_pusher
            .push_to(&connection_id, &ChatEvent::HistoryLoaded(history))
            .await
            .map_err(JoinError::Delivery)?;

        Ok(name)
    }

    /// 直近の履歴を表示用に取得（古い順）
    async fn load_history(&self) -> Result<Vec<DisplayedMessage>, JoinError> {
        let messages = self
            .repository
            .recent_messages(self.history_limit)
            .await
            .map_err(JoinError::History)?;

        let now = Timestamp::new(self.clock.now_utc());
        Ok(messages
            .into_iter()
            .map(|message| DisplayedMessage::from_history(message, now))
            .collect())
    }
}
