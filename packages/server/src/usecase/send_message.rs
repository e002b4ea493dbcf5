//! UseCase: メッセージ送信処理（OnSend）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 空メッセージの破棄、永続化してからのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 空・空白のみのメッセージが保存もブロードキャストもされないことを保証
//! - 保存に失敗したメッセージがブロードキャストされないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト（送信者を含む全員）
//! - エッジケース：空白のみの本文、参加名と異なる送信者名
//! - 異常系：ストレージ障害

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatEvent, ChatMessage, DisplayedMessage, MessageBody, MessagePusher, MessageRepository,
    Timestamp,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（メッセージ履歴の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// The author is taken as supplied, without checking it against the roster or
    /// the name the connection joined with.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ChatMessage))` - stored and broadcast
    /// * `Ok(None)` - blank body, silently discarded
    /// * `Err(SendMessageError)` - storage or transport failure
    pub async fn execute(
        &self,
        author: &str,
        body: &str,
    ) -> Result<Option<ChatMessage>, SendMessageError> {
        let Ok(body) = MessageBody::new(body.to_string()) else {
            tracing::debug!("Discarding blank message from '{}'", author);
            return Ok(None);
        };

        let message = ChatMessage::compose(
            author.to_string(),
            body,
            Timestamp::new(self.clock.now_utc()),
        );

        // 1. 永続化（失敗したらブロードキャストしない）
        self.repository
            .append(message.clone())
            .await
            .map_err(SendMessageError::Persist)?;

        // 2. 送信者を含む全員にブロードキャスト
        self.message_pusher
            .broadcast(&ChatEvent::MessageReceived(DisplayedMessage::from_live(
                &message,
            )))
            .await
            .map_err(SendMessageError::Broadcast)?;

        tracing::debug!("Broadcasted message {} from '{}'", message.id, author);
        Ok(Some(message))
    }
}
