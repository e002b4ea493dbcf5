//! Repository trait 定義
//!
//! ドメイン層が必要とするメッセージ履歴ストレージのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChatMessage, RepositoryError};

/// Message Repository trait
///
/// Append-only log of chat messages. The relay never updates or deletes records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追加
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// 直近 `limit` 件のメッセージを取得（古い順）
    ///
    /// Ordered by timestamp ascending; messages with equal timestamps keep
    /// their append order.
    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError>;
}
