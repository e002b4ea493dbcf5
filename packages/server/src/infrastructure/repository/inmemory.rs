//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! Vec をインメモリの追記ログとして使用します。履歴はプロセス終了で失われます。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageRepository, RepositoryError};

/// インメモリ Message Repository 実装
#[derive(Default)]
pub struct InMemoryMessageRepository {
    /// 追記順のメッセージ
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageRepository {
    /// 新しい空の InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みメッセージ数を取得
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// 保存済みメッセージがないか
    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        self.messages.lock().await.push(message);
        Ok(())
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut ordered = self.messages.lock().await.clone();
        // stable sort: equal timestamps keep append order
        ordered.sort_by_key(|message| message.timestamp);
        let skip = ordered.len().saturating_sub(limit);
        Ok(ordered.split_off(skip))
    }
}
