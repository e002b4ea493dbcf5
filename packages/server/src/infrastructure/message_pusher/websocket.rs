//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ドメインイベントを JSON にエンコードしてクライアントへ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の受付と sender の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に使用します。
//! Each socket drains its channel in order, and broadcasts are serialized by the
//! client map lock, so every recipient sees broadcasts in the order they were made.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ChatEvent, ConnectionId, MessagePushError, MessagePusher, PusherChannel},
    infrastructure::dto::conversion::encode_event,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.broadcast(&ChatEvent::UserJoined(name)).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中のクライアント数を取得
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

fn encode(event: &ChatEvent) -> Result<String, MessagePushError> {
    encode_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(connection_id) else {
            return Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ));
        };
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed {} to client '{}'", event.name(), connection_id);
        Ok(())
    }

    async fn broadcast(&self, event: &ChatEvent) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        for (connection_id, sender) in clients.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.clone()) {
                tracing::warn!(
                    "Failed to push {} to client '{}': {}",
                    event.name(),
                    connection_id,
                    e
                );
            }
        }
        tracing::debug!("Broadcasted {} to {} client(s)", event.name(), clients.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayName;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の基本的なイベント送信機能
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 登録中の全クライアントへの送信
    // - エラーハンドリング（存在しないクライアント、閉じたチャンネル）
    //
    // 【なぜこのテストが必要か】
    // - MessagePusher は UseCase から呼ばれる通信層の中核
    // - 履歴は本人だけに、通知は全員に届くことを保証する必要がある
    // ========================================

    fn conn(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn joined(name: &str) -> ChatEvent {
        ChatEvent::UserJoined(DisplayName::normalize(name))
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (other_tx, mut other_rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;
        pusher.register_client(conn("bob"), other_tx).await;

        // when (操作):
        let result = pusher.push_to(&conn("alice"), &ChatEvent::HistoryLoaded(vec![])).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(r#"{"type":"history-loaded","messages":[]}"#.to_string())
        );
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&conn("nonexistent"), &joined("x")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nonexistent".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_channel() {
        // テスト項目: 受信側が閉じたクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&conn("alice"), &joined("x")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_clients() {
        // テスト項目: 登録中の全クライアントにブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx1).await;
        pusher.register_client(conn("bob"), tx2).await;

        // when (操作):
        let result = pusher.broadcast(&joined("carol")).await;

        // then (期待する結果):
        let expected = r#"{"type":"user-joined","name":"carol"}"#.to_string();
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some(expected.clone()));
        assert_eq!(rx2.recv().await, Some(expected));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部のクライアントのチャンネルが閉じていてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx1).await;
        pusher.register_client(conn("gone"), tx2).await;
        drop(rx2);

        // when (操作):
        let result = pusher.broadcast(&joined("carol")).await;

        // then (期待する結果):
        assert!(result.is_ok()); // ブロードキャストは部分失敗を許容
        assert!(rx1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregistered_client_gets_nothing() {
        // テスト項目: 登録解除したクライアントにはブロードキャストが届かない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;
        pusher.unregister_client(&conn("alice")).await;

        // when (操作):
        let result = pusher.broadcast(&joined("carol")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(pusher.client_count().await, 0);
        // sender はマップと一緒に破棄されるのでチャンネルは閉じている
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_broadcast_with_no_clients() {
        // テスト項目: クライアントがいなくてもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.broadcast(&joined("carol")).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
