//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信（通知）のインターフェース。
//! UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しない。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatEvent, ConnectionId, MessagePushError};

/// Outbound channel of one connection (already-encoded frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Transport collaborator
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録（以降 broadcast の対象になる）
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError>;

    /// 登録中の全クライアントにイベントを送信
    async fn broadcast(&self, event: &ChatEvent) -> Result<(), MessagePushError>;
}
