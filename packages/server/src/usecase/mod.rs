//! UseCase 層
//!
//! 接続ごとのライフサイクル（join / send / disconnect）を実装するレイヤー。
//! UI 層（トランスポート）から呼び出され、Domain 層を操作します。

pub mod coordinator;
pub mod error;
pub mod join_chat;
pub mod leave_chat;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::ChatSessionCoordinator;
pub use error::{JoinError, SendMessageError};
pub use join_chat::{DEFAULT_HISTORY_LIMIT, JoinChatUseCase};
pub use leave_chat::LeaveChatUseCase;
pub use send_message::SendMessageUseCase;
