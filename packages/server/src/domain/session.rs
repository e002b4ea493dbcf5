//! Per-connection session lifecycle: `Connecting -> Joined -> Disconnected`.

use super::{error::SessionError, value_object::DisplayName};

/// State of one transport connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Transport is open, no display name announced yet
    #[default]
    Connecting,
    /// A display name was announced
    Joined(DisplayName),
    /// Terminal; the connection id is never reused
    Disconnected,
}

impl SessionState {
    /// Check that a join is allowed in the current state.
    pub fn ensure_can_join(&self) -> Result<(), SessionError> {
        match self {
            Self::Connecting => Ok(()),
            Self::Joined(name) => Err(SessionError::AlreadyJoined(name.to_string())),
            Self::Disconnected => Err(SessionError::Disconnected),
        }
    }

    /// Check that a send is allowed in the current state.
    pub fn ensure_can_send(&self) -> Result<(), SessionError> {
        match self {
            Self::Joined(_) => Ok(()),
            Self::Connecting => Err(SessionError::NotJoined),
            Self::Disconnected => Err(SessionError::Disconnected),
        }
    }

    /// Transition `Connecting -> Joined`.
    pub fn mark_joined(&mut self, name: DisplayName) -> Result<(), SessionError> {
        self.ensure_can_join()?;
        *self = Self::Joined(name);
        Ok(())
    }

    /// Transition to `Disconnected`. Fails if already disconnected, so callers
    /// can run their teardown exactly once.
    pub fn mark_disconnected(&mut self) -> Result<(), SessionError> {
        if *self == Self::Disconnected {
            return Err(SessionError::Disconnected);
        }
        *self = Self::Disconnected;
        Ok(())
    }

    /// Display name, when joined.
    pub fn display_name(&self) -> Option<&DisplayName> {
        match self {
            Self::Joined(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connecting_cannot_send() {
        // テスト項目: Join 前の送信は拒否される
        // given (前提条件):
        let session = SessionState::default();

        // when (操作):
        let result = session.ensure_can_send();

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotJoined));
    }

    #[test]
    fn test_join_then_send() {
        // テスト項目: Join 後は送信でき、表示名が取得できる
        // given (前提条件):
        let mut session = SessionState::Connecting;

        // when (操作):
        session.mark_joined(DisplayName::normalize("alice")).unwrap();

        // then (期待する結果):
        assert!(session.ensure_can_send().is_ok());
        assert_eq!(session.display_name().map(DisplayName::as_str), Some("alice"));
    }

    #[test]
    fn test_second_join_is_rejected() {
        // テスト項目: 2回目の Join は拒否され、状態は変わらない
        // given (前提条件):
        let mut session = SessionState::Connecting;
        session.mark_joined(DisplayName::normalize("alice")).unwrap();

        // when (操作):
        let result = session.mark_joined(DisplayName::normalize("mallory"));

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::AlreadyJoined("alice".to_string())));
        assert_eq!(session.display_name().map(DisplayName::as_str), Some("alice"));
    }

    #[test]
    fn test_disconnect_happens_once() {
        // テスト項目: Disconnected への遷移は一度だけ成功し、以降は何もできない
        // given (前提条件):
        let mut session = SessionState::Connecting;

        // when (操作):
        let first = session.mark_disconnected();
        let second = session.mark_disconnected();

        // then (期待する結果):
        assert!(first.is_ok());
        assert_eq!(second, Err(SessionError::Disconnected));
        assert_eq!(session.ensure_can_join(), Err(SessionError::Disconnected));
        assert_eq!(session.ensure_can_send(), Err(SessionError::Disconnected));
    }
}
