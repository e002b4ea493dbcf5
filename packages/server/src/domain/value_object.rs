//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Display name used when a client announces an empty or whitespace-only name.
pub const FALLBACK_DISPLAY_NAME: &str = "Anonymous";

/// Connection identifier value object.
///
/// Opaque token assigned by the transport layer to one physical connection.
/// No two concurrently open connections share an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId.
    ///
    /// # Arguments
    ///
    /// * `id` - The connection identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the ConnectionId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ConnectionId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

/// Display name value object.
///
/// Names are not unique: several connections (browser tabs, devices) may share
/// one. The only normalization is trimming surrounding whitespace; there is no
/// length cap and no character restriction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Normalize a raw, user-supplied name.
    ///
    /// Empty or whitespace-only input becomes [`FALLBACK_DISPLAY_NAME`].
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::fallback()
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The name given to clients that did not announce one.
    pub fn fallback() -> Self {
        Self(FALLBACK_DISPLAY_NAME.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message body value object.
///
/// A body is never blank. The text itself is kept as sent (not trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    /// Create a new MessageBody.
    ///
    /// # Returns
    ///
    /// `Err(ValueObjectError::MessageBodyBlank)` when the content is empty after trimming
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.trim().is_empty() {
            return Err(ValueObjectError::MessageBodyBlank);
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted message identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a MessageId from its textual UUID form.
    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ValueObjectError::MessageIdInvalidFormat(value.to_string()))
    }

    /// Get the inner UUID.
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC timestamp value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Get the inner instant.
    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    /// Whether this is a real timestamp rather than a missing/zeroed one.
    pub fn is_plausible(&self) -> bool {
        hiroba_shared::time::is_plausible(&self.0)
    }

    /// Time of day as surfaced to clients (`HH:MM:SS`, UTC).
    pub fn time_of_day(&self) -> String {
        hiroba_shared::time::format_time_of_day(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_connection_id_rejects_empty() {
        // テスト項目: 空の ConnectionId はエラーになる
        // given (前提条件):
        let id = String::new();

        // when (操作):
        let result = ConnectionId::new(id);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::ConnectionIdEmpty));
    }

    #[test]
    fn test_display_name_is_trimmed() {
        // テスト項目: 表示名の前後の空白が取り除かれる
        // given (前提条件):
        let raw = "  Alice  ";

        // when (操作):
        let name = DisplayName::normalize(raw);

        // then (期待する結果):
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_display_name_blank_falls_back() {
        // テスト項目: 空または空白のみの表示名は "Anonymous" になる
        // given (前提条件):
        let inputs = ["", "   ", "\t\n "];

        for raw in inputs {
            // when (操作):
            let name = DisplayName::normalize(raw);

            // then (期待する結果):
            assert_eq!(name.as_str(), FALLBACK_DISPLAY_NAME);
        }
    }

    #[test]
    fn test_display_name_keeps_inner_whitespace_and_length() {
        // テスト項目: 内側の空白や長さ・文字種は変更されない
        // given (前提条件):
        let long_name = format!(" {} ", "名".repeat(500));

        // when (操作):
        let spaced = DisplayName::normalize(" Mary  Jane ");
        let long = DisplayName::normalize(&long_name);

        // then (期待する結果):
        assert_eq!(spaced.as_str(), "Mary  Jane");
        assert_eq!(long.as_str().chars().count(), 500);
    }

    #[test]
    fn test_display_name_ordering_is_lexicographic() {
        // テスト項目: 表示名がコードポイント順に並ぶ
        // given (前提条件):
        let mut names = vec![
            DisplayName::normalize("bob"),
            DisplayName::normalize("Bob"),
            DisplayName::normalize("alice"),
            DisplayName::normalize("Zoe"),
        ];

        // when (操作):
        names.sort();

        // then (期待する結果):
        let sorted: Vec<&str> = names.iter().map(DisplayName::as_str).collect();
        assert_eq!(sorted, vec!["Bob", "Zoe", "alice", "bob"]);
    }

    #[test]
    fn test_message_body_rejects_blank() {
        // テスト項目: 空または空白のみのメッセージ本文はエラーになる
        // given (前提条件):
        let inputs = ["", "   ", "\n\t"];

        for content in inputs {
            // when (操作):
            let result = MessageBody::new(content.to_string());

            // then (期待する結果):
            assert_eq!(result, Err(ValueObjectError::MessageBodyBlank));
        }
    }

    #[test]
    fn test_message_body_keeps_surrounding_whitespace() {
        // テスト項目: 本文は空白を含めて送信された通りに保持される
        // given (前提条件):
        let content = "  Hello  ".to_string();

        // when (操作):
        let body = MessageBody::new(content).unwrap();

        // then (期待する結果):
        assert_eq!(body.as_str(), "  Hello  ");
    }

    #[test]
    fn test_message_id_parse_invalid() {
        // テスト項目: UUID 形式でない MessageId はエラーになる
        // given (前提条件):
        let value = "not-a-uuid";

        // when (操作):
        let result = MessageId::parse(value);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::MessageIdInvalidFormat("not-a-uuid".to_string()))
        );
    }

    #[test]
    fn test_timestamp_time_of_day_and_plausibility() {
        // テスト項目: Timestamp が時刻表示と妥当性判定を提供する
        // given (前提条件):
        let real = Timestamp::new(Utc.with_ymd_and_hms(2024, 3, 9, 7, 8, 9).unwrap());
        let zeroed = Timestamp::new(DateTime::<Utc>::default());

        // when (操作) / then (期待する結果):
        assert_eq!(real.time_of_day(), "07:08:09");
        assert!(real.is_plausible());
        assert!(!zeroed.is_plausible());
    }
}
