//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` with sqlx: raw queries, a private row struct for
//! SQLite-to-domain mapping, timestamps stored as fixed-width RFC 3339 text so
//! they sort lexicographically.

use std::str::FromStr;

use async_trait::async_trait;
use hiroba_shared::time::{parse_utc_rfc3339, to_utc_rfc3339};
use sqlx::{
    Row,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
};

use crate::domain::{
    ChatMessage, FALLBACK_DISPLAY_NAME, MessageId, MessageRepository, RepositoryError, Timestamp,
};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS chat_messages (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    author TEXT,
    body TEXT,
    created_at TEXT NOT NULL
)";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_chat_messages_created_at ON chat_messages (created_at, seq)";

const DROP_TABLE: &str = "DROP TABLE IF EXISTS chat_messages";

const INSERT_MESSAGE: &str =
    "INSERT INTO chat_messages (id, author, body, created_at) VALUES (?, ?, ?, ?)";

// newest `limit` rows, re-ordered oldest first
const SELECT_RECENT: &str = "SELECT id, author, body, created_at FROM (
    SELECT seq, id, author, body, created_at FROM chat_messages
    ORDER BY created_at DESC, seq DESC
    LIMIT ?
) ORDER BY created_at ASC, seq ASC";

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given pool. The schema must exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and ensure the schema.
    ///
    /// In-memory databases live only as long as their connection, so they get a
    /// single connection that is never recycled.
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(unavailable)?
            .create_if_missing(true);

        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        let repository = Self::new(pool);
        repository.ensure_schema().await?;
        tracing::info!("Message history stored in {}", database_url);
        Ok(repository)
    }

    /// Create the table and index if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;
        sqlx::query(CREATE_INDEX)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;
        Ok(())
    }

    /// Drop all stored history and recreate an empty schema.
    pub async fn reset(&self) -> Result<(), RepositoryError> {
        sqlx::query(DROP_TABLE)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;
        tracing::warn!("Message history reset");
        self.ensure_schema().await
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn unavailable(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Unavailable(e.to_string())
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct ChatMessageRow {
    id: String,
    author: Option<String>,
    body: Option<String>,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            author: row.try_get("author")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Rows written by older deployments may lack an author or body.
    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = MessageId::parse(&self.id).map_err(|e| RepositoryError::Query(e.to_string()))?;
        let created_at = parse_utc_rfc3339(&self.created_at)
            .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;

        Ok(ChatMessage::restore(
            id,
            self.author
                .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string()),
            self.body.unwrap_or_default(),
            Timestamp::new(created_at),
        ))
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(INSERT_MESSAGE)
            .bind(message.id.to_string())
            .bind(&message.author)
            .bind(&message.body)
            .bind(to_utc_rfc3339(&message.timestamp.value()))
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;
        Ok(())
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed)?;

        rows.iter()
            .map(|row| {
                ChatMessageRow::from_row(row)
                    .map_err(query_failed)?
                    .into_message()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageBody;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - SQLite への追記と直近履歴の取得（件数制限・古い順）
    // - NULL の author / body、ゼロ値の時刻を持つ既存行の読み込み
    // - reset による履歴の削除
    // ========================================

    async fn create_test_repository() -> SqliteMessageRepository {
        SqliteMessageRepository::connect("sqlite::memory:")
            .await
            .expect("in-memory database")
    }

    fn message(body: &str, at: DateTime<Utc>) -> ChatMessage {
        ChatMessage::compose(
            "alice".to_string(),
            MessageBody::new(body.to_string()).unwrap(),
            Timestamp::new(at),
        )
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        // テスト項目: 保存したメッセージがそのまま読み出せる
        // given (前提条件):
        let repo = create_test_repository().await;
        let original = message("Hello", base());

        // when (操作):
        repo.append(original.clone()).await.unwrap();
        let result = repo.recent_messages(50).await.unwrap();

        // then (期待する結果):
        assert_eq!(result, vec![original]);
    }

    #[tokio::test]
    async fn test_recent_messages_limit_and_order() {
        // テスト項目: 直近 N 件が古い順で返る（同時刻は追記順）
        // given (前提条件):
        let repo = create_test_repository().await;
        for i in 0..6 {
            repo.append(message(&format!("m{i}"), base() + Duration::seconds(i)))
                .await
                .unwrap();
        }
        repo.append(message("m5-tie", base() + Duration::seconds(5)))
            .await
            .unwrap();

        // when (操作):
        let result = repo.recent_messages(3).await.unwrap();

        // then (期待する結果):
        let bodies: Vec<&str> = result.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m4", "m5", "m5-tie"]);
    }

    #[tokio::test]
    async fn test_legacy_rows_with_nulls_and_zeroed_time() {
        // テスト項目: NULL の author / body、ゼロ値の時刻を持つ行も読み込める
        // given (前提条件):
        let repo = create_test_repository().await;
        sqlx::query(
            "INSERT INTO chat_messages (id, author, body, created_at) VALUES (?, NULL, NULL, ?)",
        )
        .bind("9b2e1c7a-3f4d-4e5f-8a6b-7c8d9e0f1a2b")
        .bind("0001-01-01T00:00:00.000000Z")
        .execute(&repo.pool)
        .await
        .unwrap();

        // when (操作):
        let result = repo.recent_messages(50).await.unwrap();

        // then (期待する結果):
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].author, FALLBACK_DISPLAY_NAME);
        assert_eq!(result[0].body, "");
        assert!(!result[0].timestamp.is_plausible());
    }

    #[tokio::test]
    async fn test_invalid_row_is_reported() {
        // テスト項目: 不正な時刻の行は Query エラーになる
        // given (前提条件):
        let repo = create_test_repository().await;
        sqlx::query("INSERT INTO chat_messages (id, author, body, created_at) VALUES (?, ?, ?, ?)")
            .bind("9b2e1c7a-3f4d-4e5f-8a6b-7c8d9e0f1a2b")
            .bind("alice")
            .bind("hi")
            .bind("yesterday")
            .execute(&repo.pool)
            .await
            .unwrap();

        // when (操作):
        let result = repo.recent_messages(50).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Query(_))));
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        // テスト項目: reset で履歴が削除され、その後も追記できる
        // given (前提条件):
        let repo = create_test_repository().await;
        repo.append(message("old", base())).await.unwrap();

        // when (操作):
        repo.reset().await.unwrap();
        repo.append(message("new", base())).await.unwrap();

        // then (期待する結果):
        let bodies: Vec<String> = repo
            .recent_messages(50)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(bodies, vec!["new"]);
    }

    #[test]
    fn test_is_in_memory() {
        // テスト項目: インメモリ DB の URL を判定できる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:chat?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://hiroba.db"));
    }
}
