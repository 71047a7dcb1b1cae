//! Message repository
//!
//! Create, fetch, and the single read-state transition over the `messages`
//! table. From/to users are fixed at creation; `read_at` moves from null to
//! a timestamp exactly once.

use chrono::{DateTime, Utc};
use postbox_core::{CoreError, MessageDetail, NewMessage, Result, UserProfile};
use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
struct NewMessageRow {
    id: i32,
    from_username: String,
    to_username: String,
    body: String,
    sent_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct MessageDetailRow {
    id: i32,
    body: String,
    sent_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
    from_username: String,
    from_first_name: String,
    from_last_name: String,
    from_phone: String,
    to_username: String,
    to_first_name: String,
    to_last_name: String,
    to_phone: String,
}

/// Message repository over a PostgreSQL pool
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new message with `sent_at = now()` and `read_at = NULL`
    ///
    /// Both usernames must reference existing users; a foreign-key violation
    /// surfaces as a `Validation` failure.
    pub async fn create(
        &self,
        from_username: &str,
        to_username: &str,
        body: &str,
    ) -> Result<NewMessage> {
        let row = sqlx::query_as::<_, NewMessageRow>(
            r#"
            INSERT INTO messages (from_username, to_username, body, sent_at)
            VALUES ($1, $2, $3, now())
            RETURNING id, from_username, to_username, body, sent_at
            "#,
        )
        .bind(from_username)
        .bind(to_username)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_foreign_key_violation() => {
                CoreError::Validation("Both from and to users must exist".to_string())
            }
            _ => CoreError::Database(format!("Failed to create message: {e}")),
        })?;

        Ok(NewMessage {
            id: row.id,
            from_username: row.from_username,
            to_username: row.to_username,
            body: row.body,
            sent_at: row.sent_at,
        })
    }

    /// Fetch one message joined with both participant profiles
    pub async fn get(&self, id: i32) -> Result<MessageDetail> {
        let row = sqlx::query_as::<_, MessageDetailRow>(
            r#"
            SELECT m.id, m.body, m.sent_at, m.read_at,
                   f.username   AS from_username,
                   f.first_name AS from_first_name,
                   f.last_name  AS from_last_name,
                   f.phone      AS from_phone,
                   t.username   AS to_username,
                   t.first_name AS to_first_name,
                   t.last_name  AS to_last_name,
                   t.phone      AS to_phone
            FROM messages AS m
            JOIN users AS f ON m.from_username = f.username
            JOIN users AS t ON m.to_username = t.username
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to fetch message: {e}")))?
        .ok_or_else(|| CoreError::NotFound(format!("No such message: {id}")))?;

        Ok(MessageDetail {
            id: row.id,
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
            from_user: UserProfile {
                username: row.from_username,
                first_name: row.from_first_name,
                last_name: row.from_last_name,
                phone: row.from_phone,
            },
            to_user: UserProfile {
                username: row.to_username,
                first_name: row.to_first_name,
                last_name: row.to_last_name,
                phone: row.to_phone,
            },
        })
    }

    /// Mark a message read and return its `read_at`
    ///
    /// Idempotent: COALESCE keeps the first timestamp, so a repeat call is a
    /// no-op returning the original value. Authorization (recipient only)
    /// happens in the handler before this is called.
    pub async fn mark_read(&self, id: i32) -> Result<DateTime<Utc>> {
        let read_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "UPDATE messages SET read_at = COALESCE(read_at, now()) WHERE id = $1 RETURNING read_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to mark message read: {e}")))?;

        read_at.ok_or_else(|| CoreError::NotFound(format!("No such message: {id}")))
    }
}
