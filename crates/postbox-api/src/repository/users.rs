//! User repository
//!
//! CRUD and message-listing queries over the `users` table. The password
//! digest never leaves this module.

use crate::auth::password::{hash_password, verify_password};
use chrono::{DateTime, Utc};
use postbox_core::{
    CoreError, ReceivedMessage, Result, SentMessage, UserDetail, UserProfile,
};
use sqlx::PgPool;

/// Input for a new registration, password still in plaintext
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    username: String,
    first_name: String,
    last_name: String,
    phone: String,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    phone: String,
}

#[derive(Debug, sqlx::FromRow)]
struct DetailRow {
    username: String,
    first_name: String,
    last_name: String,
    phone: String,
    join_at: DateTime<Utc>,
    last_login_at: DateTime<Utc>,
}

/// One row of a message listing, joined with the other party's profile
#[derive(Debug, sqlx::FromRow)]
struct MessageJoinRow {
    id: i32,
    username: String,
    first_name: String,
    last_name: String,
    phone: String,
    body: String,
    sent_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl MessageJoinRow {
    fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// User repository over a PostgreSQL pool
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user
    ///
    /// Hashes the password with the configured work factor and inserts the
    /// row with `join_at = last_login_at = now()`. A duplicate username is a
    /// `Conflict`, distinct from other database failures.
    pub async fn register(&self, new_user: NewUser, work_factor: u32) -> Result<UserProfile> {
        let digest = hash_password(&new_user.password, work_factor)
            .map_err(|e| CoreError::Internal(format!("Failed to hash password: {e}")))?;

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO users (username, password, first_name, last_name, phone, join_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, now(), now())
            RETURNING username, first_name, last_name, phone
            "#,
        )
        .bind(&new_user.username)
        .bind(&digest)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                CoreError::Conflict(format!("Username taken: {}", new_user.username))
            }
            _ => CoreError::Database(format!("Failed to create user: {e}")),
        })?;

        Ok(row.into())
    }

    /// Check a username/password pair
    ///
    /// Returns the stored profile only when verification succeeds. An
    /// unknown username is a controlled `None`, never a fault, and the
    /// caller cannot distinguish it from a wrong password. Does not touch
    /// `last_login_at`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT username, password, first_name, last_name, phone FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to fetch user: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let valid = verify_password(password, &row.password)
            .map_err(|e| CoreError::Internal(format!("Failed to verify password: {e}")))?;

        Ok(valid.then(|| UserProfile {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
        }))
    }

    /// Set `last_login_at` to the current server time
    pub async fn update_login_timestamp(&self, username: &str) -> Result<()> {
        let updated = sqlx::query_scalar::<_, String>(
            "UPDATE users SET last_login_at = now() WHERE username = $1 RETURNING username",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to update login timestamp: {e}")))?;

        updated
            .map(|_| ())
            .ok_or_else(|| CoreError::NotFound(format!("No such user: {username}")))
    }

    /// Basic info on all users, ordered by username ascending
    pub async fn all(&self) -> Result<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT username, first_name, last_name, phone FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to list users: {e}")))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Full detail for one user
    pub async fn get(&self, username: &str) -> Result<UserDetail> {
        let row = sqlx::query_as::<_, DetailRow>(
            r#"
            SELECT username, first_name, last_name, phone, join_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to fetch user: {e}")))?
        .ok_or_else(|| CoreError::NotFound(format!("No such user: {username}")))?;

        Ok(UserDetail {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            join_at: row.join_at,
            last_login_at: row.last_login_at,
        })
    }

    /// Messages this user sent, each joined with the recipient's profile
    pub async fn messages_from(&self, username: &str) -> Result<Vec<SentMessage>> {
        let rows = sqlx::query_as::<_, MessageJoinRow>(
            r#"
            SELECT m.id, u.username, u.first_name, u.last_name, u.phone,
                   m.body, m.sent_at, m.read_at
            FROM messages AS m
            JOIN users AS u ON m.to_username = u.username
            WHERE m.from_username = $1
            ORDER BY m.sent_at
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to list sent messages: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|row| SentMessage {
                id: row.id,
                to_user: row.profile(),
                body: row.body,
                sent_at: row.sent_at,
                read_at: row.read_at,
            })
            .collect())
    }

    /// Messages this user received, each joined with the sender's profile
    pub async fn messages_to(&self, username: &str) -> Result<Vec<ReceivedMessage>> {
        let rows = sqlx::query_as::<_, MessageJoinRow>(
            r#"
            SELECT m.id, u.username, u.first_name, u.last_name, u.phone,
                   m.body, m.sent_at, m.read_at
            FROM messages AS m
            JOIN users AS u ON m.from_username = u.username
            WHERE m.to_username = $1
            ORDER BY m.sent_at
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to list received messages: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|row| ReceivedMessage {
                id: row.id,
                from_user: row.profile(),
                body: row.body,
                sent_at: row.sent_at,
                read_at: row.read_at,
            })
            .collect())
    }
}
