//! Wire-facing domain models
//!
//! These are the shapes handlers serialize into responses. The password
//! digest never appears in any of them; repositories keep it internal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public profile fields for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Full user detail, returned only to the user themselves
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDetail {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// A freshly created message, as returned by the send endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewMessage {
    pub id: i32,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// A single message joined with both participant profiles
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDetail {
    pub id: i32,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub from_user: UserProfile,
    pub to_user: UserProfile,
}

impl MessageDetail {
    /// Whether `username` is the sender or the recipient of this message
    pub fn involves(&self, username: &str) -> bool {
        self.from_user.username == username || self.to_user.username == username
    }
}

/// A message the user sent, annotated with the recipient's profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentMessage {
    pub id: i32,
    pub to_user: UserProfile,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A message the user received, annotated with the sender's profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReceivedMessage {
    pub id: i32,
    pub from_user: UserProfile,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[test]
    fn test_profile_has_no_password_field() {
        let json = serde_json::to_value(profile("alice")).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_message_involves_either_role() {
        let message = MessageDetail {
            id: 1,
            body: "hi".to_string(),
            sent_at: Utc::now(),
            read_at: None,
            from_user: profile("alice"),
            to_user: profile("bob"),
        };

        assert!(message.involves("alice"));
        assert!(message.involves("bob"));
        assert!(!message.involves("mallory"));
    }

    #[test]
    fn test_unread_message_serializes_null_read_at() {
        let message = SentMessage {
            id: 7,
            to_user: profile("bob"),
            body: "hello".to_string(),
            sent_at: Utc::now(),
            read_at: None,
        };

        let json = serde_json::to_value(message).unwrap();
        assert!(json["read_at"].is_null());
    }
}
