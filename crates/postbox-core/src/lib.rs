//! Postbox Core - domain models, error taxonomy, and shared configuration
//!
//! This crate defines the pieces shared by the postbox service:
//! - Wire-facing domain models (user profiles, message shapes)
//! - The domain error taxonomy mapped to HTTP by the API crate
//! - Configuration management

pub mod config;
pub mod model;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
pub use model::{
    MessageDetail, NewMessage, ReceivedMessage, SentMessage, UserDetail, UserProfile,
};

use thiserror::Error;

/// Domain error taxonomy for postbox operations
///
/// Repositories raise these; the API boundary maps each variant to an HTTP
/// status in one place.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NotFound("No such user: alice".to_string());
        assert_eq!(err.to_string(), "No such user: alice");

        let err = CoreError::InvalidCredentials;
        assert_eq!(err.to_string(), "Invalid username/password");

        let err = CoreError::Database("connection reset".to_string());
        assert!(err.to_string().contains("connection reset"));
    }
}
