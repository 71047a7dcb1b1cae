//! API error handling
//!
//! Every failure leaving a handler is serialized in one place as
//! `{"error": {"message", "status"}}` with the mapped HTTP status code.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use postbox_core::CoreError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape of an error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub error: ErrorBody,
}

/// Error payload carried inside [`ApiError`]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// HTTP status code, repeated in the body
    pub status: u16,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                status: status.as_u16(),
            },
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (400)
    Validation(String),
    /// Bad credentials, deliberately undifferentiated (400)
    InvalidCredentials,
    /// Uniqueness violation (400)
    Conflict(String),
    /// Entity absent (404)
    NotFound(String),
    /// Missing or non-matching identity (401)
    Unauthorized,
    /// Unclassified server failure (500)
    Internal(String),
    /// Database failure (500)
    Database(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::InvalidCredentials => "Invalid username/password".to_string(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            // Server-side details go to the log, not the client.
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::Database(_) => "Database operation failed".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(detail) => tracing::error!(%detail, "internal error"),
            AppError::Database(detail) => tracing::error!(%detail, "database error"),
            _ => {}
        }

        let status = self.status_code();
        (status, Json(ApiError::new(self.message(), status))).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::Validation(msg),
            CoreError::InvalidCredentials => AppError::InvalidCredentials,
            CoreError::Conflict(msg) => AppError::Conflict(msg),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::Unauthorized => AppError::Unauthorized,
            CoreError::Database(msg) => AppError::Database(msg),
            CoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<crate::auth::jwt::JwtError> for AppError {
    fn from(err: crate::auth::jwt::JwtError) -> Self {
        AppError::Internal(format!("Failed to sign token: {err}"))
    }
}

// Extractor rejections go through the same responder as every other
// failure; handlers take Result<Json<T>, _> / Result<Path<T>, _> and `?`.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("taken".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database("connection refused on 5432".into());
        assert_eq!(err.message(), "Database operation failed");

        let err = AppError::Internal("bcrypt cost out of range".into());
        assert_eq!(err.message(), "Internal server error");
    }

    #[tokio::test]
    async fn test_wire_shape() {
        let response = AppError::NotFound("No such user: alice".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"]["message"], "No such user: alice");
        assert_eq!(json["error"]["status"], 404);
    }

    #[test]
    fn test_from_core_error() {
        let err: AppError = CoreError::Conflict("taken".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = CoreError::InvalidCredentials.into();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
