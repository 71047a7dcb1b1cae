//! Message handlers
//!
//! All three routes require a logged-in caller; the per-message rules live
//! here: reading needs the sender or the recipient, marking read needs the
//! recipient alone.

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::repository::MessageRepository;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use postbox_core::{MessageDetail, NewMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Send request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub to_username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: MessageDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewMessageResponse {
    pub message: NewMessage,
}

/// Read receipt returned by the mark-read endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadReceipt {
    pub id: i32,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadResponse {
    pub message: ReadReceipt,
}

/// Get detail of one message
///
/// The caller must be the sender or the recipient; anyone else gets a 401.
#[utoipa::path(
    get,
    path = "/messages/{id}",
    tag = "messages",
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message detail", body = MessageResponse),
        (status = 401, description = "Caller is neither sender nor recipient", body = crate::error::ApiError),
        (status = 404, description = "No such message", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;

    let message = MessageRepository::new(state.db_pool.clone()).get(id).await?;

    if !message.involves(&user.username) {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(MessageResponse { message }))
}

/// Send a message to another user
#[utoipa::path(
    post,
    path = "/messages",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message created", body = NewMessageResponse),
        (status = 400, description = "Missing fields or unknown recipient", body = crate::error::ApiError),
        (status = 401, description = "Not logged in", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;

    request
        .validate()
        .map_err(|_| AppError::Validation("to_username and body required".to_string()))?;

    let message = MessageRepository::new(state.db_pool.clone())
        .create(&user.username, &request.to_username, &request.body)
        .await?;

    tracing::debug!(id = message.id, from = %message.from_username, to = %message.to_username, "message sent");

    Ok((StatusCode::CREATED, Json(NewMessageResponse { message })))
}

/// Mark a message as read
///
/// Only the intended recipient may mark a message read. Marking twice is a
/// no-op; the original `read_at` comes back.
#[utoipa::path(
    post,
    path = "/messages/{id}/read",
    tag = "messages",
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "Read receipt", body = ReadResponse),
        (status = 401, description = "Caller is not the recipient", body = crate::error::ApiError),
        (status = 404, description = "No such message", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ReadResponse>, AppError> {
    let Path(id) = id?;

    let messages = MessageRepository::new(state.db_pool.clone());

    let message = messages.get(id).await?;
    if message.to_user.username != user.username {
        return Err(AppError::Unauthorized);
    }

    let read_at = messages.mark_read(id).await?;

    Ok(Json(ReadResponse {
        message: ReadReceipt { id, read_at },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_requires_recipient_and_body() {
        let request: SendMessageRequest = serde_json::from_str(r#"{"body": "hi"}"#).unwrap();
        assert!(request.validate().is_err());

        let request: SendMessageRequest =
            serde_json::from_str(r#"{"to_username": "bob", "body": "hi"}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_read_response_serialization() {
        let response = ReadResponse {
            message: ReadReceipt {
                id: 42,
                read_at: Utc::now(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"]["id"], 42);
        assert!(json["message"]["read_at"].is_string());
    }
}
