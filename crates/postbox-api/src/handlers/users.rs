//! User handlers
//!
//! `/users` needs any logged-in caller; the `/:username` routes additionally
//! require the caller to be that user (enforced by `ensure_correct_user`
//! before these run).

use crate::error::AppError;
use crate::repository::UserRepository;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use postbox_core::{ReceivedMessage, SentMessage, UserDetail, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: UserDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceivedMessagesResponse {
    pub messages: Vec<ReceivedMessage>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SentMessagesResponse {
    pub messages: Vec<SentMessage>,
}

/// List all users' public profiles
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users, ordered by username", body = UserListResponse),
        (status = 401, description = "Not logged in", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = UserRepository::new(state.db_pool.clone()).all().await?;
    Ok(Json(UserListResponse { users }))
}

/// Get one user's full detail
#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User detail", body = UserResponse),
        (status = 401, description = "Not this user", body = crate::error::ApiError),
        (status = 404, description = "No such user", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserRepository::new(state.db_pool.clone())
        .get(&username)
        .await?;
    Ok(Json(UserResponse { user }))
}

/// Messages sent to this user, annotated with each sender's profile
#[utoipa::path(
    get,
    path = "/users/{username}/to",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Received messages", body = ReceivedMessagesResponse),
        (status = 401, description = "Not this user", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn messages_to(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ReceivedMessagesResponse>, AppError> {
    let messages = UserRepository::new(state.db_pool.clone())
        .messages_to(&username)
        .await?;
    Ok(Json(ReceivedMessagesResponse { messages }))
}

/// Messages sent by this user, annotated with each recipient's profile
#[utoipa::path(
    get,
    path = "/users/{username}/from",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Sent messages", body = SentMessagesResponse),
        (status = 401, description = "Not this user", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn messages_from(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<SentMessagesResponse>, AppError> {
    let messages = UserRepository::new(state.db_pool.clone())
        .messages_from(&username)
        .await?;
    Ok(Json(SentMessagesResponse { messages }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_list_response_serialization() {
        let response = UserListResponse {
            users: vec![UserProfile {
                username: "alice".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                phone: "555-0100".to_string(),
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["users"][0]["username"], "alice");
        assert!(json["users"][0].get("password").is_none());
    }
}
