//! Authentication handlers: login and register
//!
//! Both endpoints are public and both answer with a signed bearer token.
//! Login deliberately returns the same 400 for an unknown username and a
//! wrong password so callers cannot enumerate users.

use crate::error::AppError;
use crate::repository::{NewUser, UserRepository};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use postbox_core::CoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Login request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub phone: String,
}

/// Token response for login and register
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Login with username and password
///
/// Issues a bearer token embedding the username and updates the user's
/// `last_login_at`.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Missing fields or invalid credentials", body = crate::error::ApiError),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;

    if request.validate().is_err() {
        return Err(AppError::Validation(
            "Username and password required".to_string(),
        ));
    }

    let users = UserRepository::new(state.db_pool.clone());

    let user = users
        .authenticate(&request.username, &request.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let token = crate::auth::generate_token(&state.jwt, &user.username)?;
    users.update_login_timestamp(&user.username).await?;

    tracing::info!(username = %user.username, "user logged in");

    Ok(Json(TokenResponse { token }))
}

/// Register a new user account
///
/// Registers, logs the user in, and returns a token. A duplicate username is
/// reported as a 400, distinct from other failures.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Missing fields or username taken", body = crate::error::ApiError),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;

    request
        .validate()
        .map_err(|_| AppError::Validation("All registration fields are required".to_string()))?;

    let users = UserRepository::new(state.db_pool.clone());

    let new_user = NewUser {
        username: request.username,
        password: request.password,
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
    };

    let user = users
        .register(new_user, state.bcrypt_work_factor())
        .await
        .map_err(|e| match e {
            CoreError::Conflict(_) => {
                AppError::Conflict("Username taken. Please pick another one!".to_string())
            }
            other => other.into(),
        })?;

    let token = crate::auth::generate_token(&state.jwt, &user.username)?;
    users.update_login_timestamp(&user.username).await?;

    tracing::info!(username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_requires_both_fields() {
        let request = LoginRequest {
            username: "alice".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());

        let request = LoginRequest {
            username: "alice".to_string(),
            password: "secret123".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        // serde defaults turn absent fields into empty strings, which the
        // validator then rejects with a 400 instead of a framework 422.
        let request: LoginRequest = serde_json::from_str(r#"{"username": "alice"}"#).unwrap();
        assert!(request.password.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username": "alice", "password": "secret123", "first_name": "Alice",
                "last_name": "Liddell", "phone": "555-0100"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let request: RegisterRequest =
            serde_json::from_str(r#"{"username": "alice", "password": "secret123"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_token_response_serialization() {
        let response = TokenResponse {
            token: "abc.def.ghi".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "abc.def.ghi");
    }
}
