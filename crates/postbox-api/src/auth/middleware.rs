//! Authentication middleware
//!
//! Three composable checks, mirroring the route policies:
//! - `authenticate_jwt` resolves an identity from a bearer token if one is
//!   present and valid; an absent or invalid token is not itself an error.
//! - `ensure_logged_in` rejects requests with no resolved identity.
//! - `ensure_correct_user` rejects requests whose resolved identity does not
//!   match the `:username` path parameter.

use super::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Identity resolved from a valid bearer token
///
/// Inserted into request extensions by [`authenticate_jwt`]; handlers behind
/// [`ensure_logged_in`] extract it with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}

/// Extract the bearer token from the Authorization header, if any
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the caller's identity from a bearer token
///
/// Applied to the whole router. A valid token attaches [`CurrentUser`];
/// anything else leaves the identity unset and lets the per-route checks
/// decide.
pub async fn authenticate_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match validate_token(&state.jwt, token) {
            Ok(claims) => {
                request.extensions_mut().insert(CurrentUser {
                    username: claims.sub,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected bearer token");
            }
        }
    }

    next.run(request).await
}

/// Reject the request unless an identity was resolved
pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<CurrentUser>().is_none() {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Reject the request unless the identity matches the `:username` path param
pub async fn ensure_correct_user(
    Path(username): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if user.username != username {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_authorization_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_non_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
    }
}
