//! Route definitions
//!
//! Public routes carry no policy; the protected groups layer the login and
//! same-user checks, and `authenticate_jwt` resolves the identity for the
//! whole router before any of them run.

use crate::auth::middleware::{authenticate_jwt, ensure_correct_user, ensure_logged_in};
use crate::handlers::{auth, health, messages, users};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register));

    // Any logged-in user
    let user_list_routes = Router::new()
        .route("/users", get(users::list_users))
        .route_layer(middleware::from_fn(ensure_logged_in));

    // Only the named user
    let user_detail_routes = Router::new()
        .route("/users/:username", get(users::get_user))
        .route("/users/:username/to", get(users::messages_to))
        .route("/users/:username/from", get(users::messages_from))
        .route_layer(middleware::from_fn(ensure_correct_user))
        .route_layer(middleware::from_fn(ensure_logged_in));

    // Logged in; per-message authorization happens in the handlers
    let message_routes = Router::new()
        .route("/messages", post(messages::send_message))
        .route("/messages/:id", get(messages::get_message))
        .route("/messages/:id/read", post(messages::mark_read))
        .route_layer(middleware::from_fn(ensure_logged_in));

    Router::new()
        .merge(public_routes)
        .merge(user_list_routes)
        .merge(user_detail_routes)
        .merge(message_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate_jwt))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
