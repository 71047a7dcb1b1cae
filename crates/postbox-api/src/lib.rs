//! Postbox API - HTTP server for the postbox messaging service
//!
//! Users register and authenticate, then send and read short messages
//! addressed by username. See the repository README for the endpoint table.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod routes;
pub mod state;

pub use routes::create_router;
