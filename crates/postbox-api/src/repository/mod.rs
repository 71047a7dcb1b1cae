//! Repositories over the relational store
//!
//! The database is the sole point of cross-request coordination: uniqueness
//! and foreign-key constraints do the work, and each call is one awaited
//! round trip.

pub mod messages;
pub mod users;

pub use messages::MessageRepository;
pub use users::{NewUser, UserRepository};
