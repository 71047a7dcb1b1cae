//! Application state shared across handlers

use crate::auth::JwtConfig;
use postbox_core::AppConfig;
use sqlx::PgPool;

/// Immutable process-wide state, built once at startup
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Token signing/verification parameters, derived from `config.auth`
    pub jwt: JwtConfig,
}

impl AppState {
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let jwt = JwtConfig::from(&config.auth);
        Self {
            config,
            db_pool,
            jwt,
        }
    }

    /// The configured bcrypt hashing cost
    pub fn bcrypt_work_factor(&self) -> u32 {
        self.config.auth.bcrypt_work_factor
    }
}
