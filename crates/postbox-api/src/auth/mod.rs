//! Authentication and authorization
//!
//! - JWT bearer token generation and validation
//! - Password hashing with bcrypt
//! - Request middleware enforcing the login and same-user policies

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{generate_token, validate_token, Claims, JwtConfig, JwtError};
pub use middleware::{authenticate_jwt, ensure_correct_user, ensure_logged_in, CurrentUser};
pub use password::{hash_password, verify_password, PasswordError};
