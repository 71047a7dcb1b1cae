//! Password hashing and verification using bcrypt
//!
//! The work factor comes from configuration (`BCRYPT_WORK_FACTOR`). The
//! resulting digest embeds its salt and cost, so only the digest is stored.

use thiserror::Error;

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Invalid password digest format")]
    InvalidDigestFormat,
}

/// Hash a plaintext password with the given bcrypt cost
///
/// The returned digest is safe to store; it is irreversible and carries its
/// own salt.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(password, cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Verify a plaintext password against a stored digest
///
/// Returns `Ok(false)` for a mismatch; an error only means the stored digest
/// itself is unreadable.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, digest).map_err(|_| PasswordError::InvalidDigestFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the test suite fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "secret123";
        let digest = hash_password(password, TEST_COST).expect("Failed to hash password");

        assert!(verify_password(password, &digest).expect("Verification failed"));
        assert!(!verify_password("wrong-password", &digest).expect("Verification failed"));
    }

    #[test]
    fn test_same_password_produces_different_digests() {
        let password = "secret123";

        let digest1 = hash_password(password, TEST_COST).unwrap();
        let digest2 = hash_password(password, TEST_COST).unwrap();

        // Random salts
        assert_ne!(digest1, digest2);
        assert!(verify_password(password, &digest1).unwrap());
        assert!(verify_password(password, &digest2).unwrap());
    }

    #[test]
    fn test_digest_embeds_cost() {
        let digest = hash_password("secret123", TEST_COST).unwrap();
        assert!(digest.starts_with("$2"));
        assert!(digest.contains("$04$"));
    }

    #[test]
    fn test_invalid_digest_format() {
        let result = verify_password("secret123", "not-a-bcrypt-digest");
        assert!(matches!(result, Err(PasswordError::InvalidDigestFormat)));
    }
}
