//! Argon2 password hashing.
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use password_hash::rand_core::OsRng;

use crate::error::ApiError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes `password` into a PHC string with a fresh random salt.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if hashing fails or the blocking task
/// panics.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// Checks `password` against a stored PHC string.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the stored hash is unparseable or
/// the blocking task panics. A wrong password is `Ok(false)`.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| ApiError::Internal(format!("stored hash unreadable: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let Ok(hash) = hash_password("correct horse".to_string()).await else {
            panic!("hash failed");
        };
        assert!(hash.starts_with("$argon2"));
        assert!(matches!(
            verify_password("correct horse".to_string(), hash.clone()).await,
            Ok(true)
        ));
        assert!(matches!(
            verify_password("wrong horse".to_string(), hash).await,
            Ok(false)
        ));
    }

    #[tokio::test]
    async fn unreadable_hash_is_an_error() {
        assert!(
            verify_password("pw".to_string(), "plaintext".to_string())
                .await
                .is_err()
        );
    }
}
