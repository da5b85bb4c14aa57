use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::core::error::{AppError, Result};

/// Hash a password with a fresh salt. Argon2 is CPU-bound, so the work runs
/// on the blocking pool to keep request workers free.
pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

/// Compare a candidate password against a stored PHC hash string.
/// A malformed stored hash is an internal error, not a failed comparison.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify_accepts_correct_password() {
        let hash = hash_password("password".to_string()).await.unwrap();
        assert_ne!(hash, "password");
        assert!(verify_password("password".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_password() {
        let hash = hash_password("password".to_string()).await.unwrap();
        assert!(!verify_password("passw0rd".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let first = hash_password("password".to_string()).await.unwrap();
        let second = hash_password("password".to_string()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_internal_error() {
        let result = verify_password("password".to_string(), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
