use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::users::models::User;
use crate::shared::constants::UNAUTHORIZED_MESSAGE;

/// Subject claims carried by issued tokens: user id and username only.
/// Authorization decisions beyond identity must not trust these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens with a fixed expiry.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: i64,
    leeway_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry_secs: config.token_expiry.as_secs() as i64,
            leeway_secs: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            iat: now,
            exp: now + self.expiry_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry. Any failure collapses into the uniform
    /// authorization error; the cause is logged, not returned.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::Role;
    use std::time::Duration;

    fn test_config(expiry: Duration) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry: expiry,
            jwt_leeway: Duration::ZERO,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "Tester".to_string(),
            password: "hash".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify_round_trips_identity() {
        let service = TokenService::new(&test_config(Duration::from_secs(900)));
        let user = test_user();

        let token = service.issue(&user).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "Tester");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new(&test_config(Duration::from_secs(900)));

        // Encode a token whose expiry is an hour in the past with the same
        // secret the service verifies with.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "Tester".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let service = TokenService::new(&test_config(Duration::from_secs(900)));
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "other-secret".to_string(),
            token_expiry: Duration::from_secs(900),
            jwt_leeway: Duration::ZERO,
        });

        let token = other.issue(&test_user()).unwrap();
        assert!(matches!(
            service.verify(&token),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new(&test_config(Duration::from_secs(900)));
        assert!(service.verify("not-a-token").is_err());
    }
}
