use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::TokenService;
use crate::features::users::models::User;
use crate::shared::constants::UNAUTHORIZED_MESSAGE;

/// Resolves a bearer token to a live user record. Verification alone is not
/// enough: the account behind a valid token may have been deleted or its
/// role changed, so the row is re-loaded on every request.
pub struct Authenticator {
    tokens: Arc<TokenService>,
    pool: PgPool,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, pool: PgPool) -> Self {
        Self { tokens, pool }
    }

    pub async fn resolve(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.tokens.verify(token)?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(&claims.username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()))?;

        Ok(AuthenticatedUser::from(user))
    }
}
