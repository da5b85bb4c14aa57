use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto};
use crate::features::auth::services::password_service;
use crate::features::auth::services::TokenService;
use crate::features::users::models::{Role, User};
use crate::shared::constants::INVALID_CREDENTIALS_MESSAGE;

/// Registration and login, issuing signed bearer tokens on success.
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    /// Create a self-registered account and issue a token for it.
    /// Fails with a duplicate error if the username is taken.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<String> {
        let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(&dto.username)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let password_hash = password_service::hash_password(dto.password).await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&dto.username)
        .bind(&password_hash)
        .bind(Role::User)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Two concurrent registrations can both pass the lookup; the
            // unique index decides the winner.
            if is_unique_violation(&e) {
                AppError::BadRequest("User already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        info!("User registered: id={}, username={}", user.id, user.username);

        self.tokens.issue(&user)
    }

    /// Validate credentials and issue a token. The failure message never
    /// distinguishes "no such user" from "wrong password".
    pub async fn login(&self, dto: LoginRequestDto) -> Result<String> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(&dto.username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Forbidden(INVALID_CREDENTIALS_MESSAGE.to_string()))?;

        let valid = password_service::verify_password(dto.password, user.password.clone()).await?;
        if !valid {
            return Err(AppError::Forbidden(INVALID_CREDENTIALS_MESSAGE.to_string()));
        }

        info!("User logged in: id={}, username={}", user.id, user.username);

        self.tokens.issue(&user)
    }
}
