use sqlx::PgPool;
use tracing::info;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto, UserDto};
use crate::features::users::models::User;
use crate::features::auth::services::password_service;
use crate::shared::constants::UNAUTHORIZED_MESSAGE;

/// User account CRUD with the owner-or-administrator access rules.
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// All users, password hashes excluded by the DTO. Administrator-only;
    /// the route guard enforces it.
    pub async fn list(&self) -> Result<Vec<UserDto>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Single user by username; visible to the account owner and
    /// administrators only.
    pub async fn get(&self, requester: &AuthenticatedUser, username: &str) -> Result<UserDto> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !requester.can_manage(&user.username) {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }

        Ok(UserDto::from(user))
    }

    /// Administrator-initiated creation, distinct from self-registration:
    /// the role may be set directly and no token is issued.
    pub async fn create(&self, dto: CreateUserDto) -> Result<UserDto> {
        if self.find_by_username(&dto.username).await?.is_some() {
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
        .bind(dto.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest("User already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        info!("User created: id={}, username={}", user.id, user.username);

        Ok(UserDto::from(user))
    }

    /// Owners may change their own password; only administrators may change
    /// role. Password changes are re-hashed before storage.
    pub async fn update(
        &self,
        requester: &AuthenticatedUser,
        username: &str,
        dto: UpdateUserDto,
    ) -> Result<UserDto> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !requester.can_manage(&user.username) {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }
        if dto.role.is_some() && !requester.is_administrator() {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }

        let password_hash = match dto.password {
            Some(password) => Some(password_service::hash_password(password).await?),
            None => None,
        };

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = COALESCE($2, password),
                role = COALESCE($3, role),
                updated_at = NOW()
            WHERE username = $1
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(password_hash.as_deref())
        .bind(dto.role)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "User updated: id={}, username={}, by={}",
            updated.id, updated.username, requester.username
        );

        Ok(UserDto::from(updated))
    }

    /// Remove the account. Owned files and their records go with it via the
    /// foreign-key cascade; on-disk bytes are left to the file routes.
    pub async fn delete(&self, requester: &AuthenticatedUser, username: &str) -> Result<()> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !requester.can_manage(&user.username) {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        info!(
            "User deleted: id={}, username={}, by={}",
            user.id, user.username, requester.username
        );

        Ok(())
    }
}
