use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{LoginRequestDto, RegisterRequestDto, TokenResponseDto};
use crate::features::auth::services::AuthService;
use crate::shared::validation::field_errors;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Register a new user account
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Account created, token issued", body = TokenResponseDto),
        (status = 400, description = "Username already exists"),
        (status = 422, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<TokenResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(field_errors(&e)))?;

    let token = service.register(dto).await?;
    Ok((StatusCode::CREATED, Json(TokenResponseDto { token })))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful, token issued", body = TokenResponseDto),
        (status = 403, description = "Invalid credentials"),
        (status = 422, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<TokenResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(field_errors(&e)))?;

    let token = service.login(dto).await?;
    Ok(Json(TokenResponseDto { token }))
}
