use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdministrator;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{
    CreateUserDto, UpdateUserDto, UserEnvelope, UsersEnvelope,
};
use crate::features::users::services::UserService;
use crate::shared::types::MessageDto;
use crate::shared::validation::field_errors;

/// List all users (administrator only)
#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "All users, passwords excluded", body = UsersEnvelope),
        (status = 403, description = "Not authorized")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    RequireAdministrator(_user): RequireAdministrator,
    State(service): State<Arc<UserService>>,
) -> Result<Json<UsersEnvelope>> {
    let users = service.list().await?;
    Ok(Json(UsersEnvelope { users }))
}

/// Get a user by username (owner or administrator)
#[utoipa::path(
    get,
    path = "/v1/users/{username}",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 200, description = "User detail, password excluded", body = UserEnvelope),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "User does not exist")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(username): Path<String>,
) -> Result<Json<UserEnvelope>> {
    let target = service.get(&user, &username).await?;
    Ok(Json(UserEnvelope { user: target }))
}

/// Create a user directly (administrator only)
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Username already exists"),
        (status = 403, description = "Not authorized"),
        (status = 422, description = "Validation error")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    RequireAdministrator(_user): RequireAdministrator,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserEnvelope>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(field_errors(&e)))?;

    let created = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(UserEnvelope { user: created })))
}

/// Update a user's password or role (owner or administrator; role changes
/// are administrator-only)
#[utoipa::path(
    patch,
    path = "/v1/users/{username}",
    params(("username" = String, Path, description = "Account username")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "User does not exist"),
        (status = 422, description = "Validation error")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(username): Path<String>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> Result<Json<UserEnvelope>> {
    dto.validate()
        .map_err(|e| AppError::Validation(field_errors(&e)))?;

    let updated = service.update(&user, &username, dto).await?;
    Ok(Json(UserEnvelope { user: updated }))
}

/// Delete a user (owner or administrator)
#[utoipa::path(
    delete,
    path = "/v1/users/{username}",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 200, description = "Deletion confirmation", body = MessageDto),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "User does not exist")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(username): Path<String>,
) -> Result<Json<MessageDto>> {
    service.delete(&user, &username).await?;
    Ok(Json(MessageDto::new("User deleted successfully")))
}
