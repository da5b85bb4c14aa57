use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::USERNAME_REGEX;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 3, max = 20, message = "username must be 3-20 characters"))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "username must start with a letter or underscore and contain only letters, digits and underscores"
    ))]
    pub username: String,

    #[validate(length(min = 6, max = 30, message = "password must be 6-30 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// `{ "token": "..." }` body returned by register and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponseDto {
    pub token: String,
}
