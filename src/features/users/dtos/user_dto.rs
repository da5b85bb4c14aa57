use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{Role, User};
use crate::shared::validation::USERNAME_REGEX;

/// Client-facing user representation. The password hash is excluded by
/// construction: this type has no field for it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Request body for administrator-initiated user creation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 20, message = "username must be 3-20 characters"))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "username must start with a letter or underscore and contain only letters, digits and underscores"
    ))]
    pub username: String,

    #[validate(length(min = 6, max = 30, message = "password must be 6-30 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: Role,
}

/// Request body for PATCH /v1/users/{username}. Owners may change their own
/// password; only administrators may change role.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 6, max = 30, message = "password must be 6-30 characters"))]
    pub password: Option<String>,

    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersEnvelope {
    pub users: Vec<UserDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_user_dto_valid() {
        let dto = CreateUserDto {
            username: "Tester".to_string(),
            password: "password".to_string(),
            role: Role::User,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_user_dto_rejects_short_password() {
        let dto = CreateUserDto {
            username: "Tester".to_string(),
            password: "short".to_string(),
            role: Role::User,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_user_dto_rejects_bad_username() {
        let dto = CreateUserDto {
            username: "bad name".to_string(),
            password: "password".to_string(),
            role: Role::User,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_user_dto_allows_empty_patch() {
        let dto = UpdateUserDto {
            password: None,
            role: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_user_dto_never_carries_password() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            username: "Tester".to_string(),
            password: "$argon2id$...".to_string(),
            role: Role::User,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let value = serde_json::to_value(UserDto::from(user)).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "Tester");
    }
}
