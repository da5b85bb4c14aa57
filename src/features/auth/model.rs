use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::models::{Role, User};

/// The user attached to a request after the bearer-token middleware has
/// verified the token and re-loaded the account. Role comes from that fresh
/// row, never from token claims, so a role downgrade takes effect on the
/// next request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Owner-or-administrator rule applied to user and file resources.
    pub fn can_manage(&self, owner_username: &str) -> bool {
        self.is_administrator() || self.username == owner_username
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::create_test_user;

    #[test]
    fn test_administrator_can_manage_anyone() {
        let admin = create_test_user("root", Role::Administrator);
        assert!(admin.can_manage("root"));
        assert!(admin.can_manage("someone_else"));
    }

    #[test]
    fn test_user_can_manage_only_self() {
        let user = create_test_user("alice", Role::User);
        assert!(user.can_manage("alice"));
        assert!(!user.can_manage("bob"));
    }
}
