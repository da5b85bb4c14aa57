//! Role-based authorization guards.
//!
//! Guards extract the authenticated user from request extensions and verify
//! the required role before the handler runs. There are two roles:
//! administrator (full access to every resource) and user (access to own
//! account and own files only). Owner-or-administrator checks that depend on
//! a path parameter live in the services instead.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::UNAUTHORIZED_MESSAGE;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for administrator-only routes.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdministrator(user): RequireAdministrator) { ... }
/// ```
pub struct RequireAdministrator(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdministrator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()))?;

        if !user.is_administrator() {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }

        Ok(RequireAdministrator(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::Role;
    use crate::shared::test_helpers::{create_test_user, with_authenticated_user};
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn admin_only(RequireAdministrator(user): RequireAdministrator) -> String {
        user.username
    }

    fn router() -> Router {
        Router::new().route("/admin", get(admin_only))
    }

    #[tokio::test]
    async fn test_administrator_passes_guard() {
        let app = with_authenticated_user(router(), create_test_user("root", Role::Administrator));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/admin").await;
        response.assert_status(StatusCode::OK);
        response.assert_text("root");
    }

    #[tokio::test]
    async fn test_plain_user_is_rejected() {
        let app = with_authenticated_user(router(), create_test_user("alice", Role::User));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/admin").await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["errors"][0]["message"], UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_user_is_rejected() {
        let server = TestServer::new(router()).unwrap();

        let response = server.get("/admin").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}
