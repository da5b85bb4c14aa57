#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::users::models::Role;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub fn create_test_user(username: &str, role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        username: username.to_string(),
        role,
    }
}

/// Layer a router so every request carries the given authenticated user,
/// bypassing the bearer-token middleware in tests.
#[cfg(test)]
pub fn with_authenticated_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
