use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{routing::get, Router};
use std::sync::Arc;

/// User routes. All of them sit behind the bearer-token middleware; the
/// per-route owner/administrator rules live in the guard and the service.
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/v1/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/v1/users/{username}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .with_state(service)
}
