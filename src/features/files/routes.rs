use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::features::files::handlers;
use crate::features::files::services::FileService;

/// File routes (all require JWT authentication)
pub fn routes(service: Arc<FileService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/v1/files",
            get(handlers::list_files)
                .post(handlers::upload_file)
                .layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/v1/files/{fileId}",
            get(handlers::get_file).delete(handlers::delete_file),
        )
        .route("/v1/files/{fileId}/download", get(handlers::download_file))
        .route("/v1/users/{username}/files", get(handlers::list_user_files))
        .with_state(service)
}
