use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::{ErrorBody, ErrorDetail};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(Vec<ErrorDetail>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![ErrorDetail::new("Internal server error")],
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, vec![ErrorDetail::new(msg)]),
            AppError::Validation(details) => (StatusCode::UNPROCESSABLE_ENTITY, details),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, vec![ErrorDetail::new(msg)]),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, vec![ErrorDetail::new(msg)]),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![ErrorDetail::new("Internal server error")],
                )
            }
        };

        (status, Json(ErrorBody { errors })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("File not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["message"], "File not found");
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_403() {
        let response =
            AppError::Forbidden("You are not authorized to access this route".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(
            body["errors"][0]["message"],
            "You are not authorized to access this route"
        );
    }

    #[tokio::test]
    async fn test_validation_maps_to_422_with_fields() {
        let response = AppError::Validation(vec![ErrorDetail::with_field(
            "password must be at least 6 characters",
            "password",
        )])
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["field"], "password");
    }

    #[tokio::test]
    async fn test_internal_never_leaks_detail() {
        let response = AppError::Internal("secret path /srv/x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["message"], "Internal server error");
    }
}
