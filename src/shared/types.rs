use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by the single error-translation boundary.
///
/// Every failed request renders as `{"errors": [{"message": "...", "field": "..."}]}`,
/// with `field` present only for validation failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// Confirmation envelope for delete operations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    /// Always "ok" while the process is serving requests
    pub status: String,
    /// Seconds since the server started
    pub uptime: u64,
    /// Current server time in milliseconds since the Unix epoch
    pub timestamp: i64,
}
