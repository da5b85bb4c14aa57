use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::users::models::Role;

/// Database model for file metadata
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    pub owner_id: Uuid,
    pub encoding: Option<String>,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// File row joined with its owner, for representations that populate the
/// owner reference. Carries no password column.
#[derive(Debug, Clone, FromRow)]
pub struct FileWithOwner {
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    pub encoding: Option<String>,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_role: Role,
    pub owner_created_at: DateTime<Utc>,
}
