use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::FileWithOwner;
use crate::features::users::dtos::UserDto;

/// Client-facing file representation with the owner populated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileDto {
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner: UserDto,
}

impl From<FileWithOwner> for FileDto {
    fn from(row: FileWithOwner) -> Self {
        Self {
            id: row.id,
            filename: row.filename,
            path: row.path,
            encoding: row.encoding,
            mime_type: row.mime_type,
            created_at: row.created_at,
            owner: UserDto {
                id: row.owner_id,
                username: row.owner_username,
                role: row.owner_role,
                created_at: row.owner_created_at,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileEnvelope {
    pub file: FileDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilesEnvelope {
    pub files: Vec<FileDto>,
}

/// Multipart upload form, for API documentation only; the handler walks the
/// multipart fields directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}
