use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireAdministrator;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{FileDto, FileEnvelope, FilesEnvelope, UploadFileDto};
use crate::features::files::services::FileService;
use crate::shared::types::MessageDto;

/// Malformed identifiers are client errors, not routing misses.
fn parse_file_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid ID".to_string()))
}

/// List all files (administrator only)
#[utoipa::path(
    get,
    path = "/v1/files",
    responses(
        (status = 200, description = "All files with owners populated", body = FilesEnvelope),
        (status = 403, description = "Not authorized")
    ),
    tag = "files",
    security(("bearer_auth" = []))
)]
pub async fn list_files(
    RequireAdministrator(_user): RequireAdministrator,
    State(service): State<Arc<FileService>>,
) -> Result<Json<FilesEnvelope>> {
    let files = service.list().await?;
    Ok(Json(FilesEnvelope { files }))
}

/// Get file metadata by id (administrator only)
#[utoipa::path(
    get,
    path = "/v1/files/{fileId}",
    params(("fileId" = String, Path, description = "File id")),
    responses(
        (status = 200, description = "File detail with owner populated", body = FileEnvelope),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "File not found")
    ),
    tag = "files",
    security(("bearer_auth" = []))
)]
pub async fn get_file(
    RequireAdministrator(_user): RequireAdministrator,
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
) -> Result<Json<FileEnvelope>> {
    let file = service.get(parse_file_id(&file_id)?).await?;
    Ok(Json(FileEnvelope { file }))
}

/// List a user's files (owner or administrator)
#[utoipa::path(
    get,
    path = "/v1/users/{username}/files",
    params(("username" = String, Path, description = "Owner username")),
    responses(
        (status = 200, description = "Files owned by the user", body = FilesEnvelope),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "User does not exist")
    ),
    tag = "files",
    security(("bearer_auth" = []))
)]
pub async fn list_user_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(username): Path<String>,
) -> Result<Json<FilesEnvelope>> {
    let files = service.list_for_user(&user, &username).await?;
    Ok(Json(FilesEnvelope { files }))
}

/// Upload a file
///
/// Accepts multipart/form-data; the first `file` part is streamed to disk
/// under the requester's directory and recorded. Non-file parts are drained
/// and ignored.
#[utoipa::path(
    post,
    path = "/v1/files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Multipart form with a single file part",
    ),
    responses(
        (status = 201, description = "File stored and recorded", body = FileEnvelope),
        (status = 400, description = "Duplicate or invalid file"),
        (status = 403, description = "Not authorized")
    ),
    tag = "files",
    security(("bearer_auth" = []))
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileEnvelope>)> {
    let mut uploaded: Option<FileDto> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" && uploaded.is_none() {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;
            let mime_type = field.content_type().map(|s| s.to_string());
            let encoding = field
                .headers()
                .get("content-transfer-encoding")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            // Adapt the field into a chunk stream so the store never sees
            // multipart types.
            let stream = Box::pin(futures::stream::unfold(
                &mut field,
                |field| async move {
                    match field.chunk().await {
                        Ok(Some(chunk)) => Some((Ok(chunk), field)),
                        Ok(None) => None,
                        Err(e) => Some((Err(e), field)),
                    }
                },
            ));

            let file = service
                .upload(&user, &filename, encoding, mime_type, stream)
                .await?;
            uploaded = Some(file);
        } else {
            // Field-only parts are accepted but incidental; drain them.
            debug!("Ignoring multipart field: {}", field_name);
            let _ = field.bytes().await;
        }
    }

    let file = uploaded.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    Ok((StatusCode::CREATED, Json(FileEnvelope { file })))
}

/// Download a file's bytes (owner or administrator)
#[utoipa::path(
    get,
    path = "/v1/files/{fileId}/download",
    params(("fileId" = String, Path, description = "File id")),
    responses(
        (status = 200, description = "File bytes as an attachment"),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "File not found")
    ),
    tag = "files",
    security(("bearer_auth" = []))
)]
pub async fn download_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
) -> Result<Response> {
    let (row, file, size) = service.download(&user, parse_file_id(&file_id)?).await?;

    // Quotes would break the disposition header; strip them from the name.
    let safe_filename = row.filename.replace('"', "");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", safe_filename),
        )
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}

/// Delete a file and its record (owner or administrator)
#[utoipa::path(
    delete,
    path = "/v1/files/{fileId}",
    params(("fileId" = String, Path, description = "File id")),
    responses(
        (status = 200, description = "Deletion confirmation", body = MessageDto),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "File not found")
    ),
    tag = "files",
    security(("bearer_auth" = []))
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
) -> Result<Json<MessageDto>> {
    service.delete(&user, parse_file_id(&file_id)?).await?;
    Ok(Json(MessageDto::new("File deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_id_rejects_malformed_input() {
        let err = parse_file_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Invalid ID"));
    }

    #[test]
    fn test_parse_file_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_file_id(&id.to_string()).unwrap(), id);
    }
}
