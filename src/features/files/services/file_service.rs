use bytes::Bytes;
use futures::Stream;
use sqlx::PgPool;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::FileDto;
use crate::features::files::models::{File, FileWithOwner};
use crate::features::users::models::User;
use crate::modules::storage::DiskStore;
use crate::shared::constants::UNAUTHORIZED_MESSAGE;

const FILE_WITH_OWNER_SELECT: &str = r#"
    SELECT f.id, f.filename, f.path, f.encoding, f.mime_type, f.created_at,
           u.id AS owner_id, u.username AS owner_username, u.role AS owner_role,
           u.created_at AS owner_created_at
    FROM files f
    JOIN users u ON u.id = f.owner_id
"#;

/// File metadata CRUD plus the disk-backed upload/download/delete paths.
pub struct FileService {
    pool: PgPool,
    store: Arc<DiskStore>,
}

impl FileService {
    pub fn new(pool: PgPool, store: Arc<DiskStore>) -> Self {
        Self { pool, store }
    }

    async fn find_with_owner(&self, file_id: Uuid) -> Result<Option<FileWithOwner>> {
        let query = format!("{} WHERE f.id = $1", FILE_WITH_OWNER_SELECT);
        let row = sqlx::query_as::<_, FileWithOwner>(&query)
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// All files with owners populated. Administrator-only; the route guard
    /// enforces it.
    pub async fn list(&self) -> Result<Vec<FileDto>> {
        let query = format!("{} ORDER BY f.created_at", FILE_WITH_OWNER_SELECT);
        let rows = sqlx::query_as::<_, FileWithOwner>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FileDto::from).collect())
    }

    /// Single file by id with owner populated.
    pub async fn get(&self, file_id: Uuid) -> Result<FileDto> {
        let row = self
            .find_with_owner(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        Ok(FileDto::from(row))
    }

    /// Files owned by the named user. The username resolves first so an
    /// unknown target is a 404 regardless of the requester; then the
    /// owner-or-administrator rule applies.
    pub async fn list_for_user(
        &self,
        requester: &AuthenticatedUser,
        username: &str,
    ) -> Result<Vec<FileDto>> {
        let owner = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !requester.can_manage(&owner.username) {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }

        let query = format!(
            "{} WHERE f.owner_id = $1 ORDER BY f.created_at",
            FILE_WITH_OWNER_SELECT
        );
        let rows = sqlx::query_as::<_, FileWithOwner>(&query)
            .bind(owner.id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FileDto::from).collect())
    }

    /// Stream an upload to disk under the requester's directory, then persist
    /// the metadata record. A duplicate destination rejects before any byte
    /// is written; a record collision after a successful write removes the
    /// fresh file so disk and database stay consistent.
    pub async fn upload<S, E>(
        &self,
        owner: &AuthenticatedUser,
        filename: &str,
        encoding: Option<String>,
        mime_type: Option<String>,
        stream: S,
    ) -> Result<FileDto>
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let path = self.store.store(&owner.username, filename, stream).await?;
        let path_str = path.to_string_lossy().into_owned();

        let inserted = sqlx::query_as::<_, File>(
            r#"
            INSERT INTO files (filename, path, owner_id, encoding, mime_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(filename)
        .bind(&path_str)
        .bind(owner.id)
        .bind(&encoding)
        .bind(&mime_type)
        .fetch_one(&self.pool)
        .await;

        let file = match inserted {
            Ok(file) => file,
            Err(e) => {
                // The exclusive create guarantees the bytes on disk are ours,
                // so remove them before surfacing the record conflict.
                if let Err(cleanup_err) = self.store.remove(&path).await {
                    warn!(
                        path = %path.display(),
                        error = %cleanup_err,
                        "failed to remove upload after record conflict"
                    );
                }
                if is_unique_violation(&e) {
                    return Err(AppError::BadRequest("File already exists".to_string()));
                }
                return Err(AppError::Database(e));
            }
        };

        info!(
            "File uploaded: id={}, filename={}, owner={}",
            file.id, file.filename, owner.username
        );

        // Re-read joined so the response carries the populated owner.
        self.get(file.id).await
    }

    /// Open a stored file for download. Visible to the owner and
    /// administrators; stat or open failures are fatal for the request.
    pub async fn download(
        &self,
        requester: &AuthenticatedUser,
        file_id: Uuid,
    ) -> Result<(FileWithOwner, tokio::fs::File, u64)> {
        let row = self
            .find_with_owner(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if !requester.can_manage(&row.owner_username) {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }

        let (file, size) = self.store.open(Path::new(&row.path)).await?;
        Ok((row, file, size))
    }

    /// Remove the on-disk file (tolerating it already being gone) and then
    /// the record. Owner or administrator only.
    pub async fn delete(&self, requester: &AuthenticatedUser, file_id: Uuid) -> Result<()> {
        let row = self
            .find_with_owner(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if !requester.can_manage(&row.owner_username) {
            return Err(AppError::Forbidden(UNAUTHORIZED_MESSAGE.to_string()));
        }

        self.store.remove(Path::new(&row.path)).await?;

        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(row.id)
            .execute(&self.pool)
            .await?;

        info!(
            "File deleted: id={}, filename={}, by={}",
            row.id, row.filename, requester.username
        );

        Ok(())
    }
}
