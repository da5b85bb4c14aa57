//! Local-disk file store.
//!
//! Files live under `<upload-root>/<username>/<original-filename>`. Writes
//! use exclusive creation so the existence check and the create are one
//! atomic filesystem call; the files.path unique index in the database is
//! the backstop for anything that slips past it.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.upload_root.clone(),
        }
    }

    /// Create the upload root if missing. Called once at startup.
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload root: {}", e)))
    }

    /// Destination path for a user's file.
    pub fn path_for(&self, username: &str, filename: &str) -> PathBuf {
        self.root.join(username).join(filename)
    }

    /// Stream an incoming file to disk under the user's directory.
    ///
    /// The per-user directory is created if missing. The destination is
    /// opened with `create_new`, so an existing file rejects the upload
    /// before any byte is written. A failure mid-stream (including client
    /// disconnect surfacing as a stream error) deletes the partial file
    /// best-effort and propagates the original error.
    pub async fn store<S, E>(&self, username: &str, filename: &str, stream: S) -> Result<PathBuf>
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        validate_filename(filename)?;

        let dir = self.root.join(username);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;

        let path = dir.join(filename);
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(AppError::BadRequest("File already exists".to_string()));
            }
            Err(e) => {
                return Err(AppError::Internal(format!(
                    "Failed to create destination file: {}",
                    e
                )));
            }
        };

        match write_stream(file, stream).await {
            Ok(bytes_written) => {
                debug!(
                    path = %path.display(),
                    bytes = bytes_written,
                    "upload written to disk"
                );
                Ok(path)
            }
            Err(err) => {
                // Cleanup failures are swallowed so the primary error is not masked.
                if let Err(cleanup_err) = fs::remove_file(&path).await {
                    warn!(
                        path = %path.display(),
                        error = %cleanup_err,
                        "failed to remove partial upload"
                    );
                }
                Err(err)
            }
        }
    }

    /// Open a stored file for streaming, returning the handle and its size.
    /// Any stat/open failure is fatal for the request.
    pub async fn open(&self, path: &Path) -> Result<(tokio::fs::File, u64)> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to stat stored file: {}", e)))?;

        let file = fs::File::open(path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to open stored file: {}", e)))?;

        Ok((file, metadata.len()))
    }

    /// Remove a stored file. A file that is already gone is downgraded to a
    /// warning: the database record is the source of truth for existence.
    /// Every other filesystem error fails loudly.
    pub async fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "stored file already missing on delete");
                Ok(())
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to remove stored file: {}",
                e
            ))),
        }
    }
}

async fn write_stream<S, E>(mut file: tokio::fs::File, mut stream: S) -> Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut bytes_written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| AppError::BadRequest(format!("Upload stream failed: {}", e)))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write upload: {}", e)))?;
        bytes_written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to flush upload: {}", e)))?;
    Ok(bytes_written)
}

/// Uploaded names must be plain file names, not paths.
fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(AppError::BadRequest("Invalid filename".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::convert::Infallible;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> DiskStore {
        DiskStore::new(&StorageConfig {
            upload_root: dir.path().to_path_buf(),
        })
    }

    fn chunks(parts: &[&str]) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_store_creates_per_user_directory_and_writes_bytes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let path = store
            .store("alice", "a.jpg", chunks(&["hello ", "world"]))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("alice").join("a.jpg"));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn test_duplicate_upload_is_rejected_and_first_file_survives() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .store("alice", "a.jpg", chunks(&["first"]))
            .await
            .unwrap();
        let err = store
            .store("alice", "a.jpg", chunks(&["second"]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "File already exists"));
        let path = dir.path().join("alice").join("a.jpg");
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_failed_stream_cleans_up_partial_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let failing = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err("connection reset"),
        ]);
        let err = store.store("alice", "b.bin", failing).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(!dir.path().join("alice").join("b.bin").exists());
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let path = dir.path().join("alice").join("gone.txt");
        assert!(store.remove(&path).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_deletes_existing_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let path = store
            .store("alice", "c.txt", chunks(&["bytes"]))
            .await
            .unwrap();
        store.remove(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_path_traversal_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for name in ["../evil", "a/b", "a\\b", "", ".", ".."] {
            let err = store.store("alice", name, chunks(&["x"])).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "name: {:?}", name);
        }
    }

    #[tokio::test]
    async fn test_open_returns_size() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let path = store
            .store("alice", "d.txt", chunks(&["12345"]))
            .await
            .unwrap();
        let (_file, size) = store.open(&path).await.unwrap();
        assert_eq!(size, 5);
    }

    #[tokio::test]
    async fn test_open_missing_file_is_internal_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store
            .open(&dir.path().join("missing.bin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
