//! Local filesystem store for generated submission files.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::paths;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirFailed { path: String, source: io::Error },

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem store rooted at the design-submissions base directory.
///
/// Owns the submission path scheme (see [`crate::paths`]) and performs the
/// actual writes of generated presentation files.
#[derive(Clone)]
pub struct SubmissionStore {
    base_path: PathBuf,
}

impl SubmissionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory for a submitter's generated files within a challenge.
    pub fn submission_root(&self, challenge_id: i64, user_id: i64, handle: &str) -> PathBuf {
        paths::submission_root(&self.base_path, challenge_id, user_id, handle)
    }

    /// Path for an alternate representation of `original_file_name`.
    pub fn alternate_file_name(
        &self,
        challenge_id: i64,
        user_id: i64,
        handle: &str,
        submission_id: i64,
        original_file_name: &str,
        kind: &str,
    ) -> PathBuf {
        paths::alternate_file_name(
            &self.base_path,
            challenge_id,
            user_id,
            handle,
            submission_id,
            original_file_name,
            kind,
        )
    }

    /// Create the submission directory and all intermediate path segments.
    pub async fn ensure_submission_dir(
        &self,
        challenge_id: i64,
        user_id: i64,
        handle: &str,
    ) -> StorageResult<PathBuf> {
        let dir = self.submission_root(challenge_id, user_id, handle);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::CreateDirFailed {
                path: dir.display().to_string(),
                source: e,
            })?;
        tracing::debug!(path = %dir.display(), "Submission directory ready");
        Ok(dir)
    }

    /// Write `data` to `path`, syncing to disk before returning.
    pub async fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Submission file written"
        );

        Ok(())
    }

    /// Size in bytes of a file, or `NotFound` if it does not exist.
    pub async fn file_size(&self, path: &Path) -> StorageResult<u64> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
