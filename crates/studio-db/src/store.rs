//! Metadata-store trait abstraction
//!
//! This trait defines the minimal interface the pipeline needs from the
//! legacy metadata store, allowing for easy mocking and testing without
//! database dependencies.

use async_trait::async_trait;
use studio_core::{AppError, FileType, ImageRecord};

/// Logical operations against the contest platform's metadata store.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Full file-type reference table.
    async fn file_types(&self) -> Result<Vec<FileType>, AppError>;

    /// Allocate the next value of a named ID sequence (`PATH_SEQ`,
    /// `IMAGE_SEQ`).
    async fn next_sequence_value(&self, sequence: &str) -> Result<i64, AppError>;

    /// Insert a path row. Returns the number of rows affected.
    async fn insert_path(&self, path_id: i64, path: &str) -> Result<u64, AppError>;

    /// Insert an image row for a generated presentation. Returns the number
    /// of rows affected.
    async fn insert_image(&self, image: &ImageRecord) -> Result<u64, AppError>;

    /// Link a generated image to a submission. Returns the number of rows
    /// affected.
    async fn insert_submission_image(
        &self,
        submission_id: i64,
        image_id: i64,
        sort_index: u32,
    ) -> Result<u64, AppError>;
}
