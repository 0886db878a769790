//! PostgreSQL metadata store: file-type reference data, ID sequences, and
//! image/path/linkage inserts for generated presentations.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use studio_core::{AppError, FileType, ImageRecord};

use crate::store::MetadataStore;

/// Row type for the file_type_lu table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct FileTypeRow {
    file_type_id: i64,
    extension: String,
    image_file: bool,
    bundled_file: bool,
}

impl FileTypeRow {
    fn to_file_type(self) -> FileType {
        FileType {
            file_type_id: self.file_type_id,
            extension: self.extension,
            image_file: self.image_file,
            bundled_file: self.bundled_file,
        }
    }
}

/// Metadata store backed by the platform's PostgreSQL database.
#[derive(Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    #[tracing::instrument(skip(self), fields(db.table = "file_type_lu"))]
    async fn file_types(&self) -> Result<Vec<FileType>, AppError> {
        let rows: Vec<FileTypeRow> = sqlx::query_as::<Postgres, FileTypeRow>(
            "SELECT file_type_id, extension, image_file, bundled_file FROM file_type_lu",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.to_file_type()).collect())
    }

    #[tracing::instrument(skip(self), fields(db.sequence = %sequence))]
    async fn next_sequence_value(&self, sequence: &str) -> Result<i64, AppError> {
        let value: i64 = sqlx::query_scalar("SELECT nextval($1::regclass)")
            .bind(sequence.to_lowercase())
            .fetch_one(&self.pool)
            .await?;
        Ok(value)
    }

    #[tracing::instrument(skip(self), fields(db.table = "path", db.record_id = path_id))]
    async fn insert_path(&self, path_id: i64, path: &str) -> Result<u64, AppError> {
        let result = sqlx::query("INSERT INTO path (path_id, path) VALUES ($1, $2)")
            .bind(path_id)
            .bind(path)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self, image), fields(db.table = "image", db.record_id = image.image_id))]
    async fn insert_image(&self, image: &ImageRecord) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO image
              (image_id, image_type_id, path_id, width, height, original_file_name, file_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(image.image_id)
        .bind(image.image_type_id)
        .bind(image.path_id)
        .bind(image.width as i32)
        .bind(image.height as i32)
        .bind(&image.original_file_name)
        .bind(&image.file_name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "submission_image", submission_id, image_id)
    )]
    async fn insert_submission_image(
        &self,
        submission_id: i64,
        image_id: i64,
        sort_index: u32,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "INSERT INTO submission_image (submission_id, image_id, sort_index) VALUES ($1, $2, $3)",
        )
        .bind(submission_id)
        .bind(image_id)
        .bind(sort_index as i32)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
