//! Error types module
//!
//! All pipeline errors are unified under the `AppError` enum which can
//! represent database, image-processing, storage, and contract errors.
//! Component-local error taxonomies (bundle analysis, submission validation,
//! storage I/O) live next to their components and convert into `AppError`
//! at the pipeline boundary.

use std::io;

use sqlx::Error as SqlxError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Contract violation: an accessor was called for data that the current
    /// pipeline state cannot provide. Should not occur with correct call
    /// sequencing and is treated as fatal.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl AppError {
    /// Get the error type name for log fields and error reports
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::Storage(_) => "Storage",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::IllegalState(_) => "IllegalState",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Whether the error is caller-correctable (bad submission content)
    /// rather than an infrastructural failure.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}
