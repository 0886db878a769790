//! Bundle analysis of submitted archives.

mod analyzer;

pub use analyzer::{BundleAnalysis, ZipBundleAnalyzer};

use studio_core::AppError;
use thiserror::Error;

/// Errors raised while opening or scanning a submission bundle, plus the
/// contract errors of [`BundleAnalysis`] accessors.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Failed to open archive {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Failed to read archive entry {name}: {reason}")]
    Entry { name: String, reason: String },

    #[error("There is no preview image available from the submission")]
    PreviewImageUnavailable,

    #[error("There is no preview file available from the submission")]
    PreviewFileUnavailable,
}

impl From<BundleError> for AppError {
    fn from(err: BundleError) -> Self {
        match err {
            BundleError::Open { .. } | BundleError::Entry { .. } => {
                AppError::InvalidInput(err.to_string())
            }
            BundleError::PreviewImageUnavailable | BundleError::PreviewFileUnavailable => {
                AppError::IllegalState(err.to_string())
            }
        }
    }
}
