//! Unified submission validation.
//!
//! Answers "is this submission archive well-formed": the archive must carry
//! a native-source entry, a preview image, and a preview file. Incomplete
//! submissions produce a structured outcome with a deterministic message;
//! only infrastructural problems (missing file, unknown type, corrupt
//! archive) surface as errors.

use std::path::Path;
use std::sync::Arc;

use studio_core::constants::{JAR_ARCHIVE_TYPE_ID, ZIP_ARCHIVE_TYPE_ID};
use studio_core::{AppError, SubmissionConfig};
use studio_db::MetadataStore;
use thiserror::Error;

use crate::archive::{BundleError, ZipBundleAnalyzer};
use crate::resolver::FileTypeResolver;

/// Validation errors for submission files
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Submission file is empty: {0}")]
    EmptyFile(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("The file type [{0}] is not an archive file")]
    NotAnArchive(i64),

    #[error("There is no parser for file type [{0}]")]
    NoParserAvailable(i64),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::App(e) => e,
            ValidationError::Bundle(e) => e.into(),
            ValidationError::Io(e) => e.into(),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

/// Outcome of validating a well-formed submission archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }

    fn success() -> Self {
        Self {
            valid: true,
            message: "Success".to_string(),
        }
    }
}

/// Validator for unified design submissions.
pub struct SubmissionValidator {
    store: Arc<dyn MetadataStore>,
    source_prefix: String,
    submission_prefix: String,
}

impl SubmissionValidator {
    pub fn new(store: Arc<dyn MetadataStore>, submissions: &SubmissionConfig) -> Self {
        Self {
            store,
            source_prefix: submissions.source_prefix.clone(),
            submission_prefix: submissions.submission_prefix.clone(),
        }
    }

    /// Resolve the bundled-file parser for `file_path`.
    ///
    /// Only the ZIP and JAR archive types have a registered parser; other
    /// file types are rejected even when marked as bundled.
    pub async fn bundled_file_parser(
        &self,
        file_path: &str,
    ) -> Result<ZipBundleAnalyzer, ValidationError> {
        let resolver = FileTypeResolver::load(self.store.as_ref()).await?;

        let (file_type_id, bundled) = match resolver.resolve(file_path) {
            Some(file_type) => (file_type.file_type_id, file_type.bundled_file),
            None => return Err(ValidationError::UnsupportedFileType(file_path.to_string())),
        };
        if !bundled {
            return Err(ValidationError::NotAnArchive(file_type_id));
        }
        match file_type_id {
            ZIP_ARCHIVE_TYPE_ID | JAR_ARCHIVE_TYPE_ID => Ok(ZipBundleAnalyzer::new(
                resolver,
                self.source_prefix.clone(),
                self.submission_prefix.clone(),
            )),
            other => Err(ValidationError::NoParserAvailable(other)),
        }
    }

    /// Validate the submission archive at `path`.
    pub async fn validate(&self, path: &Path) -> Result<ValidationOutcome, ValidationError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ValidationError::InvalidFilename(
                    path.display().to_string(),
                ))
            }
            Err(e) => return Err(ValidationError::Io(e)),
        };
        if metadata.len() == 0 {
            return Err(ValidationError::EmptyFile(path.display().to_string()));
        }

        let parser = self
            .bundled_file_parser(&path.to_string_lossy())
            .await?;
        let analysis = parser.analyze(path, true)?;

        // Check order fixes the user-facing message when several parts are
        // missing at once.
        let outcome = if !analysis.is_native_submission_available() {
            ValidationOutcome::invalid("No native sources provided in the submission")
        } else if !analysis.is_preview_image_available() {
            ValidationOutcome::invalid("No preview image provided in the submission")
        } else if !analysis.is_preview_file_available() {
            ValidationOutcome::invalid("No preview file provided in the submission")
        } else {
            ValidationOutcome::success()
        };

        tracing::debug!(
            path = %path.display(),
            valid = outcome.valid,
            message = %outcome.message,
            "Submission validated"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_submission_config, write_zip, MockMetadataStore};
    use tempfile::tempdir;

    fn validator() -> SubmissionValidator {
        SubmissionValidator::new(Arc::new(MockMetadataStore::new()), &test_submission_config())
    }

    #[tokio::test]
    async fn test_parser_for_zip_and_jar() {
        let validator = validator();
        assert!(validator.bundled_file_parser("bundle.zip").await.is_ok());
        assert!(validator.bundled_file_parser("bundle.jar").await.is_ok());
    }

    #[tokio::test]
    async fn test_parser_unsupported_file_type() {
        let result = validator().bundled_file_parser("bundle.unknownext").await;
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedFileType(_))
        ));
    }

    #[tokio::test]
    async fn test_parser_not_an_archive() {
        let result = validator().bundled_file_parser("preview.jpg").await;
        assert!(matches!(result, Err(ValidationError::NotAnArchive(_))));
    }

    #[tokio::test]
    async fn test_parser_bundled_type_without_parser() {
        // .rar is bundled in the test reference table but has no parser
        let result = validator().bundled_file_parser("bundle.rar").await;
        assert!(matches!(result, Err(ValidationError::NoParserAvailable(_))));
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let dir = tempdir().unwrap();
        let result = validator().validate(&dir.path().join("missing.zip")).await;
        assert!(matches!(result, Err(ValidationError::InvalidFilename(_))));
    }

    #[tokio::test]
    async fn test_validate_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.zip");
        std::fs::write(&path, b"").unwrap();

        let result = validator().validate(&path).await;
        assert!(matches!(result, Err(ValidationError::EmptyFile(_))));
    }

    #[tokio::test]
    async fn test_validate_native_source_check_wins_ties() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        // Missing both native sources and preview image
        write_zip(&path, &[("submission/gallery.zip", b"nested".as_slice())]);

        let outcome = validator().validate(&path).await.unwrap();
        assert!(!outcome.valid);
        assert_eq!(
            outcome.message,
            "No native sources provided in the submission"
        );
    }

    #[tokio::test]
    async fn test_validate_preview_file_not_bundled_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        // doc.txt resolves to a type that is neither image nor bundled, so no
        // preview file is recognized
        write_zip(
            &path,
            &[
                ("source/design.psd", b"sources".as_slice()),
                ("submission/preview.jpg", b"jpeg"),
                ("submission/doc.txt", b"notes"),
            ],
        );

        let outcome = validator().validate(&path).await.unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome {
                valid: false,
                message: "No preview file provided in the submission".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_validate_complete_submission() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        write_zip(
            &path,
            &[
                ("source/design.psd", b"sources".as_slice()),
                ("submission/preview.jpg", b"jpeg"),
                ("submission/gallery.zip", b"nested"),
            ],
        );

        let outcome = validator().validate(&path).await.unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome {
                valid: true,
                message: "Success".to_string()
            }
        );
    }
}
