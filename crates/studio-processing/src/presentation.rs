//! Generation and persistence of derived presentation images.
//!
//! For every source image the pipeline produces a fixed matrix of
//! presentations (tiny/small/medium/original, plain and watermarked) plus
//! the preview artifacts. Each presentation is materialized on disk and
//! persisted as a path row + image row; the submission-image linkage is
//! accumulated in memory and flushed by the orchestrator once the whole run
//! has succeeded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use studio_core::constants::{
    GALLERY_PLAIN_IMAGE_SIZES, GALLERY_PLAIN_IMAGE_TYPE_IDS, GALLERY_WATERMARKED_IMAGE_SIZES,
    GALLERY_WATERMARKED_IMAGE_TYPE_IDS, IMAGE_SEQUENCE, PATH_SEQUENCE, WIREFRAMES_CATEGORY_ID,
};
use studio_core::{AppError, Challenge, FileType, ImageRecord, SubmissionImage, Submitter};
use studio_db::MetadataStore;
use studio_storage::{paths, SubmissionStore};

use crate::image::TransformEngine;

/// One entry of the presentation matrix: the image type to persist and the
/// maximum size to scale to (`None` keeps the original dimensions).
#[derive(Clone, Copy, Debug)]
pub struct PresentationSpec {
    pub image_type_id: i64,
    pub max_size: Option<u32>,
}

fn specs(type_ids: &[i64], sizes: &[Option<u32>]) -> Vec<PresentationSpec> {
    type_ids
        .iter()
        .zip(sizes)
        .map(|(&image_type_id, &max_size)| PresentationSpec {
            image_type_id,
            max_size,
        })
        .collect()
}

/// The non-watermarked gallery matrix (tiny/small/medium/original).
pub fn plain_gallery_specs() -> Vec<PresentationSpec> {
    specs(&GALLERY_PLAIN_IMAGE_TYPE_IDS, &GALLERY_PLAIN_IMAGE_SIZES)
}

/// The watermarked gallery matrix (small/medium/original).
pub fn watermarked_gallery_specs() -> Vec<PresentationSpec> {
    specs(
        &GALLERY_WATERMARKED_IMAGE_TYPE_IDS,
        &GALLERY_WATERMARKED_IMAGE_SIZES,
    )
}

/// Generates the derived presentations of submission images and records
/// their metadata.
pub struct PresentationGenerator {
    challenge: Challenge,
    submitter: Submitter,
    submission_id: i64,
    store: Arc<dyn MetadataStore>,
    files: SubmissionStore,
    engine: TransformEngine,
    images: Vec<SubmissionImage>,
}

impl PresentationGenerator {
    pub fn new(
        challenge: Challenge,
        submitter: Submitter,
        submission_id: i64,
        store: Arc<dyn MetadataStore>,
        files: SubmissionStore,
        engine: TransformEngine,
    ) -> Self {
        Self {
            challenge,
            submitter,
            submission_id,
            store,
            files,
            engine,
            images: Vec::new(),
        }
    }

    /// Submission-image links accumulated so far, in generation order.
    pub fn images(&self) -> &[SubmissionImage] {
        &self.images
    }

    fn submission_root(&self) -> PathBuf {
        self.files.submission_root(
            self.challenge.challenge_id,
            self.submitter.user_id,
            &self.submitter.handle,
        )
    }

    /// Path of the alternate representation of kind `kind` for
    /// `original_file_name`.
    pub fn alternate_file_name(&self, original_file_name: &str, kind: &str) -> PathBuf {
        self.files.alternate_file_name(
            self.challenge.challenge_id,
            self.submitter.user_id,
            &self.submitter.handle,
            self.submission_id,
            original_file_name,
            kind,
        )
    }

    /// Materialize one presentation of `content` at `dest`: scale to
    /// `max_size` and either watermark-and-persist or persist as-is.
    async fn create_presentation(
        &self,
        dest: &Path,
        watermark: bool,
        max_size: Option<u32>,
        content: &[u8],
        file_type: &FileType,
    ) -> Result<DynamicImage, AppError> {
        let format = TransformEngine::format_for(file_type)?;
        let img = self
            .engine
            .resize_if_necessary(max_size, max_size, format, content)?;
        if watermark {
            self.engine.watermark(&img, dest).await
        } else {
            self.engine.store(&img, format, dest)?;
            Ok(img)
        }
    }

    /// Generate the gallery presentations described by `specs` for one
    /// source image, persisting a path row and an image row per entry and
    /// accumulating the submission-image links.
    ///
    /// Rows from earlier iterations are not rolled back when a later entry
    /// fails.
    pub async fn generate_images(
        &mut self,
        original_path: &str,
        content: &[u8],
        file_type: &FileType,
        specs: &[PresentationSpec],
        watermark: bool,
        file_index: u32,
    ) -> Result<(), AppError> {
        if self.challenge.challenge_category_id == WIREFRAMES_CATEGORY_ID {
            tracing::info!(
                challenge_id = self.challenge.challenge_id,
                "Skipping image file generation for Wireframes challenge"
            );
            return Ok(());
        }

        let path_row = format!(
            "{}{}",
            self.submission_root().display(),
            std::path::MAIN_SEPARATOR
        );

        for spec in specs {
            let kind = format!("{}_{}", spec.image_type_id, file_index);
            let dest = self.alternate_file_name(original_path, &kind);
            let just_file_name = dest
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    AppError::Internal(format!("Invalid presentation path {}", dest.display()))
                })?
                .to_string();

            let presentation = self
                .create_presentation(&dest, watermark, spec.max_size, content, file_type)
                .await?;

            let path_id = self.store.next_sequence_value(PATH_SEQUENCE).await?;
            let inserted = self.store.insert_path(path_id, &path_row).await?;
            if inserted != 1 {
                return Err(AppError::Internal(
                    "Failed to insert record into path table".to_string(),
                ));
            }

            let image_id = self.store.next_sequence_value(IMAGE_SEQUENCE).await?;
            let file_name = if watermark {
                // Watermarked files are persisted in the watermark format
                Path::new(&just_file_name)
                    .with_extension(self.engine.watermark_extension())
                    .display()
                    .to_string()
            } else {
                just_file_name
            };
            let record = ImageRecord {
                image_id,
                image_type_id: spec.image_type_id,
                path_id,
                width: presentation.width(),
                height: presentation.height(),
                original_file_name: paths::file_name(original_path).to_string(),
                file_name,
            };
            let inserted = self.store.insert_image(&record).await?;
            if inserted != 1 {
                return Err(AppError::Internal(
                    "Failed to insert record into image table".to_string(),
                ));
            }

            self.images.push(SubmissionImage {
                image_id,
                sort_index: file_index,
            });
        }
        Ok(())
    }

    /// Generate the preview artifacts for the submission's preview image:
    /// the raw copy, a watermarked original-size copy, and (when the bundle
    /// carries no separate preview file) a watermarked preview document.
    /// The three operations run concurrently.
    pub async fn generate_preview_image_presentations(
        &self,
        content: &[u8],
        file_type: &FileType,
        preview_image_path: &str,
        preview_file_available: bool,
    ) -> Result<(), AppError> {
        let image_name = self.alternate_file_name(preview_image_path, "image");
        let watermarked_name = self.alternate_file_name(preview_image_path, "imagew");

        let raw_copy = async {
            self.files
                .write(&image_name, content)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))
        };
        let watermarked_copy =
            self.create_presentation(&watermarked_name, true, None, content, file_type);
        let preview_copy = async {
            if !preview_file_available {
                let full_name = self.alternate_file_name(preview_image_path, "preview");
                self.create_presentation(&full_name, true, None, content, file_type)
                    .await?;
            }
            Ok::<(), AppError>(())
        };

        tokio::try_join!(raw_copy, watermarked_copy, preview_copy)?;
        Ok(())
    }
}
