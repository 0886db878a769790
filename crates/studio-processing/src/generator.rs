//! Top-level file generation for design submissions.
//!
//! Drives the whole pipeline for one submission: analyze the uploaded
//! bundle, generate the preview-image presentations, write the preview file
//! and extract its gallery images (when the challenge category carries a
//! gallery), and finally flush the submission-image linkage rows.

use std::sync::Arc;
use std::time::Instant;

use studio_core::{
    AppError, Challenge, Config, Submission, SubmissionConfig, SubmissionFile, Submitter,
};
use studio_db::MetadataStore;
use studio_storage::SubmissionStore;

use crate::image::TransformEngine;
use crate::presentation::{plain_gallery_specs, watermarked_gallery_specs, PresentationGenerator};
use crate::resolver::FileTypeResolver;
use crate::validator::SubmissionValidator;

/// Generates the files with alternate representations of a submission and
/// persists their metadata.
///
/// Stages run strictly in sequence and the first failure aborts the rest of
/// the run; files and rows created before the failure are left in place.
pub struct DesignFileGenerator {
    challenge: Challenge,
    submitter: Submitter,
    submission: Submission,
    submission_file: SubmissionFile,
    store: Arc<dyn MetadataStore>,
    files: SubmissionStore,
    validator: SubmissionValidator,
    presentations: PresentationGenerator,
    submissions: SubmissionConfig,
}

impl DesignFileGenerator {
    pub fn new(
        challenge: Challenge,
        submitter: Submitter,
        submission: Submission,
        submission_file: SubmissionFile,
        store: Arc<dyn MetadataStore>,
        config: &Config,
    ) -> Self {
        let files = SubmissionStore::new(&config.submissions.base_path);
        let validator = SubmissionValidator::new(store.clone(), &config.submissions);
        let presentations = PresentationGenerator::new(
            challenge.clone(),
            submitter.clone(),
            submission.submission_id,
            store.clone(),
            files.clone(),
            TransformEngine::new(config.watermark.clone()),
        );
        Self {
            challenge,
            submitter,
            submission,
            submission_file,
            store,
            files,
            validator,
            presentations,
            submissions: config.submissions.clone(),
        }
    }

    /// Analyze the submitted bundle and create the files with alternate
    /// representations of the submission. Returns the submission with the
    /// generated image links appended.
    pub async fn generate_files(mut self) -> Result<Submission, AppError> {
        let start = Instant::now();
        tracing::info!(
            challenge_id = self.challenge.challenge_id,
            submission_id = self.submission.submission_id,
            file = %self.submission_file.name,
            "Generating image files for submission"
        );

        self.files
            .ensure_submission_dir(
                self.challenge.challenge_id,
                self.submitter.user_id,
                &self.submitter.handle,
            )
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let parser = self
            .validator
            .bundled_file_parser(&self.submission_file.name)
            .await?;
        let analysis = parser.analyze(&self.submission_file.path, true)?;

        let mut file_index: u32 = 1;
        let mut submission_updated = false;

        // Preview image presentations
        if analysis.is_preview_image_available() {
            let image_path = analysis.preview_image_path()?.to_string();
            let file_type = analysis.preview_image_file_type()?.clone();
            let content = analysis.preview_image_content()?;

            self.presentations
                .generate_images(
                    &image_path,
                    content,
                    &file_type,
                    &plain_gallery_specs(),
                    false,
                    file_index,
                )
                .await?;
            self.presentations
                .generate_images(
                    &image_path,
                    content,
                    &file_type,
                    &watermarked_gallery_specs(),
                    true,
                    file_index,
                )
                .await?;
            self.presentations
                .generate_preview_image_presentations(
                    content,
                    &file_type,
                    &image_path,
                    analysis.is_preview_file_available(),
                )
                .await?;

            tracing::info!(file = %image_path, "Preview image presentations generated");
            file_index += 1;
            submission_updated = true;
        }

        // Preview file and its gallery images
        if analysis.is_preview_file_available() {
            let preview_path = analysis.preview_file_path()?.to_string();
            let preview_content = analysis.preview_file_content()?;

            let full_name = self
                .presentations
                .alternate_file_name(&preview_path, "preview");
            self.files
                .write(&full_name, preview_content)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;

            if self
                .submissions
                .requires_gallery(self.challenge.challenge_category_id)
            {
                let nested_parser = self.validator.bundled_file_parser(&preview_path).await?;
                let members = nested_parser.files(preview_content)?;
                let resolver = FileTypeResolver::load(self.store.as_ref()).await?;

                // One member at a time keeps file-index assignment
                // deterministic and bounds the transform engine's load
                for (member_name, member_content) in members {
                    let Some(file_type) = resolver.resolve(&member_name) else {
                        continue;
                    };
                    if !file_type.image_file {
                        continue;
                    }
                    let file_type = file_type.clone();

                    self.presentations
                        .generate_images(
                            &member_name,
                            &member_content,
                            &file_type,
                            &plain_gallery_specs(),
                            false,
                            file_index,
                        )
                        .await?;
                    self.presentations
                        .generate_images(
                            &member_name,
                            &member_content,
                            &file_type,
                            &watermarked_gallery_specs(),
                            true,
                            file_index,
                        )
                        .await?;
                    if file_index == 1 {
                        // No dedicated preview image existed, so the first
                        // gallery image doubles as the submission preview
                        self.presentations
                            .generate_preview_image_presentations(
                                &member_content,
                                &file_type,
                                &member_name,
                                analysis.is_preview_file_available(),
                            )
                            .await?;
                    }

                    file_index += 1;
                    submission_updated = true;
                }
            }
        }

        // Flush the accumulated submission-image links
        if submission_updated {
            for link in self.presentations.images() {
                self.store
                    .insert_submission_image(
                        self.submission.submission_id,
                        link.image_id,
                        link.sort_index,
                    )
                    .await?;
            }
            self.submission
                .images
                .extend_from_slice(self.presentations.images());
        }

        tracing::info!(
            submission_id = self.submission.submission_id,
            images = self.submission.images.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Generated image files for submission"
        );
        Ok(self.submission)
    }
}
