//! Configuration module
//!
//! This module provides the environment-driven configuration for the
//! submission pipeline: watermarking settings, the submission filesystem
//! layout, and the metadata-store connection.

use std::env;
use std::path::PathBuf;

// Watermark defaults
const WATERMARK_FILE_TYPE: &str = "PNG";
const BASE_IMAGE_TRANSPARENCY: u8 = 50;
const OVERLAY_IMAGE_TRANSPARENCY: u8 = 100;

// Submission layout defaults
const SOURCE_PREFIX: &str = "source/";
const SUBMISSION_PREFIX: &str = "submission/";
const GALLERY_CATEGORY_IDS: &str = "16,17,18,20,21,22,23,30,32";

/// Watermark overlay settings.
///
/// The overlay image is composited onto generated previews with the
/// configured color-key and opacity. `file_type` is the encode format of
/// watermarked output files ("PNG", "JPG", ...).
#[derive(Clone, Debug)]
pub struct WatermarkConfig {
    pub file_path: PathBuf,
    pub file_type: String,
    /// Overall opacity percent of the overlay over the base image.
    pub base_image_transparency: u8,
    /// Opacity percent applied to overlay pixels matching the color key.
    pub overlay_image_transparency: u8,
    pub overlay_image_red: u8,
    pub overlay_image_green: u8,
    pub overlay_image_blue: u8,
}

impl WatermarkConfig {
    /// File extension (lower-cased, without dot) of watermarked output files.
    pub fn extension(&self) -> String {
        self.file_type.to_lowercase()
    }
}

/// Submission storage layout and bundle classification settings.
#[derive(Clone, Debug)]
pub struct SubmissionConfig {
    /// Base directory for generated design-submission files.
    pub base_path: PathBuf,
    /// Archive entry prefix that marks native-source entries.
    pub source_prefix: String,
    /// Archive entry prefix that marks preview image/file entries.
    pub submission_prefix: String,
    /// Challenge categories whose submissions carry image galleries.
    pub gallery_category_ids: Vec<i64>,
}

impl SubmissionConfig {
    pub fn requires_gallery(&self, challenge_category_id: i64) -> bool {
        self.gallery_category_ids.contains(&challenge_category_id)
    }
}

/// Application configuration for the submission pipeline.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub watermark: WatermarkConfig,
    pub submissions: SubmissionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let gallery_category_ids = env::var("GALLERY_CATEGORY_IDS")
            .unwrap_or_else(|_| GALLERY_CATEGORY_IDS.to_string())
            .split(',')
            .map(|s| {
                s.trim()
                    .parse::<i64>()
                    .map_err(|_| anyhow::anyhow!("GALLERY_CATEGORY_IDS must be a list of numbers"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let watermark = WatermarkConfig {
            file_path: env::var("WATERMARK_FILE_PATH")
                .unwrap_or_else(|_| "resources/studio_logo_watermark.png".to_string())
                .into(),
            file_type: env::var("WATERMARK_FILE_TYPE")
                .unwrap_or_else(|_| WATERMARK_FILE_TYPE.to_string()),
            base_image_transparency: parse_percent(
                "WATERMARK_BASE_IMAGE_TRANSPARENCY",
                BASE_IMAGE_TRANSPARENCY,
            )?,
            overlay_image_transparency: parse_percent(
                "WATERMARK_OVERLAY_IMAGE_TRANSPARENCY",
                OVERLAY_IMAGE_TRANSPARENCY,
            )?,
            overlay_image_red: parse_u8("WATERMARK_OVERLAY_IMAGE_RED", 0)?,
            overlay_image_green: parse_u8("WATERMARK_OVERLAY_IMAGE_GREEN", 0)?,
            overlay_image_blue: parse_u8("WATERMARK_OVERLAY_IMAGE_BLUE", 0)?,
        };

        let submissions = SubmissionConfig {
            base_path: env::var("DESIGN_SUBMISSIONS_BASE_PATH")
                .unwrap_or_else(|_| "design_submissions".to_string())
                .into(),
            source_prefix: env::var("DESIGN_SUBMISSION_SOURCE_PREFIX")
                .unwrap_or_else(|_| SOURCE_PREFIX.to_string())
                .to_lowercase(),
            submission_prefix: env::var("DESIGN_SUBMISSION_SUBMISSION_PREFIX")
                .unwrap_or_else(|_| SUBMISSION_PREFIX.to_string())
                .to_lowercase(),
            gallery_category_ids,
        };

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/studio".to_string()),
            watermark,
            submissions,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.submissions.source_prefix.is_empty() {
            return Err(anyhow::anyhow!(
                "DESIGN_SUBMISSION_SOURCE_PREFIX cannot be empty"
            ));
        }
        if self.submissions.submission_prefix.is_empty() {
            return Err(anyhow::anyhow!(
                "DESIGN_SUBMISSION_SUBMISSION_PREFIX cannot be empty"
            ));
        }
        if self.watermark.file_type.trim().is_empty() {
            return Err(anyhow::anyhow!("WATERMARK_FILE_TYPE cannot be empty"));
        }
        Ok(())
    }
}

fn parse_u8(key: &str, default: u8) -> Result<u8, anyhow::Error> {
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<u8>()
            .map_err(|_| anyhow::anyhow!("{} must be a number in 0..=255", key)),
        Err(_) => Ok(default),
    }
}

fn parse_percent(key: &str, default: u8) -> Result<u8, anyhow::Error> {
    let value = parse_u8(key, default)?;
    if value > 100 {
        return Err(anyhow::anyhow!("{} must be a percentage in 0..=100", key));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_watermark() -> WatermarkConfig {
        WatermarkConfig {
            file_path: "watermark.png".into(),
            file_type: "PNG".to_string(),
            base_image_transparency: 50,
            overlay_image_transparency: 100,
            overlay_image_red: 0,
            overlay_image_green: 0,
            overlay_image_blue: 0,
        }
    }

    #[test]
    fn test_watermark_extension_lowercased() {
        assert_eq!(test_watermark().extension(), "png");
    }

    #[test]
    fn test_requires_gallery() {
        let submissions = SubmissionConfig {
            base_path: "subs".into(),
            source_prefix: "source/".to_string(),
            submission_prefix: "submission/".to_string(),
            gallery_category_ids: vec![16, 17, 18],
        };
        assert!(submissions.requires_gallery(17));
        assert!(!submissions.requires_gallery(19));
    }

    #[test]
    fn test_validate_rejects_empty_prefixes() {
        let config = Config {
            database_url: "postgres://localhost/studio".to_string(),
            watermark: test_watermark(),
            submissions: SubmissionConfig {
                base_path: "subs".into(),
                source_prefix: String::new(),
                submission_prefix: "submission/".to_string(),
                gallery_category_ids: vec![],
            },
        };
        assert!(config.validate().is_err());
    }
}
