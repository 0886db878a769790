//! Transform engine: decode, resize, watermark, persist.
//!
//! Every encode goes through a temporary file in the destination directory
//! that is persisted into place on success; the temp file is removed on
//! every other exit path when its scope ends.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use studio_core::{AppError, FileType, WatermarkConfig};
use tempfile::NamedTempFile;

use super::resize::ImageResize;
use super::watermark::Watermark;

/// Image formats supported by the overlay/resize pipeline.
fn format_for_extension(extension: &str) -> Option<ImageFormat> {
    match extension.to_ascii_lowercase().as_str() {
        "bmp" => Some(ImageFormat::Bmp),
        "jpg" => Some(ImageFormat::Jpeg),
        "pnm" => Some(ImageFormat::Pnm),
        "gif" => Some(ImageFormat::Gif),
        "png" => Some(ImageFormat::Png),
        "tiff" => Some(ImageFormat::Tiff),
        _ => None,
    }
}

/// Engine for materializing derived presentation images.
#[derive(Clone)]
pub struct TransformEngine {
    watermark: WatermarkConfig,
}

impl TransformEngine {
    pub fn new(watermark: WatermarkConfig) -> Self {
        Self { watermark }
    }

    /// File extension (without dot) of watermarked output files.
    pub fn watermark_extension(&self) -> String {
        self.watermark.extension()
    }

    /// Codec format for a registered image file type, or an input error for
    /// types the overlay pipeline does not support.
    pub fn format_for(file_type: &FileType) -> Result<ImageFormat, AppError> {
        format_for_extension(&file_type.extension).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "The image file type [{}] is not supported by the image overlay engine",
                file_type.extension
            ))
        })
    }

    /// Decode `content` as `format`.
    pub fn decode(format: ImageFormat, content: &[u8]) -> Result<DynamicImage, AppError> {
        image::load_from_memory_with_format(content, format)
            .map_err(|e| AppError::ImageProcessing(format!("Failed to decode image: {}", e)))
    }

    /// Decode `content` and scale it down to the given maximum dimensions,
    /// preserving the aspect ratio. `None` keeps the original size along
    /// that axis.
    pub fn resize_if_necessary(
        &self,
        max_width: Option<u32>,
        max_height: Option<u32>,
        format: ImageFormat,
        content: &[u8],
    ) -> Result<DynamicImage, AppError> {
        let img = Self::decode(format, content)?;
        let (width, height) = (img.width(), img.height());
        let resized = ImageResize::resize_if_necessary(img, max_width, max_height);
        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = resized.width(),
            to_height = resized.height(),
            "Resized image"
        );
        Ok(resized)
    }

    /// Watermark `target` with the configured overlay and persist the result
    /// in the watermark format. The output keeps the basename of `dest` with
    /// the extension swapped to the watermark format.
    pub async fn watermark(
        &self,
        target: &DynamicImage,
        dest: &Path,
    ) -> Result<DynamicImage, AppError> {
        let overlay_data = tokio::fs::read(&self.watermark.file_path)
            .await
            .map_err(|e| {
                AppError::ImageProcessing(format!(
                    "Failed to load watermark overlay {}: {}",
                    self.watermark.file_path.display(),
                    e
                ))
            })?;

        let watermarked = Watermark::apply(target, &overlay_data, &self.watermark)
            .map_err(|e| AppError::ImageProcessing(format!("Failed to watermark image: {}", e)))?;

        let extension = self.watermark_extension();
        let format = format_for_extension(&extension).ok_or_else(|| {
            AppError::ImageProcessing(format!(
                "The watermark file type [{}] is not supported by the image overlay engine",
                self.watermark.file_type
            ))
        })?;
        self.store(&watermarked, format, &dest.with_extension(extension))?;

        Ok(watermarked)
    }

    /// Encode `img` as `format` at `dest` via a scoped temp file.
    pub fn store(
        &self,
        img: &DynamicImage,
        format: ImageFormat,
        dest: &Path,
    ) -> Result<(), AppError> {
        let dir = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // JPEG carries no alpha channel
        let encodable = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            _ => img.clone(),
        };

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| {
            AppError::Storage(format!(
                "Failed to create temp file in {}: {}",
                dir.display(),
                e
            ))
        })?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            encodable.write_to(&mut writer, format).map_err(|e| {
                AppError::ImageProcessing(format!("Failed to encode image: {}", e))
            })?;
            writer.flush().map_err(|e| {
                AppError::Storage(format!("Failed to flush image {}: {}", dest.display(), e))
            })?;
        }
        tmp.persist(dest).map_err(|e| {
            AppError::Storage(format!("Failed to persist image {}: {}", dest.display(), e))
        })?;

        tracing::debug!(path = %dest.display(), "Stored generated image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode_png, test_watermark_config};
    use studio_core::FileType;
    use tempfile::tempdir;

    #[test]
    fn test_format_for_supported_types() {
        for (extension, format) in [
            ("bmp", ImageFormat::Bmp),
            ("JPG", ImageFormat::Jpeg),
            ("png", ImageFormat::Png),
            ("TIFF", ImageFormat::Tiff),
        ] {
            let file_type = FileType {
                file_type_id: 1,
                extension: extension.to_string(),
                image_file: true,
                bundled_file: false,
            };
            assert_eq!(TransformEngine::format_for(&file_type).unwrap(), format);
        }
    }

    #[test]
    fn test_format_for_unsupported_type() {
        let file_type = FileType {
            file_type_id: 1,
            extension: "webp".to_string(),
            image_file: true,
            bundled_file: false,
        };
        let result = TransformEngine::format_for(&file_type);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = TransformEngine::decode(ImageFormat::Png, b"not a png");
        assert!(matches!(result, Err(AppError::ImageProcessing(_))));
    }

    #[test]
    fn test_resize_if_necessary_from_encoded_content() {
        let dir = tempdir().unwrap();
        let engine = TransformEngine::new(test_watermark_config(dir.path()));
        let content = encode_png(1000, 500);

        let resized = engine
            .resize_if_necessary(Some(300), Some(300), ImageFormat::Png, &content)
            .unwrap();
        assert_eq!((resized.width(), resized.height()), (300, 150));

        let unchanged = engine
            .resize_if_necessary(None, None, ImageFormat::Png, &content)
            .unwrap();
        assert_eq!((unchanged.width(), unchanged.height()), (1000, 500));
    }

    #[test]
    fn test_store_persists_and_cleans_temp_files() {
        let dir = tempdir().unwrap();
        let engine = TransformEngine::new(test_watermark_config(dir.path()));
        let img = TransformEngine::decode(ImageFormat::Png, &encode_png(40, 30)).unwrap();

        let dest = dir.path().join("out.png");
        engine.store(&img, ImageFormat::Png, &dest).unwrap();
        assert!(dest.is_file());

        // Only the watermark fixture and the stored image remain
        let remaining: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn test_watermark_swaps_extension_and_writes_file() {
        let dir = tempdir().unwrap();
        let engine = TransformEngine::new(test_watermark_config(dir.path()));
        let img = TransformEngine::decode(ImageFormat::Png, &encode_png(200, 100)).unwrap();

        let dest = dir.path().join("20001_imagew.jpg");
        let watermarked = engine.watermark(&img, &dest).await.unwrap();
        assert_eq!((watermarked.width(), watermarked.height()), (200, 100));

        assert!(!dest.exists());
        assert!(dir.path().join("20001_imagew.png").is_file());
    }

    #[tokio::test]
    async fn test_watermark_missing_overlay_fails() {
        let dir = tempdir().unwrap();
        let mut config = test_watermark_config(dir.path());
        config.file_path = dir.path().join("missing-overlay.png");
        let engine = TransformEngine::new(config);
        let img = TransformEngine::decode(ImageFormat::Png, &encode_png(20, 20)).unwrap();

        let result = engine.watermark(&img, &dir.path().join("out.png")).await;
        assert!(matches!(result, Err(AppError::ImageProcessing(_))));
    }
}
