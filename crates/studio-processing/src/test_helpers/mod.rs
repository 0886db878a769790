//! Test helpers: an in-memory metadata store and fixture builders.
//!
//! These allow testing the pipeline without database dependencies; archive
//! fixtures are written with the zip crate and image fixtures encoded in
//! memory.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use studio_core::{AppError, FileType, ImageRecord, SubmissionConfig, WatermarkConfig};
use studio_db::MetadataStore;

/// In-memory metadata store recording every insert.
pub struct MockMetadataStore {
    file_types: Vec<FileType>,
    sequences: Mutex<HashMap<String, i64>>,
    paths: Mutex<Vec<(i64, String)>>,
    images: Mutex<Vec<ImageRecord>>,
    submission_images: Mutex<Vec<(i64, i64, u32)>>,
}

impl MockMetadataStore {
    pub fn new() -> Self {
        Self::with_file_types(test_file_types())
    }

    pub fn with_file_types(file_types: Vec<FileType>) -> Self {
        Self {
            file_types,
            sequences: Mutex::new(HashMap::new()),
            paths: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
            submission_images: Mutex::new(Vec::new()),
        }
    }

    pub fn inserted_paths(&self) -> Vec<(i64, String)> {
        self.paths.lock().unwrap().clone()
    }

    pub fn inserted_images(&self) -> Vec<ImageRecord> {
        self.images.lock().unwrap().clone()
    }

    pub fn inserted_submission_images(&self) -> Vec<(i64, i64, u32)> {
        self.submission_images.lock().unwrap().clone()
    }
}

impl Default for MockMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for MockMetadataStore {
    async fn file_types(&self) -> Result<Vec<FileType>, AppError> {
        Ok(self.file_types.clone())
    }

    async fn next_sequence_value(&self, sequence: &str) -> Result<i64, AppError> {
        let mut sequences = self.sequences.lock().unwrap();
        let value = sequences.entry(sequence.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn insert_path(&self, path_id: i64, path: &str) -> Result<u64, AppError> {
        self.paths.lock().unwrap().push((path_id, path.to_string()));
        Ok(1)
    }

    async fn insert_image(&self, image: &ImageRecord) -> Result<u64, AppError> {
        self.images.lock().unwrap().push(image.clone());
        Ok(1)
    }

    async fn insert_submission_image(
        &self,
        submission_id: i64,
        image_id: i64,
        sort_index: u32,
    ) -> Result<u64, AppError> {
        self.submission_images
            .lock()
            .unwrap()
            .push((submission_id, image_id, sort_index));
        Ok(1)
    }
}

/// Reference table used by the tests: image types, archive types (ZIP/JAR
/// plus a bundled type without a parser), and a plain document type.
pub fn test_file_types() -> Vec<FileType> {
    fn entry(file_type_id: i64, extension: &str, image_file: bool, bundled_file: bool) -> FileType {
        FileType {
            file_type_id,
            extension: extension.to_string(),
            image_file,
            bundled_file,
        }
    }
    vec![
        entry(1, "jpg", true, false),
        entry(2, "png", true, false),
        entry(3, "gif", true, false),
        entry(9, "txt", false, false),
        entry(13, "rar", false, true),
        entry(14, "zip", false, true),
        entry(16, "jar", false, true),
    ]
}

/// Submission layout used by the tests.
pub fn test_submission_config() -> SubmissionConfig {
    SubmissionConfig {
        base_path: PathBuf::from("design_submissions"),
        source_prefix: "source/".to_string(),
        submission_prefix: "submission/".to_string(),
        gallery_category_ids: vec![16, 17, 18, 20, 21, 22, 23, 30, 32],
    }
}

/// Watermark settings pointing at a small PNG overlay written into `dir`.
pub fn test_watermark_config(dir: &Path) -> WatermarkConfig {
    let overlay_path = dir.join("studio_logo_watermark.png");
    let overlay = RgbaImage::from_pixel(40, 20, Rgba([0, 0, 0, 255]));
    let mut buffer = Vec::new();
    overlay
        .write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .unwrap();
    std::fs::write(&overlay_path, buffer).unwrap();

    WatermarkConfig {
        file_path: overlay_path,
        file_type: "PNG".to_string(),
        base_image_transparency: 50,
        overlay_image_transparency: 100,
        overlay_image_red: 0,
        overlay_image_green: 0,
        overlay_image_blue: 0,
    }
}

/// Write a ZIP archive at `path`. Entry names ending in `/` become
/// directories.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    std::fs::write(path, zip_buffer(entries)).unwrap();
}

/// ZIP archive as an in-memory buffer. Entry names ending in `/` become
/// directories.
pub fn zip_buffer(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
        }
        zip.finish().unwrap();
    }
    buffer
}

/// Solid-color PNG of the given dimensions.
pub fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 60, 60, 255]));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Png,
    )
    .unwrap();
    buffer
}
