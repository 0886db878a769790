//! Single-pass classification of submission bundle entries.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use studio_core::FileType;

use super::BundleError;
use crate::resolver::FileTypeResolver;

/// Result of analyzing a submission bundle.
///
/// Fully populated by a single [`ZipBundleAnalyzer::analyze`] pass, or in its
/// initial all-false state; never partially valid. Content accessors return
/// an error when called for data the analyzed bundle did not provide.
#[derive(Debug)]
pub struct BundleAnalysis {
    native_submission_provided: bool,
    preview_image_provided: bool,
    preview_file_provided: bool,
    preview_image_path: Option<String>,
    preview_file_path: Option<String>,
    preview_image_content: Option<Vec<u8>>,
    preview_file_content: Option<Vec<u8>>,
    preview_image_file_type: Option<FileType>,
    empty: bool,
}

impl BundleAnalysis {
    fn new() -> Self {
        Self {
            native_submission_provided: false,
            preview_image_provided: false,
            preview_file_provided: false,
            preview_image_path: None,
            preview_file_path: None,
            preview_image_content: None,
            preview_file_content: None,
            preview_image_file_type: None,
            empty: true,
        }
    }

    fn complete(&self) -> bool {
        self.native_submission_provided && self.preview_image_provided && self.preview_file_provided
    }

    /// Whether a non-empty native-source entry was found.
    pub fn is_native_submission_available(&self) -> bool {
        self.native_submission_provided
    }

    /// Whether a preview image entry was found.
    pub fn is_preview_image_available(&self) -> bool {
        self.preview_image_provided
    }

    /// Whether a preview file entry was found.
    pub fn is_preview_file_available(&self) -> bool {
        self.preview_file_provided
    }

    /// Whether the analyzed archive contained no entries at all.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Entry name of the preview image within the bundle.
    pub fn preview_image_path(&self) -> Result<&str, BundleError> {
        self.preview_image_path
            .as_deref()
            .ok_or(BundleError::PreviewImageUnavailable)
    }

    /// File type of the preview image.
    pub fn preview_image_file_type(&self) -> Result<&FileType, BundleError> {
        self.preview_image_file_type
            .as_ref()
            .ok_or(BundleError::PreviewImageUnavailable)
    }

    /// Decompressed content of the preview image. Only present when the
    /// analysis ran with `retrieve_files`.
    pub fn preview_image_content(&self) -> Result<&[u8], BundleError> {
        self.preview_image_content
            .as_deref()
            .ok_or(BundleError::PreviewImageUnavailable)
    }

    /// Entry name of the preview file within the bundle.
    pub fn preview_file_path(&self) -> Result<&str, BundleError> {
        self.preview_file_path
            .as_deref()
            .ok_or(BundleError::PreviewFileUnavailable)
    }

    /// Decompressed content of the preview file. Only present when the
    /// analysis ran with `retrieve_files`.
    pub fn preview_file_content(&self) -> Result<&[u8], BundleError> {
        self.preview_file_content
            .as_deref()
            .ok_or(BundleError::PreviewFileUnavailable)
    }
}

/// Analyzer for bundled submission files in ZIP format (covers both the ZIP
/// and JAR archive types of the reference table).
pub struct ZipBundleAnalyzer {
    resolver: FileTypeResolver,
    source_prefix: String,
    submission_prefix: String,
}

impl ZipBundleAnalyzer {
    pub fn new(
        resolver: FileTypeResolver,
        source_prefix: impl Into<String>,
        submission_prefix: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            source_prefix: source_prefix.into(),
            submission_prefix: submission_prefix.into(),
        }
    }

    /// Scan the archive at `path` and classify its entries.
    ///
    /// Entries are visited in listing order; directories are skipped and
    /// names are matched lower-cased. The scan stops early once a native
    /// source, a preview image, and a preview file have all been found. With
    /// `retrieve_files` the preview image/file contents are decompressed and
    /// kept on the result.
    pub fn analyze(&self, path: &Path, retrieve_files: bool) -> Result<BundleAnalysis, BundleError> {
        let file = File::open(path).map_err(|e| BundleError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| BundleError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut analysis = BundleAnalysis::new();

        for index in 0..archive.len() {
            if analysis.complete() {
                break;
            }
            analysis.empty = false;

            let mut entry = archive.by_index(index).map_err(|e| BundleError::Entry {
                name: format!("#{}", index),
                reason: e.to_string(),
            })?;
            tracing::debug!(
                entry = entry.name(),
                size = entry.size(),
                is_dir = entry.is_dir(),
                "Scanning bundle entry"
            );
            if entry.is_dir() {
                continue;
            }

            let entry_name = entry.name().to_string();
            let name_lower = entry_name.to_lowercase();

            if !analysis.native_submission_provided && name_lower.starts_with(&self.source_prefix) {
                if entry.size() > 0 {
                    analysis.native_submission_provided = true;
                } else {
                    // Some archives do not record entry sizes in their
                    // headers; decompressing tells whether the entry
                    // actually carries data.
                    let data = read_entry(&mut entry, &entry_name)?;
                    if !data.is_empty() {
                        analysis.native_submission_provided = true;
                    }
                }
            } else if name_lower.starts_with(&self.submission_prefix) {
                let Some(file_type) = self.resolver.resolve(&name_lower) else {
                    continue;
                };
                if !analysis.preview_image_provided && file_type.image_file {
                    analysis.preview_image_provided = true;
                    analysis.preview_image_path = Some(entry_name.clone());
                    analysis.preview_image_file_type = Some(file_type.clone());
                    if retrieve_files {
                        analysis.preview_image_content = Some(read_entry(&mut entry, &entry_name)?);
                    }
                } else if !analysis.preview_file_provided && file_type.bundled_file {
                    analysis.preview_file_provided = true;
                    analysis.preview_file_path = Some(entry_name.clone());
                    if retrieve_files {
                        analysis.preview_file_content = Some(read_entry(&mut entry, &entry_name)?);
                    }
                }
            }
        }

        Ok(analysis)
    }

    /// Decompress every non-directory entry of an in-memory archive buffer,
    /// in listing order. Used to extract gallery images from a nested
    /// preview-file bundle.
    pub fn files(&self, content: &[u8]) -> Result<Vec<(String, Vec<u8>)>, BundleError> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(content)).map_err(|e| BundleError::Open {
                path: "<in-memory bundle>".to_string(),
                reason: e.to_string(),
            })?;

        let mut files = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| BundleError::Entry {
                name: format!("#{}", index),
                reason: e.to_string(),
            })?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let data = read_entry(&mut entry, &name)?;
            files.push((name, data));
        }
        Ok(files)
    }
}

fn read_entry(entry: &mut zip::read::ZipFile<'_>, name: &str) -> Result<Vec<u8>, BundleError> {
    let mut data = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut data)
        .map_err(|e| BundleError::Entry {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_file_types, write_zip};
    use tempfile::tempdir;

    fn analyzer() -> ZipBundleAnalyzer {
        ZipBundleAnalyzer::new(
            FileTypeResolver::new(test_file_types()),
            "source/",
            "submission/",
        )
    }

    #[test]
    fn test_analyze_full_bundle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        write_zip(
            &path,
            &[
                ("source/design.psd", b"native sources".as_slice()),
                ("submission/preview.jpg", b"jpeg bytes"),
                ("submission/gallery.zip", b"nested zip"),
            ],
        );

        let analysis = analyzer().analyze(&path, true).unwrap();
        assert!(analysis.is_native_submission_available());
        assert!(analysis.is_preview_image_available());
        assert!(analysis.is_preview_file_available());
        assert!(!analysis.is_empty());
        assert_eq!(
            analysis.preview_image_path().unwrap(),
            "submission/preview.jpg"
        );
        assert_eq!(analysis.preview_image_content().unwrap(), b"jpeg bytes");
        assert_eq!(
            analysis.preview_file_path().unwrap(),
            "submission/gallery.zip"
        );
        assert!(analysis.preview_image_file_type().unwrap().image_file);
    }

    #[test]
    fn test_analyze_without_retrieval_keeps_paths_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        write_zip(&path, &[("submission/preview.jpg", b"jpeg bytes")]);

        let analysis = analyzer().analyze(&path, false).unwrap();
        assert!(analysis.is_preview_image_available());
        assert!(analysis.preview_image_path().is_ok());
        assert!(matches!(
            analysis.preview_image_content(),
            Err(BundleError::PreviewImageUnavailable)
        ));
    }

    #[test]
    fn test_analyze_empty_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.zip");
        write_zip(&path, &[]);

        let analysis = analyzer().analyze(&path, true).unwrap();
        assert!(analysis.is_empty());
        assert!(!analysis.is_native_submission_available());
        assert!(!analysis.is_preview_image_available());
        assert!(!analysis.is_preview_file_available());
    }

    #[test]
    fn test_analyze_ignores_directories_and_unknown_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        write_zip(
            &path,
            &[
                ("submission/", b"".as_slice()),
                ("submission/readme.unknownext", b"text"),
                ("other/file.jpg", b"outside the submission prefix"),
            ],
        );

        let analysis = analyzer().analyze(&path, true).unwrap();
        assert!(!analysis.is_empty());
        assert!(!analysis.is_preview_image_available());
        assert!(!analysis.is_preview_file_available());
    }

    #[test]
    fn test_analyze_empty_source_entry_not_native() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        write_zip(&path, &[("source/empty.psd", b"".as_slice())]);

        let analysis = analyzer().analyze(&path, true).unwrap();
        assert!(!analysis.is_native_submission_available());
        assert!(!analysis.is_empty());
    }

    #[test]
    fn test_analyze_first_match_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        write_zip(
            &path,
            &[
                ("submission/first.jpg", b"first".as_slice()),
                ("submission/second.png", b"second"),
            ],
        );

        let analysis = analyzer().analyze(&path, true).unwrap();
        assert_eq!(
            analysis.preview_image_path().unwrap(),
            "submission/first.jpg"
        );
        assert_eq!(analysis.preview_image_content().unwrap(), b"first");
    }

    #[test]
    fn test_analyze_entry_names_matched_case_insensitively() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("submission.zip");
        write_zip(&path, &[("Submission/Preview.JPG", b"jpeg".as_slice())]);

        let analysis = analyzer().analyze(&path, true).unwrap();
        assert!(analysis.is_preview_image_available());
        // The recorded path preserves the original casing
        assert_eq!(
            analysis.preview_image_path().unwrap(),
            "Submission/Preview.JPG"
        );
    }

    #[test]
    fn test_analyze_rejects_non_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not-a-zip.zip");
        std::fs::write(&path, b"plain text, not an archive").unwrap();

        let result = analyzer().analyze(&path, true);
        assert!(matches!(result, Err(BundleError::Open { .. })));
    }

    #[test]
    fn test_files_lists_non_directory_entries_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested.zip");
        write_zip(
            &path,
            &[
                ("one.png", b"1".as_slice()),
                ("sub/", b""),
                ("sub/two.png", b"2"),
            ],
        );
        let content = std::fs::read(&path).unwrap();

        let files = analyzer().files(&content).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], ("one.png".to_string(), b"1".to_vec()));
        assert_eq!(files[1], ("sub/two.png".to_string(), b"2".to_vec()));
    }
}
