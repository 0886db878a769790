//! File-type resolution against the metadata-store reference table.

use studio_core::{AppError, FileType};
use studio_db::MetadataStore;

/// Resolves file names to registered file types.
///
/// The reference table is static for the duration of a pipeline run, so it
/// is fetched once and cached on the resolver.
#[derive(Clone, Debug)]
pub struct FileTypeResolver {
    file_types: Vec<FileType>,
}

impl FileTypeResolver {
    pub fn new(file_types: Vec<FileType>) -> Self {
        Self { file_types }
    }

    /// Fetch the reference table from the metadata store.
    pub async fn load(store: &dyn MetadataStore) -> Result<Self, AppError> {
        Ok(Self::new(store.file_types().await?))
    }

    /// Match the extension of `file_name` (the substring after the last dot,
    /// case-insensitive) against the reference table. Returns `None` for
    /// names without an extension or with an unregistered one.
    pub fn resolve(&self, file_name: &str) -> Option<&FileType> {
        let pos = file_name.rfind('.')?;
        if pos == 0 {
            return None;
        }
        let extension = &file_name[pos + 1..];
        self.file_types
            .iter()
            .find(|file_type| file_type.matches_extension(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_file_types;

    fn resolver() -> FileTypeResolver {
        FileTypeResolver::new(test_file_types())
    }

    #[test]
    fn test_resolve_image_type() {
        let resolver = resolver();
        let file_type = resolver.resolve("submission/preview.jpg").unwrap();
        assert!(file_type.image_file);
        assert!(!file_type.bundled_file);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve("PREVIEW.JPG").map(|t| t.file_type_id),
            resolver.resolve("preview.jpg").map(|t| t.file_type_id),
        );
    }

    #[test]
    fn test_resolve_unknown_extension() {
        assert!(resolver().resolve("notes.unknownext").is_none());
    }

    #[test]
    fn test_resolve_no_extension() {
        let resolver = resolver();
        assert!(resolver.resolve("README").is_none());
        assert!(resolver.resolve(".jpg").is_none());
    }
}
