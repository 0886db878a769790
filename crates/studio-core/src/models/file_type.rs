use serde::{Deserialize, Serialize};

/// A registered file type from the metadata-store reference table.
///
/// Validated once at the database boundary; `image_file` and `bundled_file`
/// drive dispatch when classifying archive entries (convert vs. recurse vs.
/// ignore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
    pub file_type_id: i64,
    /// File extension without the leading dot (stored lower- or upper-cased;
    /// all matching is case-insensitive).
    pub extension: String,
    pub image_file: bool,
    pub bundled_file: bool,
}

impl FileType {
    /// Case-insensitive extension match.
    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extension.eq_ignore_ascii_case(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_extension_case_insensitive() {
        let file_type = FileType {
            file_type_id: 5,
            extension: "JPG".to_string(),
            image_file: true,
            bundled_file: false,
        };
        assert!(file_type.matches_extension("jpg"));
        assert!(file_type.matches_extension("JPG"));
        assert!(!file_type.matches_extension("png"));
    }
}
