use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Challenge the submission was made to. The category gates gallery
/// extraction and the Wireframes exclusion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Challenge {
    pub challenge_id: i64,
    pub challenge_category_id: i64,
}

/// Author of the submission. Handle and user ID together determine the
/// on-disk storage directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submitter {
    pub user_id: i64,
    pub handle: String,
}

/// A generated presentation linked to a submission, ordered by
/// `sort_index` (the source image's position within the submission).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionImage {
    pub image_id: i64,
    pub sort_index: u32,
}

/// A design submission. `images` is appended to while presentations are
/// generated and flushed to the metadata store once, after all generation
/// for the submission has succeeded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submission {
    pub submission_id: i64,
    #[serde(default)]
    pub images: Vec<SubmissionImage>,
}

impl Submission {
    pub fn new(submission_id: i64) -> Self {
        Self {
            submission_id,
            images: Vec::new(),
        }
    }
}

/// The uploaded submission archive on disk. Read-only input.
#[derive(Clone, Debug)]
pub struct SubmissionFile {
    /// Original file name as uploaded (drives parser resolution).
    pub name: String,
    /// Location of the uploaded file on disk.
    pub path: PathBuf,
}

/// Metadata of one generated presentation, persisted as an image row in the
/// metadata store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    pub image_id: i64,
    pub image_type_id: i64,
    pub path_id: i64,
    pub width: u32,
    pub height: u32,
    pub original_file_name: String,
    pub file_name: String,
}
