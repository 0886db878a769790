//! Filesystem layout and local storage for generated submission files.
//!
//! Generated presentations live under
//! `{base}/{challenge_id}/{handle}_{user_id}/`; this crate owns that path
//! scheme and the file writes into it.

pub mod local;
pub mod paths;

pub use local::{StorageError, StorageResult, SubmissionStore};
pub use paths::{alternate_file_name, extension_of, file_name, submission_root};
