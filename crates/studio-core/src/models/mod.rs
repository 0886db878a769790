//! Domain models for the design-submission pipeline.

mod file_type;
mod submission;

pub use file_type::FileType;
pub use submission::{
    Challenge, ImageRecord, Submission, SubmissionFile, SubmissionImage, Submitter,
};
