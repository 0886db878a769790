//! Studio Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! constants shared across all studio submission-pipeline components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, SubmissionConfig, WatermarkConfig};
pub use error::AppError;
pub use models::{
    Challenge, FileType, ImageRecord, Submission, SubmissionFile, SubmissionImage, Submitter,
};
