//! Image transformation for submission presentations
//!
//! This module wraps the image codec into the operations the presentation
//! generator needs:
//! - Aspect-ratio-preserving downscaling (resize)
//! - Overlay watermarking (watermark)
//! - Decode/resize/watermark/persist with scoped temp files (engine)

pub mod engine;
pub mod resize;
pub mod watermark;

pub use engine::TransformEngine;
pub use resize::ImageResize;
pub use watermark::Watermark;
