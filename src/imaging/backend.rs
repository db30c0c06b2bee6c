//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: decode a source file, and compose one output image from a decoded
//! source.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use a recording mock so rendering logic can be checked
//! without encoding PNGs.

use super::params::ComposeParams;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can serve a parallel render batch.
pub trait ImageBackend: Sync {
    /// Decode a source image into memory.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Resize `source` to the params' square, paste it onto a filled canvas
    /// and write the result.
    fn compose(&self, source: &DynamicImage, params: &ComposeParams) -> Result<(), BackendError>;
}
