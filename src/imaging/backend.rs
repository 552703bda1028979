//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend
//! must support: identify, scale, and reencode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust plus
//! libwebp, statically linked into the binary.

use super::params::{ReencodeParams, ScaleParams};
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
/// Every backend must implement all three operations so the batch stage is
/// backend-agnostic and testable with a mock.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize to the target dimensions and encode as lossy WebP.
    fn scale(&self, params: &ScaleParams) -> Result<(), BackendError>;

    /// Re-encode at original dimensions in the source's own format.
    fn reencode(&self, params: &ReencodeParams) -> Result<(), BackendError>;
}
