//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`optimize`](crate::optimize) stage (which decides
//! which derivatives to create) and the [`backend`](super::backend) (which
//! does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing batch logic.

use crate::naming::SourceFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Parameters for one scaled WebP derivative.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Target width from the breakpoint ladder.
    pub width: u32,
    /// Aspect-preserving height for that width.
    pub height: u32,
    pub quality: Quality,
}

/// Parameters for the same-format optimized fallback (no resize).
#[derive(Debug, Clone, PartialEq)]
pub struct ReencodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: SourceFormat,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_80() {
        assert_eq!(Quality::default().value(), 80);
    }
}
