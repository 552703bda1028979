//! Centralized derivative filename convention.
//!
//! The naming scheme is the stable contract between the optimizer, the
//! manifest, and the renderer — candidate URLs are derivable from a base
//! name alone, without reading the manifest:
//!
//! - Scaled:   `{base}-{width}w.webp` (e.g. `room-640w.webp`)
//! - Fallback: `{base}-optimized.{ext}` (e.g. `room-optimized.png`)
//!
//! This module owns both directions: building output filenames during a
//! batch run, and classifying files found in the output directory back into
//! derivatives (used by the rescan consistency check).

use std::path::Path;

/// Source formats that qualify for optimization.
///
/// Anything outside this set is skipped entirely — no scaled derivatives
/// and no fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Classify a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Filename stem used as the derivative key (`photos/room.png` → `room`).
pub fn base_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

/// Lowercased source extension, kept verbatim in the fallback filename
/// (`photo.JPEG` → `jpeg`, not normalized to `jpg`).
pub fn source_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Output filename for a scaled WebP derivative.
pub fn scaled_filename(base: &str, width: u32) -> String {
    format!("{base}-{width}w.webp")
}

/// Output filename for the same-format optimized fallback.
pub fn fallback_filename(base: &str, ext: &str) -> String {
    format!("{base}-optimized.{ext}")
}

/// URL for a derivative as it appears in the manifest and in markup.
pub fn derivative_url(prefix: &str, filename: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), filename)
}

/// A derivative recovered from an output filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivative {
    Scaled { base: String, width: u32 },
    Fallback { base: String, ext: String },
}

/// Classify an output-directory filename by suffix pattern.
///
/// `room-640w.webp` → `Scaled { base: "room", width: 640 }`
/// `room-optimized.png` → `Fallback { base: "room", ext: "png" }`
/// Anything else (including `manifest.json`) → `None`.
pub fn parse_derivative(filename: &str) -> Option<Derivative> {
    if let Some(stem) = filename.strip_suffix(".webp") {
        let (base, tail) = stem.rsplit_once('-')?;
        let digits = tail.strip_suffix('w')?;
        if base.is_empty() || digits.is_empty() {
            return None;
        }
        let width = digits.parse::<u32>().ok()?;
        return Some(Derivative::Scaled {
            base: base.to_string(),
            width,
        });
    }

    let path = Path::new(filename);
    let ext = source_extension(path)?;
    SourceFormat::from_extension(&ext)?;
    let stem = path.file_stem()?.to_str()?;
    let base = stem.strip_suffix("-optimized")?;
    if base.is_empty() {
        return None;
    }
    Some(Derivative::Fallback {
        base: base.to_string(),
        ext,
    })
}
