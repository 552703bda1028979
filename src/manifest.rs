//! The run summary written next to the derivatives.
//!
//! A single `manifest.json` per optimizer run:
//!
//! ```json
//! {
//!   "images": {
//!     "room": {
//!       "webp": [
//!         { "size": 320, "url": "/optimized/room-320w.webp" },
//!         { "size": 640, "url": "/optimized/room-640w.webp" }
//!       ],
//!       "fallback": "/optimized/room-optimized.png"
//!     }
//!   },
//!   "lastUpdated": "2026-08-27T10:00:00+00:00"
//! }
//! ```
//!
//! Invariants: `webp` entries ascend by size with no duplicate widths;
//! `fallback` is null only when no same-format optimized file was produced.
//!
//! The manifest is accumulated in memory while the batch runs — it reflects
//! what this run produced, not whatever happens to be on disk. Rebuilding
//! from a directory listing ([`Manifest::from_output_dir`]) exists as a
//! consistency check so strays from earlier runs can be reported instead of
//! silently resurfacing in the manifest.

use crate::naming::{self, Derivative};
use crate::optimize::ProcessedImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Manifest persistence failures are fatal to the run — the manifest is
/// the run's sole durable summary.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const MANIFEST_FILENAME: &str = "manifest.json";

/// One scaled candidate: intrinsic width + URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledRef {
    pub size: u32,
    pub url: String,
}

/// All derivatives recorded for one base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Scaled WebP candidates, ascending by size.
    pub webp: Vec<ScaledRef>,
    /// Same-format optimized fallback, absent for non-jpg/png inputs.
    pub fallback: Option<String>,
}

/// The aggregate run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub images: BTreeMap<String, ImageEntry>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl Manifest {
    /// Build from the images a batch run actually produced.
    pub fn from_processed(processed: &[ProcessedImage], url_prefix: &str) -> Self {
        let mut images = BTreeMap::new();
        for img in processed {
            let mut webp: Vec<ScaledRef> = img
                .scaled_widths
                .iter()
                .map(|&size| ScaledRef {
                    size,
                    url: naming::derivative_url(url_prefix, &naming::scaled_filename(&img.base, size)),
                })
                .collect();
            webp.sort_by_key(|r| r.size);
            webp.dedup_by_key(|r| r.size);

            let fallback = img
                .fallback_filename
                .as_ref()
                .map(|f| naming::derivative_url(url_prefix, f));

            images.insert(img.base.clone(), ImageEntry { webp, fallback });
        }
        Self {
            images,
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild the mapping from whatever derivative files are on disk.
    ///
    /// Used as a consistency check against the in-memory manifest, and by
    /// tests; classification follows the filename convention in
    /// [`naming::parse_derivative`].
    pub fn from_output_dir(output_dir: &Path, url_prefix: &str) -> Result<Self, ManifestError> {
        let mut images: BTreeMap<String, ImageEntry> = BTreeMap::new();

        for entry in walkdir::WalkDir::new(output_dir).max_depth(1) {
            let entry = entry.map_err(|e| {
                ManifestError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other("walkdir error without io cause")
                }))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().to_string();
            match naming::parse_derivative(&filename) {
                Some(Derivative::Scaled { base, width }) => {
                    let slot = images.entry(base).or_insert_with(ImageEntry::empty);
                    slot.webp.push(ScaledRef {
                        size: width,
                        url: naming::derivative_url(url_prefix, &filename),
                    });
                }
                Some(Derivative::Fallback { base, .. }) => {
                    let slot = images.entry(base).or_insert_with(ImageEntry::empty);
                    slot.fallback = Some(naming::derivative_url(url_prefix, &filename));
                }
                None => {}
            }
        }

        for entry in images.values_mut() {
            entry.webp.sort_by_key(|r| r.size);
            entry.webp.dedup_by_key(|r| r.size);
        }

        Ok(Self {
            images,
            last_updated: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Write `manifest.json` into the output directory as pretty JSON.
    pub fn write(&self, output_dir: &Path) -> Result<(), ManifestError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(MANIFEST_FILENAME), json)?;
        Ok(())
    }
}

impl ImageEntry {
    fn empty() -> Self {
        Self {
            webp: Vec::new(),
            fallback: None,
        }
    }
}
