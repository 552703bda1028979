//! Pipeline configuration.
//!
//! Behavior is fully determined by a small set of constants — source
//! directories, output directory, the breakpoint ladder, and per-format
//! quality. All of them have stock defaults; an optional `respimg.toml`
//! overrides just the values it names.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! sources = ["assets", "public"]     # Directories scanned for source images
//! output_dir = "public/optimized"    # Where derivatives and the manifest land
//! url_prefix = "/optimized"          # URL prefix used in the manifest
//! sizes = [320, 640, 768, 1024, 1280, 1536, 1920]  # Breakpoint ladder
//!
//! [quality]
//! webp = 80                          # Scaled WebP derivatives
//! jpeg = 85                          # Re-encoded JPEG fallback
//! png = 90                           # Re-encoded PNG fallback
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The stock breakpoint ladder, in ascending logical pixels.
///
/// Shared by the optimizer (derivative widths) and the renderer (srcset
/// candidate widths) so the two sides agree without reading the manifest.
pub const DEFAULT_SIZES: &[u32] = &[320, 640, 768, 1024, 1280, 1536, 1920];

/// Pipeline configuration loaded from `respimg.toml`.
///
/// All fields have stock defaults. Config files are sparse — override just
/// the values you want. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directories scanned (top level only) for jpg/jpeg/png sources.
    /// Missing directories are skipped with a note, not an error.
    pub sources: Vec<PathBuf>,
    /// Output directory for derivatives and `manifest.json`.
    /// Created idempotently at the start of a run.
    pub output_dir: PathBuf,
    /// URL prefix under which the output directory is served.
    pub url_prefix: String,
    /// Breakpoint ladder: target widths for scaled derivatives.
    pub sizes: Vec<u32>,
    /// Per-format encoding quality.
    pub quality: QualityConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: vec![PathBuf::from("assets"), PathBuf::from("public")],
            output_dir: PathBuf::from("public/optimized"),
            url_prefix: "/optimized".to_string(),
            sizes: DEFAULT_SIZES.to_vec(),
            quality: QualityConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Validation(
                "sources must name at least one directory".into(),
            ));
        }
        if self.sizes.is_empty() {
            return Err(ConfigError::Validation("sizes must not be empty".into()));
        }
        if !self.sizes.is_sorted() || self.sizes.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::Validation(
                "sizes must be strictly ascending".into(),
            ));
        }
        for (name, q) in [
            ("webp", self.quality.webp),
            ("jpeg", self.quality.jpeg),
            ("png", self.quality.png),
        ] {
            if q == 0 || q > 100 {
                return Err(ConfigError::Validation(format!(
                    "quality.{name} must be 1-100"
                )));
            }
        }
        Ok(())
    }
}

/// Per-format encoding quality (1-100).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    pub webp: u32,
    pub jpeg: u32,
    pub png: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            webp: 80,
            jpeg: 85,
            png: 90,
        }
    }
}

/// Load configuration.
///
/// - `Some(path)` — read that file; missing file is an error.
/// - `None` — read `respimg.toml` from the working directory if present,
///   otherwise return stock defaults.
///
/// The result is validated before being returned.
pub fn load(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let config = match path {
        Some(p) => parse(&fs::read_to_string(p)?)?,
        None => {
            let default_path = Path::new("respimg.toml");
            if default_path.exists() {
                parse(&fs::read_to_string(default_path)?)?
            } else {
                PipelineConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

fn parse(content: &str) -> Result<PipelineConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// A fully documented `respimg.toml` with every option at its stock value.
pub fn stock_config_toml() -> String {
    r#"# respimg configuration
# All options are optional - the values below are the defaults.

# Directories scanned (top level only) for jpg/jpeg/png source images.
sources = ["assets", "public"]

# Where derivatives and manifest.json are written.
output_dir = "public/optimized"

# URL prefix under which the output directory is served.
url_prefix = "/optimized"

# Breakpoint ladder: one scaled WebP derivative is produced per width
# that does not exceed the source image's intrinsic width.
sizes = [320, 640, 768, 1024, 1280, 1536, 1920]

[quality]
webp = 80   # Scaled WebP derivatives
jpeg = 85   # Re-encoded JPEG fallback
png = 90    # Re-encoded PNG fallback
"#
    .to_string()
}
