//! Batch image optimization.
//!
//! The build-time half of the pipeline. Scans the configured source
//! directories for raster images and produces, per source image:
//!
//! - one scaled WebP derivative per breakpoint-ladder width that does not
//!   exceed the source's intrinsic width (never upscaled), and
//! - exactly one same-format optimized fallback (`{base}-optimized.{ext}`).
//!
//! The run ends by writing `manifest.json` summarizing everything produced.
//!
//! ## Failure policy
//!
//! A failure on one source file (unreadable, undecodable, encode error) is
//! recorded as a [`FileFailure`] in the batch report and the run continues;
//! derivatives of that file that landed before the failure stay on disk but
//! the file is absent from the manifest. Output-directory creation and
//! manifest persistence errors are fatal.
//!
//! ## Concurrency
//!
//! Files fan out across a rayon pool; output is order-independent (each
//! file owns its derivative filenames), so the final file set and manifest
//! match a sequential run. The output directory is single-writer state:
//! concurrent runs against the same output directory must be serialized
//! externally.
//!
//! ## Strays
//!
//! After processing, the output directory is rescanned and derivative files
//! this run did not produce are reported as strays (leftovers from earlier
//! runs with different inputs). They are reported, not deleted, and never
//! enter the manifest.

use crate::config::PipelineConfig;
use crate::imaging::{
    ImageBackend, Quality, ReencodeParams, ScaleParams, ladder_widths, scaled_height,
};
use crate::manifest::{MANIFEST_FILENAME, Manifest, ManifestError};
use crate::naming::{self, SourceFormat};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// A qualifying source file discovered by the directory scan.
#[derive(Debug, Clone)]
struct SourceFile {
    path: PathBuf,
    base: String,
    ext: String,
    format: SourceFormat,
}

/// Everything generated for one source image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub base: String,
    pub source_path: PathBuf,
    /// Intrinsic dimensions of the source.
    pub width: u32,
    pub height: u32,
    /// Ladder widths actually generated, ascending.
    pub scaled_widths: Vec<u32>,
    /// Fallback output filename (always present for qualifying sources).
    pub fallback_filename: Option<String>,
}

/// One source file that could not be processed.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub source_path: PathBuf,
    pub reason: String,
}

/// Aggregate result of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    pub processed: Vec<ProcessedImage>,
    pub failures: Vec<FileFailure>,
    /// Source directories from the config that did not exist.
    pub missing_sources: Vec<PathBuf>,
    /// Derivative files found in the output directory that this run did
    /// not produce.
    pub strays: Vec<String>,
}

impl BatchReport {
    /// Total derivative files written (scaled + fallback).
    pub fn derivative_count(&self) -> usize {
        self.processed
            .iter()
            .map(|p| p.scaled_widths.len() + usize::from(p.fallback_filename.is_some()))
            .sum()
    }
}

/// The run's outputs: the written manifest plus the batch report.
#[derive(Debug)]
pub struct BatchOutcome {
    pub manifest: Manifest,
    pub report: BatchReport,
}

/// Progress events streamed to the CLI printer thread.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started { name: String },
    Completed {
        name: String,
        scaled_widths: Vec<u32>,
        fallback: bool,
    },
    Failed { name: String, reason: String },
}

/// Run the batch optimizer with the production backend.
pub fn optimize(
    config: &PipelineConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchOutcome, OptimizeError> {
    let backend = crate::imaging::RustBackend::new();
    optimize_with_backend(&backend, config, progress)
}

/// Run the batch optimizer with a specific backend (allows testing with a mock).
pub fn optimize_with_backend(
    backend: &impl ImageBackend,
    config: &PipelineConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchOutcome, OptimizeError> {
    std::fs::create_dir_all(&config.output_dir)?;

    let (files, missing_sources) = collect_sources(&config.sources)?;

    let results: Vec<Result<ProcessedImage, FileFailure>> = files
        .par_iter()
        .map_with(progress, |tx, file| {
            send(tx, ProcessEvent::Started {
                name: file.path.display().to_string(),
            });
            let result = process_file(backend, config, file);
            match &result {
                Ok(p) => send(tx, ProcessEvent::Completed {
                    name: file.path.display().to_string(),
                    scaled_widths: p.scaled_widths.clone(),
                    fallback: p.fallback_filename.is_some(),
                }),
                Err(f) => send(tx, ProcessEvent::Failed {
                    name: file.path.display().to_string(),
                    reason: f.reason.clone(),
                }),
            }
            result
        })
        .collect();

    let mut processed = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(p) => processed.push(p),
            Err(f) => failures.push(f),
        }
    }
    // par_iter preserves input order, but keep the report deterministic
    // regardless of backend behavior.
    processed.sort_by(|a, b| a.base.cmp(&b.base));

    let strays = find_strays(&config.output_dir, &processed, &failures)?;

    let manifest = Manifest::from_processed(&processed, &config.url_prefix);
    manifest.write(&config.output_dir)?;

    Ok(BatchOutcome {
        manifest,
        report: BatchReport {
            processed,
            failures,
            missing_sources,
            strays,
        },
    })
}

/// Scan the top level of each source directory for qualifying files.
///
/// Missing directories are recorded, not fatal; the original site kept a
/// shared assets/public pair where either may be absent.
fn collect_sources(
    sources: &[PathBuf],
) -> Result<(Vec<SourceFile>, Vec<PathBuf>), OptimizeError> {
    let mut files = Vec::new();
    let mut missing = Vec::new();

    for dir in sources {
        if !dir.is_dir() {
            missing.push(dir.clone());
            continue;
        }
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        for path in entries {
            let Some(format) = SourceFormat::from_path(&path) else {
                continue;
            };
            let (Some(base), Some(ext)) =
                (naming::base_name(&path), naming::source_extension(&path))
            else {
                continue;
            };
            files.push(SourceFile {
                path,
                base,
                ext,
                format,
            });
        }
    }

    Ok((files, missing))
}

/// Process one source file: identify, scale per ladder width, re-encode fallback.
///
/// The first error stops this file (remaining derivatives are skipped) and
/// becomes its `FileFailure`; siblings already written stay on disk.
fn process_file(
    backend: &impl ImageBackend,
    config: &PipelineConfig,
    file: &SourceFile,
) -> Result<ProcessedImage, FileFailure> {
    let fail = |reason: String| FileFailure {
        source_path: file.path.clone(),
        reason,
    };

    let dims = backend
        .identify(&file.path)
        .map_err(|e| fail(e.to_string()))?;

    let widths = ladder_widths(dims.width, &config.sizes);
    for &width in &widths {
        let height = scaled_height((dims.width, dims.height), width);
        backend
            .scale(&ScaleParams {
                source: file.path.clone(),
                output: config
                    .output_dir
                    .join(naming::scaled_filename(&file.base, width)),
                width,
                height,
                quality: Quality::new(config.quality.webp),
            })
            .map_err(|e| fail(format!("{width}w: {e}")))?;
    }

    let fallback_quality = match file.format {
        SourceFormat::Jpeg => config.quality.jpeg,
        SourceFormat::Png => config.quality.png,
    };
    let fallback_filename = naming::fallback_filename(&file.base, &file.ext);
    backend
        .reencode(&ReencodeParams {
            source: file.path.clone(),
            output: config.output_dir.join(&fallback_filename),
            format: file.format,
            quality: Quality::new(fallback_quality),
        })
        .map_err(|e| fail(format!("fallback: {e}")))?;

    Ok(ProcessedImage {
        base: file.base.clone(),
        source_path: file.path.clone(),
        width: dims.width,
        height: dims.height,
        scaled_widths: widths,
        fallback_filename: Some(fallback_filename),
    })
}

/// Derivative files in the output directory that this run did not produce
/// and that do not belong to a source that failed mid-file.
fn find_strays(
    output_dir: &Path,
    processed: &[ProcessedImage],
    failures: &[FileFailure],
) -> Result<Vec<String>, OptimizeError> {
    let own_bases: BTreeSet<&str> = processed
        .iter()
        .map(|p| p.base.as_str())
        .chain(
            failures
                .iter()
                .filter_map(|f| f.source_path.file_stem().and_then(|s| s.to_str())),
        )
        .collect();

    let mut strays = Vec::new();
    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().to_string();
        if filename == MANIFEST_FILENAME {
            continue;
        }
        let base = match naming::parse_derivative(&filename) {
            Some(naming::Derivative::Scaled { base, .. }) => base,
            Some(naming::Derivative::Fallback { base, .. }) => base,
            None => {
                strays.push(filename);
                continue;
            }
        };
        if !own_bases.contains(base.as_str()) {
            strays.push(filename);
        }
    }
    strays.sort();
    Ok(strays)
}

fn send(progress: &mut Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // Printer thread gone means nobody is listening; not an error.
        let _ = tx.send(event);
    }
}
