//! # respimg
//!
//! Responsive image pipeline for static marketing sites: a build-time batch
//! optimizer that turns JPEG/PNG sources into breakpoint-laddered WebP
//! derivatives plus a same-format fallback, a `manifest.json` summarizing
//! each run, and a runtime renderer that emits the matching responsive
//! markup with a loading/loaded/errored presentation.
//!
//! # Architecture: Two Halves, One Convention
//!
//! ```text
//! Build time   assets/, public/  →  public/optimized/   (WebP ladder + fallback + manifest.json)
//! Runtime      ImageProps        →  markup              (srcset candidates + state machine)
//! ```
//!
//! The halves are deliberately decoupled: the renderer constructs candidate
//! URLs from the breakpoint ladder and a query-string convention without
//! consulting the manifest, so it works even when the optimizer has not run
//! and degrades to the plain `src`. What binds them is the shared ladder
//! ([`config::DEFAULT_SIZES`]) and the filename convention in [`naming`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`optimize`] | Build-time batch stage — scans sources, fans files out across rayon, writes derivatives and the manifest |
//! | [`manifest`] | `manifest.json` schema, in-memory accumulation, and persistence |
//! | [`render`] | Runtime half — `srcset` construction, display state machine, Maud markup |
//! | [`verify`] | Pre-deployment checklist: sitemap, robots.txt, head markup, manifest |
//! | [`config`] | `respimg.toml` loading, defaults, and validation |
//! | [`naming`] | Derivative filename convention: `{base}-{width}w.webp`, `{base}-optimized.{ext}` |
//! | [`imaging`] | Backend trait, pure ladder calculations, and the pure-Rust backend |
//! | [`output`] | CLI output formatting for the optimize and verify commands |
//!
//! # Design Decisions
//!
//! ## WebP Ladder + Same-Format Fallback
//!
//! Every source gets scaled WebP derivatives at each ladder width not
//! exceeding its intrinsic width (derivatives are never upscaled), plus
//! exactly one optimized fallback in the source's own format for
//! environments without WebP support. The manifest records both so site
//! templates can emit `<picture>` markup without re-listing the directory.
//!
//! ## In-Memory Manifest
//!
//! The manifest is accumulated from what the run actually produced, not
//! rebuilt from a directory listing afterwards. A listing-based rebuild
//! would resurrect leftovers from earlier runs; instead those are detected
//! and reported as strays.
//!
//! ## Per-File Failure Isolation
//!
//! One undecodable source must not sink a batch of hundreds. Each file
//! produces a `Result`; failures are collected into the batch report and
//! the failed image is simply absent from the manifest.
//!
//! ## Maud Over Template Engines
//!
//! Markup is generated with [Maud](https://maud.lambda.xyz/): compile-time
//! checked, type-safe, auto-escaped, no template files to ship.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resizing (Lanczos3), and JPEG/PNG re-encoding use the `image`
//! crate; lossy WebP encoding goes through libwebp via the `webp` crate
//! because the `image` crate's WebP encoder is lossless-only. No
//! ImageMagick, no external binaries.

pub mod config;
pub mod imaging;
pub mod manifest;
pub mod naming;
pub mod optimize;
pub mod output;
pub mod render;
pub mod verify;
