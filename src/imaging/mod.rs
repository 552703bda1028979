//! Image processing — pure Rust, zero external tool dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | Lanczos3 (`image::imageops`) |
//! | **Encode → WebP** | `webp` (libwebp, lossy at quality) |
//! | **Re-encode JPEG/PNG** | `image` codecs |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for ladder/dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{ladder_widths, scaled_height};
pub use params::{Quality, ReencodeParams, ScaleParams};
pub use rust_backend::RustBackend;
