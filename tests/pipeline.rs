//! End-to-end pipeline tests with the real image backend.
//!
//! Synthetic images go in, actual WebP/JPEG/PNG derivatives and a
//! manifest.json come out.

use respimg::config::PipelineConfig;
use respimg::manifest::{MANIFEST_FILENAME, Manifest};
use respimg::optimize;
use std::path::Path;
use tempfile::TempDir;

fn create_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 100])
    });
    img.save(path).unwrap();
}

fn create_jpeg(path: &Path, width: u32, height: u32) {
    use image::ImageEncoder;
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, 50, (y % 256) as u8])
    });
    let file = std::fs::File::create(path).unwrap();
    image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn site_config(tmp: &TempDir) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.sources = vec![tmp.path().join("assets")];
    config.output_dir = tmp.path().join("public/optimized");
    config
}

fn read_manifest(config: &PipelineConfig) -> Manifest {
    let content =
        std::fs::read_to_string(config.output_dir.join(MANIFEST_FILENAME)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn png_source_yields_ladder_subset_and_fallback() {
    let tmp = TempDir::new().unwrap();
    let config = site_config(&tmp);
    std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
    create_png(&tmp.path().join("assets/room.png"), 1000, 600);

    let outcome = optimize::optimize(&config, None).unwrap();

    assert!(outcome.report.failures.is_empty());
    let img = &outcome.report.processed[0];
    assert_eq!(img.scaled_widths, vec![320, 640, 768]);

    // Derivatives on disk, decodable, correctly sized
    for (width, height) in [(320u32, 192u32), (640, 384), (768, 461)] {
        let path = config.output_dir.join(format!("room-{width}w.webp"));
        let (w, h) = image::image_dimensions(&path).unwrap();
        assert_eq!((w, h), (width, height));
    }
    let fallback = config.output_dir.join("room-optimized.png");
    assert_eq!(image::image_dimensions(&fallback).unwrap(), (1000, 600));

    // Manifest on disk matches what the run reported
    let manifest = read_manifest(&config);
    let entry = &manifest.images["room"];
    let sizes: Vec<u32> = entry.webp.iter().map(|r| r.size).collect();
    assert_eq!(sizes, vec![320, 640, 768]);
    assert_eq!(entry.webp[0].url, "/optimized/room-320w.webp");
    assert_eq!(
        entry.fallback.as_deref(),
        Some("/optimized/room-optimized.png")
    );
    assert!(!manifest.last_updated.is_empty());
}

#[test]
fn jpeg_source_gets_jpeg_fallback() {
    let tmp = TempDir::new().unwrap();
    let config = site_config(&tmp);
    std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
    create_jpeg(&tmp.path().join("assets/hero.jpg"), 400, 300);

    let outcome = optimize::optimize(&config, None).unwrap();

    let img = &outcome.report.processed[0];
    assert_eq!(img.scaled_widths, vec![320]);
    assert_eq!(img.fallback_filename.as_deref(), Some("hero-optimized.jpg"));

    let fallback = config.output_dir.join("hero-optimized.jpg");
    assert_eq!(image::image_dimensions(&fallback).unwrap(), (400, 300));
}

#[test]
fn rerun_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let config = site_config(&tmp);
    std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
    create_png(&tmp.path().join("assets/room.png"), 800, 500);

    let first = optimize::optimize(&config, None).unwrap();
    let second = optimize::optimize(&config, None).unwrap();

    assert_eq!(first.manifest.images, second.manifest.images);
    // Nothing from the first run shows up as a stray in the second
    assert!(second.report.strays.is_empty());
}

#[test]
fn broken_source_is_isolated_from_siblings() {
    let tmp = TempDir::new().unwrap();
    let config = site_config(&tmp);
    std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
    create_png(&tmp.path().join("assets/good.png"), 500, 400);
    std::fs::write(tmp.path().join("assets/bad.jpg"), b"not an image").unwrap();

    let outcome = optimize::optimize(&config, None).unwrap();

    assert_eq!(outcome.report.processed.len(), 1);
    assert_eq!(outcome.report.processed[0].base, "good");
    assert_eq!(outcome.report.failures.len(), 1);
    assert!(
        outcome.report.failures[0]
            .source_path
            .ends_with("assets/bad.jpg")
    );

    let manifest = read_manifest(&config);
    assert!(manifest.images.contains_key("good"));
    assert!(!manifest.images.contains_key("bad"));
}

#[test]
fn multiple_sources_and_mixed_content() {
    let tmp = TempDir::new().unwrap();
    let mut config = site_config(&tmp);
    config.sources = vec![tmp.path().join("assets"), tmp.path().join("public")];
    std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
    std::fs::create_dir_all(tmp.path().join("public")).unwrap();
    create_png(&tmp.path().join("assets/room.png"), 400, 400);
    create_jpeg(&tmp.path().join("public/hero.jpg"), 350, 200);
    // Ignored: wrong extension
    std::fs::write(tmp.path().join("assets/icon.svg"), "<svg/>").unwrap();

    let outcome = optimize::optimize(&config, None).unwrap();

    assert_eq!(outcome.report.processed.len(), 2);
    assert!(outcome.manifest.images.contains_key("room"));
    assert!(outcome.manifest.images.contains_key("hero"));
    assert!(outcome.report.missing_sources.is_empty());
}
