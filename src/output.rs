//! CLI output formatting for the optimize and verify commands.
//!
//! # Output Format
//!
//! ## Optimize
//!
//! ```text
//! assets/room.png
//!     320w 640w 768w 1024w + fallback
//! assets/broken.jpg
//!     FAILED: Failed to decode assets/broken.jpg
//!
//! Optimized 3 images (11 files), 1 failure
//! Missing source directory: public
//! Stray in output directory: old-640w.webp
//! ```
//!
//! ## Verify
//!
//! ```text
//! ✓ sitemap.xml present
//! ✗ robots.txt present
//!     robots.txt not found
//!
//! 12/14 checks passed
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects. Colors come from
//! `owo-colors`, which honors the usual overrides.

use crate::optimize::{BatchReport, ProcessEvent};
use crate::verify::VerifyReport;
use owo_colors::OwoColorize;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format one progress event as output lines.
///
/// `Started` produces nothing; the per-file result line carries the
/// filename, so echoing starts would only interleave noise under rayon.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { .. } => Vec::new(),
        ProcessEvent::Completed {
            name,
            scaled_widths,
            fallback,
        } => {
            let mut parts: Vec<String> =
                scaled_widths.iter().map(|w| format!("{w}w")).collect();
            if *fallback {
                parts.push(if parts.is_empty() {
                    "fallback only".to_string()
                } else {
                    "+ fallback".to_string()
                });
            }
            vec![name.clone(), format!("{}{}", indent(1), parts.join(" "))]
        }
        ProcessEvent::Failed { name, reason } => {
            vec![
                name.clone(),
                format!("{}{}: {}", indent(1), "FAILED".red(), reason),
            ]
        }
    }
}

/// Format the end-of-run summary.
pub fn format_summary(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![String::new()];

    let failures = match report.failures.len() {
        0 => String::new(),
        1 => ", 1 failure".to_string(),
        n => format!(", {n} failures"),
    };
    lines.push(format!(
        "Optimized {} image{} ({} files){}",
        report.processed.len(),
        if report.processed.len() == 1 { "" } else { "s" },
        report.derivative_count(),
        failures,
    ));

    for dir in &report.missing_sources {
        lines.push(format!("Missing source directory: {}", dir.display()));
    }
    for stray in &report.strays {
        lines.push(format!("Stray in output directory: {stray}"));
    }
    lines
}

/// Format the verify checklist: one line per check, then the tally.
pub fn format_verify_report(report: &VerifyReport) -> Vec<String> {
    let mut lines = Vec::new();
    for result in &report.results {
        if result.passed {
            lines.push(format!("{} {}", "✓".green(), result.label));
        } else {
            lines.push(format!("{} {}", "✗".red(), result.label));
            if !result.detail.is_empty() {
                lines.push(format!("{}{}", indent(1), result.detail));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "{}/{} checks passed",
        report.passed(),
        report.total()
    ));
    lines
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{line}");
    }
}

pub fn print_summary(report: &BatchReport) {
    for line in format_summary(report) {
        println!("{line}");
    }
}

pub fn print_verify_report(report: &VerifyReport) {
    for line in format_verify_report(report) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::ProcessedImage;
    use crate::verify::CheckResult;

    fn processed(base: &str, widths: &[u32]) -> ProcessedImage {
        ProcessedImage {
            base: base.to_string(),
            source_path: format!("assets/{base}.png").into(),
            width: 1000,
            height: 600,
            scaled_widths: widths.to_vec(),
            fallback_filename: Some(format!("{base}-optimized.png")),
        }
    }

    #[test]
    fn started_event_is_silent() {
        let lines = format_process_event(&ProcessEvent::Started {
            name: "assets/room.png".to_string(),
        });
        assert!(lines.is_empty());
    }

    #[test]
    fn completed_event_lists_widths_and_fallback() {
        let lines = format_process_event(&ProcessEvent::Completed {
            name: "assets/room.png".to_string(),
            scaled_widths: vec![320, 640, 768],
            fallback: true,
        });
        assert_eq!(lines[0], "assets/room.png");
        assert_eq!(lines[1], "    320w 640w 768w + fallback");
    }

    #[test]
    fn completed_event_with_no_scaled_widths() {
        let lines = format_process_event(&ProcessEvent::Completed {
            name: "assets/tiny.png".to_string(),
            scaled_widths: vec![],
            fallback: true,
        });
        assert_eq!(lines[1], "    fallback only");
    }

    #[test]
    fn failed_event_shows_reason() {
        let lines = format_process_event(&ProcessEvent::Failed {
            name: "assets/broken.jpg".to_string(),
            reason: "mock decode failure".to_string(),
        });
        assert_eq!(lines[0], "assets/broken.jpg");
        assert!(lines[1].contains("FAILED"));
        assert!(lines[1].contains("mock decode failure"));
    }

    #[test]
    fn summary_counts_images_and_files() {
        let report = BatchReport {
            processed: vec![processed("a", &[320, 640]), processed("b", &[320])],
            failures: vec![],
            missing_sources: vec![],
            strays: vec![],
        };
        let lines = format_summary(&report);
        assert!(lines.contains(&"Optimized 2 images (5 files)".to_string()));
    }

    #[test]
    fn summary_singular_image_and_failures() {
        let report = BatchReport {
            processed: vec![processed("a", &[320])],
            failures: vec![crate::optimize::FileFailure {
                source_path: "assets/b.jpg".into(),
                reason: "broken".to_string(),
            }],
            missing_sources: vec!["public".into()],
            strays: vec!["old-640w.webp".to_string()],
        };
        let lines = format_summary(&report);
        assert!(lines.contains(&"Optimized 1 image (2 files), 1 failure".to_string()));
        assert!(lines.contains(&"Missing source directory: public".to_string()));
        assert!(lines.contains(&"Stray in output directory: old-640w.webp".to_string()));
    }

    #[test]
    fn verify_report_lines_and_tally() {
        let report = VerifyReport {
            results: vec![
                CheckResult {
                    label: "sitemap.xml present".to_string(),
                    passed: true,
                    detail: String::new(),
                },
                CheckResult {
                    label: "robots.txt present".to_string(),
                    passed: false,
                    detail: "robots.txt not found".to_string(),
                },
            ],
        };
        let lines = format_verify_report(&report);
        assert!(lines[0].contains("sitemap.xml present"));
        assert!(lines[1].contains("robots.txt present"));
        assert!(lines[2].contains("robots.txt not found"));
        assert_eq!(lines.last().unwrap(), "1/2 checks passed");
    }
}
