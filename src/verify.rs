//! Pre-deployment site checks.
//!
//! A fixed checklist run against a built site root: expected files exist
//! and key head markup / crawler files contain what they should. Checks
//! are read-only and independent; every check runs even after failures so
//! one report covers the whole list.
//!
//! An unreadable or missing file is a failed check, not an error — the
//! absence is exactly what the check is for.

use std::path::Path;

/// One item on the checklist.
#[derive(Debug, Clone)]
pub enum Check {
    /// The file must exist under the site root.
    FileExists { path: String, label: String },
    /// The file must exist and contain the needle verbatim.
    FileContains {
        path: String,
        needle: String,
        label: String,
    },
}

impl Check {
    fn exists(path: &str, label: &str) -> Self {
        Self::FileExists {
            path: path.to_string(),
            label: label.to_string(),
        }
    }

    fn contains(path: &str, needle: &str, label: &str) -> Self {
        Self::FileContains {
            path: path.to_string(),
            needle: needle.to_string(),
            label: label.to_string(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::FileExists { label, .. } => label,
            Self::FileContains { label, .. } => label,
        }
    }
}

/// Outcome of one check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub label: String,
    pub passed: bool,
    /// Failure explanation; empty for passes.
    pub detail: String,
}

/// All check outcomes for one run.
#[derive(Debug)]
pub struct VerifyReport {
    pub results: Vec<CheckResult>,
}

impl VerifyReport {
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// The stock checklist: crawler files, head markup in the landing page,
/// and the optimizer manifest.
pub fn default_checks() -> Vec<Check> {
    vec![
        Check::exists("sitemap.xml", "sitemap.xml present"),
        Check::contains("sitemap.xml", "<?xml", "sitemap.xml is XML"),
        Check::exists("robots.txt", "robots.txt present"),
        Check::contains("robots.txt", "User-agent: *", "robots.txt addresses all crawlers"),
        Check::contains("robots.txt", "Sitemap:", "robots.txt links the sitemap"),
        Check::contains(
            "index.html",
            r#"name="description""#,
            "landing page has a meta description",
        ),
        Check::contains(
            "index.html",
            r#"property="og:title""#,
            "landing page has og:title",
        ),
        Check::contains(
            "index.html",
            r#"property="og:description""#,
            "landing page has og:description",
        ),
        Check::contains(
            "index.html",
            r#"property="og:image""#,
            "landing page has og:image",
        ),
        Check::contains(
            "index.html",
            r#"name="twitter:card""#,
            "landing page has a twitter card",
        ),
        Check::contains(
            "index.html",
            r#"rel="canonical""#,
            "landing page has a canonical URL",
        ),
        Check::contains(
            "index.html",
            r#"rel="preconnect""#,
            "landing page preconnects to asset origins",
        ),
        Check::exists(
            "public/optimized/manifest.json",
            "image manifest present",
        ),
        Check::contains(
            "public/optimized/manifest.json",
            "lastUpdated",
            "image manifest has a timestamp",
        ),
    ]
}

/// Run every check against the site root and collect the outcomes.
pub fn run_checks(root: &Path, checks: &[Check]) -> VerifyReport {
    let results = checks
        .iter()
        .map(|check| match check {
            Check::FileExists { path, label } => {
                let full = root.join(path);
                CheckResult {
                    label: label.clone(),
                    passed: full.is_file(),
                    detail: if full.is_file() {
                        String::new()
                    } else {
                        format!("{path} not found")
                    },
                }
            }
            Check::FileContains {
                path,
                needle,
                label,
            } => match std::fs::read_to_string(root.join(path)) {
                Ok(content) if content.contains(needle.as_str()) => CheckResult {
                    label: label.clone(),
                    passed: true,
                    detail: String::new(),
                },
                Ok(_) => CheckResult {
                    label: label.clone(),
                    passed: false,
                    detail: format!("{path} does not contain {needle:?}"),
                },
                Err(_) => CheckResult {
                    label: label.clone(),
                    passed: false,
                    detail: format!("{path} not readable"),
                },
            },
        })
        .collect();

    VerifyReport { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn passing_site(tmp: &TempDir) {
        let root = tmp.path();
        write(root, "sitemap.xml", r#"<?xml version="1.0"?><urlset/>"#);
        write(
            root,
            "robots.txt",
            "User-agent: *\nAllow: /\nSitemap: https://example.com/sitemap.xml\n",
        );
        write(
            root,
            "index.html",
            concat!(
                r#"<meta name="description" content="x">"#,
                r#"<meta property="og:title" content="x">"#,
                r#"<meta property="og:description" content="x">"#,
                r#"<meta property="og:image" content="x">"#,
                r#"<meta name="twitter:card" content="summary_large_image">"#,
                r#"<link rel="canonical" href="https://example.com/">"#,
                r#"<link rel="preconnect" href="https://fonts.gstatic.com">"#,
            ),
        );
        write(
            root,
            "public/optimized/manifest.json",
            r#"{"images":{},"lastUpdated":"2026-01-01T00:00:00+00:00"}"#,
        );
    }

    #[test]
    fn complete_site_passes_all_checks() {
        let tmp = TempDir::new().unwrap();
        passing_site(&tmp);

        let report = run_checks(tmp.path(), &default_checks());
        assert!(report.all_passed(), "failures: {:?}", report.results);
        assert_eq!(report.passed(), report.total());
    }

    #[test]
    fn missing_file_fails_without_aborting() {
        let tmp = TempDir::new().unwrap();
        passing_site(&tmp);
        std::fs::remove_file(tmp.path().join("robots.txt")).unwrap();

        let report = run_checks(tmp.path(), &default_checks());
        assert!(!report.all_passed());
        // Every check still ran
        assert_eq!(report.total(), default_checks().len());
        // Three robots.txt checks fail, the rest pass
        assert_eq!(report.total() - report.passed(), 3);
    }

    #[test]
    fn content_check_fails_when_needle_absent() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "robots.txt", "Disallow: /\n");

        let checks = vec![Check::contains(
            "robots.txt",
            "User-agent: *",
            "robots.txt addresses all crawlers",
        )];
        let report = run_checks(tmp.path(), &checks);
        assert!(!report.results[0].passed);
        assert!(report.results[0].detail.contains("does not contain"));
    }

    #[test]
    fn existence_check_reports_missing_path() {
        let tmp = TempDir::new().unwrap();
        let checks = vec![Check::exists("sitemap.xml", "sitemap.xml present")];
        let report = run_checks(tmp.path(), &checks);
        assert!(!report.results[0].passed);
        assert!(report.results[0].detail.contains("sitemap.xml"));
    }

    #[test]
    fn results_preserve_checklist_order() {
        let tmp = TempDir::new().unwrap();
        passing_site(&tmp);

        let checks = default_checks();
        let report = run_checks(tmp.path(), &checks);
        let labels: Vec<&str> = report.results.iter().map(|r| r.label.as_str()).collect();
        let expected: Vec<&str> = checks.iter().map(|c| c.label()).collect();
        assert_eq!(labels, expected);
    }
}
