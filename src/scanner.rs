// SPDX-License-Identifier: PMPL-1.0-or-later
//! Submission discovery and grading.
//!
//! A submission is a directory holding the configured document. Grading
//! loads the document once and runs the three check groups over it in order.

use crate::checks::structure::StructureChecks;
use crate::checks::style::StyleChecks;
use crate::checks::validity::ValidityChecks;
use crate::checks::{fail_group, run_group, CheckContext};
use crate::config::Config;
use crate::document::Document;
use crate::results::RunReport;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Grade the submission rooted at `root`
pub fn grade_submission(root: &Path, config: &Config) -> RunReport {
    let mut report = RunReport::new(root.to_path_buf());
    let document_path = root.join(&config.document);

    info!("Grading submission: {}", root.display());

    let document = match Document::load(&document_path) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(document = %document_path.display(), error = %e, "Document could not be loaded");
            let reason = format!("Setup failed: {}", e);
            report.extend(fail_group(&ValidityChecks, &reason));
            report.extend(fail_group(&StructureChecks, &reason));
            report.extend(fail_group(&StyleChecks, &reason));
            return report;
        }
    };

    let ctx = CheckContext {
        document: &document,
        config,
        stylesheet: root.join(&config.stylesheet),
    };

    report.extend(run_group(&ValidityChecks, &ctx));
    report.extend(run_group(&StructureChecks, &ctx));
    report.extend(run_group(&StyleChecks, &ctx));

    info!(
        "Graded {}: {} passed, {} failed",
        root.display(),
        report.passed().len(),
        report.failed().len()
    );

    report
}

/// Find every submission root under `dir`: directories containing the
/// configured document, skipping hidden and excluded directories
pub fn discover_submissions(dir: &Path, config: &Config) -> Vec<PathBuf> {
    let document_name = config
        .document
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();

    let mut roots = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or("");
            if e.file_type().is_dir() && e.depth() > 0 {
                return !config.exclude.iter().any(|x| x == name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        if entry.file_type().is_file() && entry.file_name() == document_name.as_os_str() {
            // The document may live in a subdirectory of the submission root
            let depth = config.document.components().count();
            let root = entry.path().ancestors().nth(depth).map(Path::to_path_buf);
            if let Some(root) = root {
                if root.join(&config.document).is_file() && !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }
    }

    info!("Discovered {} submissions under {}", roots.len(), dir.display());
    roots
}

/// Grade every submission found under `dir`
pub fn grade_directory(dir: &Path, config: &Config) -> Vec<RunReport> {
    discover_submissions(dir, config)
        .iter()
        .map(|root| grade_submission(root, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Status;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_fails_every_check() {
        let temp = TempDir::new().unwrap();
        let report = grade_submission(temp.path(), &Config::default());

        assert_eq!(report.len(), 17);
        assert!(report.results.iter().all(|r| r.status == Status::Failed));
        assert_eq!(
            report.groups(),
            vec!["Source code is valid", "Has required HTML", "Has required CSS"]
        );
    }

    #[test]
    fn test_discover_skips_hidden_and_excluded() {
        let temp = TempDir::new().unwrap();
        for dir in ["alice", "bob/site", "node_modules/pkg", ".cache"] {
            std::fs::create_dir_all(temp.path().join(dir)).unwrap();
            std::fs::write(temp.path().join(dir).join("index.html"), "<p>x</p>").unwrap();
        }
        std::fs::write(temp.path().join("alice/notes.txt"), "").unwrap();

        let roots = discover_submissions(temp.path(), &Config::default());
        assert_eq!(
            roots,
            vec![temp.path().join("alice"), temp.path().join("bob/site")]
        );
    }

    #[test]
    fn test_discover_nonexistent_dir() {
        let roots = discover_submissions(Path::new("/nonexistent/path"), &Config::default());
        assert!(roots.is_empty());
    }
}
