// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for gradebot

use gradebot::config::{load_config, write_default_config, Config};
use gradebot::report::{generate_batch_report, generate_report, OutputFormat};
use gradebot::scanner;
use gradebot::{RunReport, Status};
use std::path::Path;

fn grade(fixture: &str) -> RunReport {
    scanner::grade_submission(
        &Path::new("tests/fixtures").join(fixture),
        &Config::default(),
    )
}

fn status_of(report: &RunReport, name: &str) -> Status {
    report
        .get(name)
        .unwrap_or_else(|| panic!("no check named {}", name))
        .status
}

fn message_of<'a>(report: &'a RunReport, name: &str) -> &'a str {
    report
        .get(name)
        .and_then(|r| r.message.as_deref())
        .unwrap_or("")
}

#[test]
fn test_complete_submission_passes_every_check() {
    let report = grade("complete");

    let failed: Vec<_> = report
        .failed()
        .iter()
        .map(|r| format!("{} › {}: {:?}", r.group, r.name, r.message))
        .collect();
    assert!(failed.is_empty(), "unexpected failures: {:#?}", failed);
    assert_eq!(report.len(), 17);
    assert_eq!(
        report.groups(),
        vec!["Source code is valid", "Has required HTML", "Has required CSS"]
    );
}

#[test]
fn test_incomplete_submission_failures() {
    let report = grade("incomplete");

    assert_eq!(status_of(&report, "HTML validates without errors"), Status::Failed);
    assert!(message_of(&report, "HTML validates without errors")
        .contains("Error: 'attr-bans' at line 12, column 6."));

    assert_eq!(status_of(&report, "CSS validates without errors"), Status::Failed);
    let css_message = message_of(&report, "CSS validates without errors");
    assert!(css_message.contains("declaration-block-no-duplicate-properties"));
    assert!(css_message.contains("At line 8, column 3."));

    for name in [
        "Includes page title",
        "Includes author metadata",
        "Has an image",
        "Includes a hyperlink in the paragraph",
        "List has at least 3 items",
        "Body has default font size",
        "Body has default font family",
        "Paragraphs have specified line height",
        "Images have constrained height",
        "Important list item is colored",
    ] {
        assert_eq!(status_of(&report, name), Status::Failed, "{} should fail", name);
    }

    for name in [
        "Specifies charset",
        "Has a top-level heading",
        "Includes a paragraph",
        "Includes a list",
        "Links in local stylesheet",
    ] {
        assert_eq!(status_of(&report, name), Status::Passed, "{} should pass", name);
    }

    assert!(message_of(&report, "Body has default font size").contains("Received: \"14px\""));
}

#[test]
fn test_missing_stylesheet_fails_style_group_only() {
    let report = grade("missing-stylesheet");

    assert_eq!(status_of(&report, "HTML validates without errors"), Status::Passed);
    assert_eq!(status_of(&report, "CSS validates without errors"), Status::Failed);

    assert!(report
        .by_group("Has required HTML")
        .iter()
        .all(|r| r.status == Status::Passed));

    let style = report.by_group("Has required CSS");
    assert_eq!(style.len(), 6);
    assert!(style.iter().all(|r| r.status == Status::Failed));
    assert!(style
        .iter()
        .all(|r| r.message.as_deref().unwrap_or("").starts_with("Setup failed")));
}

#[test]
fn test_missing_document_fails_everything() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let report = scanner::grade_submission(temp.path(), &Config::default());
    assert_eq!(report.failed().len(), 17);
}

#[test]
fn test_grading_is_deterministic() {
    for fixture in ["complete", "incomplete", "missing-stylesheet"] {
        assert_eq!(grade(fixture).outcomes(), grade(fixture).outcomes());
    }
}

#[test]
fn test_batch_discovers_fixtures() {
    let config = Config::default();
    let roots = scanner::discover_submissions(Path::new("tests/fixtures"), &config);
    assert_eq!(roots.len(), 3);

    let reports = scanner::grade_directory(Path::new("tests/fixtures"), &config);
    let passing = reports.iter().filter(|r| !r.has_failures()).count();
    assert_eq!(passing, 1);

    let summary = generate_batch_report(&reports, OutputFormat::Text);
    assert!(summary.contains("Submissions: 2 failed, 1 passed, 3 total"));
}

#[test]
fn test_reports_are_well_formed() {
    let report = grade("incomplete");

    let json = generate_report(&report, OutputFormat::Json);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(parsed["results"].as_array().map(Vec::len), Some(17));

    let xml = generate_report(&report, OutputFormat::Junit);
    assert_eq!(xml.matches("<testcase ").count(), 17);
    assert_eq!(xml.matches("<testsuite ").count(), 3);

    let text = generate_report(&report, OutputFormat::Text);
    assert!(text.contains("Tests: 12 failed, 5 passed, 17 total"));
}

#[test]
fn test_config_file_overrides_expectations() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let path = temp.path().join("gradebot.toml");
    write_default_config(&path).expect("write config");

    let text = std::fs::read_to_string(&path).expect("read config");
    let text = text.replace("body_font_size = \"16px\"", "body_font_size = \"14px\"");
    std::fs::write(&path, text).expect("rewrite config");

    let config = load_config(&path).expect("load config");
    let report = scanner::grade_submission(Path::new("tests/fixtures/incomplete"), &config);
    assert_eq!(status_of(&report, "Body has default font size"), Status::Passed);
}

/// Copy a fixture submission under `dest`
fn copy_fixture(fixture: &str, dest: &Path) {
    let src = Path::new("tests/fixtures").join(fixture);
    for entry in walkdir::WalkDir::new(&src) {
        let entry = entry.expect("walk fixture");
        let rel = entry.path().strip_prefix(&src).expect("inside fixture");
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).expect("create dir");
        } else {
            std::fs::copy(entry.path(), &target).expect("copy file");
        }
    }
}

#[test]
fn test_submission_directories_with_spaces_and_accents() {
    let temp = tempfile::TempDir::new().expect("temp dir");

    for name in ["plain", "Jane Doe", "José"] {
        let root = temp.path().join(name);
        copy_fixture("complete", &root);

        let report = scanner::grade_submission(&root, &Config::default());
        let failed: Vec<_> = report
            .failed()
            .iter()
            .map(|r| format!("{}: {:?}", r.name, r.message))
            .collect();
        assert!(failed.is_empty(), "{} had failures: {:#?}", name, failed);
    }
}
