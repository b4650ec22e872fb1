// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for graded submissions.
//!
//! Supports multiple output formats:
//! - Text: test-runner style listing, one line per check
//! - JSON: the full run report for programmatic consumption
//! - JUnit: XML test suites for CI graders

use crate::results::{RunReport, Status};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// JUnit XML for CI integration
    Junit,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Junit => write!(f, "junit"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "junit" => Ok(OutputFormat::Junit),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Generate a report for one submission
pub fn generate_report(report: &RunReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(report),
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Junit => generate_junit_report(std::slice::from_ref(report)),
    }
}

/// Generate a report covering several submissions
pub fn generate_batch_report(reports: &[RunReport], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_batch_summary(reports),
        OutputFormat::Json => serde_json::to_string_pretty(reports).unwrap_or_else(|e| {
            format!("{{\"error\": \"Failed to serialize reports: {}\"}}", e)
        }),
        OutputFormat::Junit => generate_junit_report(reports),
    }
}

fn generate_text_report(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "=== Gradebot Report: {} ===\n\n",
        report.submission.display()
    ));

    for group in report.groups() {
        output.push_str(group);
        output.push('\n');

        for result in report.by_group(group) {
            let mark = match result.status {
                Status::Passed => '✓',
                Status::Failed => '✕',
            };
            output.push_str(&format!(
                "  {} {} ({} ms)\n",
                mark, result.name, result.duration_ms
            ));

            if let Some(ref message) = result.message {
                for line in message.lines() {
                    output.push_str(&format!("      {}\n", line));
                }
            }
        }
        output.push('\n');
    }

    output.push_str(&tally(report));
    output.push('\n');

    if report.has_failures() {
        output.push_str("RESULT: FAIL\n");
    } else {
        output.push_str("RESULT: PASS\n");
    }

    output
}

fn tally(report: &RunReport) -> String {
    format!(
        "Tests: {} failed, {} passed, {} total",
        report.failed().len(),
        report.passed().len(),
        report.len()
    )
}

/// One line per submission plus an overall count
pub fn generate_batch_summary(reports: &[RunReport]) -> String {
    let mut output = String::new();

    output.push_str("=== Gradebot Batch Summary ===\n\n");

    if reports.is_empty() {
        output.push_str("No submissions found.\n");
        return output;
    }

    for report in reports {
        let status = if report.has_failures() { "FAIL" } else { "PASS" };
        output.push_str(&format!(
            "{} {}  ({})\n",
            status,
            report.submission.display(),
            tally(report)
        ));
        for failed in report.failed() {
            output.push_str(&format!("    ✕ {} › {}\n", failed.group, failed.name));
        }
    }

    let failing = reports.iter().filter(|r| r.has_failures()).count();
    output.push_str(&format!(
        "\nSubmissions: {} failed, {} passed, {} total\n",
        failing,
        reports.len() - failing,
        reports.len()
    ));

    output
}

fn generate_json_report(report: &RunReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
    })
}

/// Escape text for use in XML attributes and character data
fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// One `<testsuite>` per check group per submission
fn generate_junit_report(reports: &[RunReport]) -> String {
    let total: usize = reports.iter().map(RunReport::len).sum();
    let failures: usize = reports.iter().map(|r| r.failed().len()).sum();

    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str(&format!(
        "<testsuites name=\"gradebot\" tests=\"{}\" failures=\"{}\">\n",
        total, failures
    ));

    for report in reports {
        let submission = report.submission.display().to_string();
        for group in report.groups() {
            let results = report.by_group(group);
            let group_failures = results.iter().filter(|r| r.is_failure()).count();
            output.push_str(&format!(
                "  <testsuite name=\"{}\" package=\"{}\" tests=\"{}\" failures=\"{}\" timestamp=\"{}\">\n",
                xml_escape(group),
                xml_escape(&submission),
                results.len(),
                group_failures,
                report.started_at.to_rfc3339()
            ));

            for result in results {
                let seconds = result.duration_ms as f64 / 1000.0;
                let open = format!(
                    "    <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\"",
                    xml_escape(&result.name),
                    xml_escape(group),
                    seconds
                );
                match (&result.status, &result.message) {
                    (Status::Failed, message) => {
                        let message = message.as_deref().unwrap_or("");
                        let summary = message.lines().next().unwrap_or("");
                        output.push_str(&open);
                        output.push_str(">\n");
                        output.push_str(&format!(
                            "      <failure message=\"{}\">{}</failure>\n",
                            xml_escape(summary),
                            xml_escape(message)
                        ));
                        output.push_str("    </testcase>\n");
                    }
                    (Status::Passed, _) => {
                        output.push_str(&open);
                        output.push_str("/>\n");
                    }
                }
            }

            output.push_str("  </testsuite>\n");
        }
    }

    output.push_str("</testsuites>\n");
    output
}
