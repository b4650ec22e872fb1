// SPDX-License-Identifier: PMPL-1.0-or-later
//! Check outcomes and their aggregation for one graded submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Passed => write!(f, "PASS"),
            Status::Failed => write!(f, "FAIL"),
        }
    }
}

/// Result of one named check inside a check group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Group the check belongs to, e.g. "Has required HTML"
    pub group: String,
    /// Check name, e.g. "Specifies charset"
    pub name: String,
    pub status: Status,
    /// Failure diagnostic; absent on pass
    pub message: Option<String>,
    pub duration_ms: u64,
}

impl CheckResult {
    pub fn passed(group: &str, name: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            status: Status::Passed,
            message: None,
            duration_ms: 0,
        }
    }

    pub fn failed(group: &str, name: &str, message: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            status: Status::Failed,
            message: Some(message.to_string()),
            duration_ms: 0,
        }
    }

    /// Record how long the check took
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status == Status::Failed
    }
}

/// All check results for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Submission root the document was read from
    pub submission: PathBuf,
    pub started_at: DateTime<Utc>,
    pub results: Vec<CheckResult>,
}

impl RunReport {
    pub fn new(submission: PathBuf) -> Self {
        Self {
            submission,
            started_at: Utc::now(),
            results: Vec::new(),
        }
    }

    pub fn add(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = CheckResult>) {
        self.results.extend(results);
    }

    pub fn passed(&self) -> Vec<&CheckResult> {
        self.results.iter().filter(|r| !r.is_failure()).collect()
    }

    pub fn failed(&self) -> Vec<&CheckResult> {
        self.results.iter().filter(|r| r.is_failure()).collect()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(CheckResult::is_failure)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Group names in the order they ran
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for r in &self.results {
            if !groups.contains(&r.group.as_str()) {
                groups.push(&r.group);
            }
        }
        groups
    }

    pub fn by_group(&self, group: &str) -> Vec<&CheckResult> {
        self.results.iter().filter(|r| r.group == group).collect()
    }

    /// Find a check by name
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// (group, name, status) triples, independent of timing and messages
    pub fn outcomes(&self) -> Vec<(String, String, Status)> {
        self.results
            .iter()
            .map(|r| (r.group.clone(), r.name.clone(), r.status))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunReport {
        let mut report = RunReport::new(PathBuf::from("site"));
        report.add(CheckResult::passed("Has required HTML", "Specifies charset"));
        report.add(CheckResult::failed(
            "Has required HTML",
            "Includes a list",
            "expected at least 1",
        ));
        report.add(CheckResult::passed("Has required CSS", "Body has default font size"));
        report
    }

    #[test]
    fn test_aggregation() {
        let report = sample();
        assert_eq!(report.len(), 3);
        assert_eq!(report.passed().len(), 2);
        assert_eq!(report.failed().len(), 1);
        assert!(report.has_failures());
        assert_eq!(report.groups(), vec!["Has required HTML", "Has required CSS"]);
        assert_eq!(report.by_group("Has required HTML").len(), 2);
        assert_eq!(
            report.get("Includes a list").and_then(|r| r.message.as_deref()),
            Some("expected at least 1")
        );
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&Status::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
        assert_eq!(Status::Passed.to_string(), "PASS");
    }

    #[test]
    fn test_duration_recorded() {
        let result = CheckResult::passed("g", "n").with_duration(Duration::from_millis(12));
        assert_eq!(result.duration_ms, 12);
    }
}
