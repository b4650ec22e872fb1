// SPDX-License-Identifier: PMPL-1.0-or-later
//! Expectation helpers used by the checks.
//!
//! Each helper returns `Err(Failure)` on mismatch so a check body reads as a
//! sequence of `expect_*(...)?` statements that stops at the first failure.

use crate::error::GradeError;
use regex::Regex;
use std::fmt::Debug;

/// Why a check failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A single expectation did not hold
    Mismatch {
        what: String,
        expected: String,
        received: String,
    },
    /// Linter diagnostics, already formatted one per line
    Diagnostics(String),
    /// The check could not run (unreadable file, bad pattern, ...)
    Error(String),
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Mismatch {
                what,
                expected,
                received,
            } => write!(f, "{}\nExpected: {}\nReceived: {}", what, expected, received),
            Failure::Diagnostics(text) => write!(f, "{}", text.trim_end()),
            Failure::Error(text) => write!(f, "{}", text),
        }
    }
}

impl From<GradeError> for Failure {
    fn from(err: GradeError) -> Self {
        Failure::Error(err.to_string())
    }
}

impl From<regex::Error> for Failure {
    fn from(err: regex::Error) -> Self {
        Failure::Error(format!("invalid pattern: {}", err))
    }
}

pub type CheckOutcome = std::result::Result<(), Failure>;

fn mismatch(what: &str, expected: String, received: String) -> Failure {
    Failure::Mismatch {
        what: what.to_string(),
        expected,
        received,
    }
}

pub fn expect_eq<T: PartialEq + Debug>(what: &str, expected: T, received: T) -> CheckOutcome {
    if expected == received {
        Ok(())
    } else {
        Err(mismatch(what, format!("{:?}", expected), format!("{:?}", received)))
    }
}

pub fn expect_ne<T: PartialEq + Debug>(what: &str, unexpected: T, received: T) -> CheckOutcome {
    if unexpected != received {
        Ok(())
    } else {
        Err(mismatch(what, format!("not {:?}", unexpected), format!("{:?}", received)))
    }
}

pub fn expect_at_least(what: &str, min: usize, received: usize) -> CheckOutcome {
    if received >= min {
        Ok(())
    } else {
        Err(mismatch(what, format!(">= {}", min), received.to_string()))
    }
}

/// Non-empty after trimming
pub fn expect_text(what: &str, received: &str) -> CheckOutcome {
    if !received.trim().is_empty() {
        Ok(())
    } else {
        Err(mismatch(what, "non-empty text".to_string(), format!("{:?}", received)))
    }
}

/// A value that must be present; `None` reads as undefined
pub fn expect_defined<'a>(what: &str, received: Option<&'a str>) -> Result<&'a str, Failure> {
    match received {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(value) => Err(mismatch(what, "a value".to_string(), format!("{:?}", value))),
        None => Err(mismatch(what, "a value".to_string(), "undefined".to_string())),
    }
}

pub fn expect_match(what: &str, pattern: &Regex, received: &str) -> CheckOutcome {
    if pattern.is_match(received) {
        Ok(())
    } else {
        Err(mismatch(
            what,
            format!("to match /{}/", pattern.as_str()),
            format!("{:?}", received),
        ))
    }
}

pub fn expect_contains(what: &str, needle: &str, received: &str) -> CheckOutcome {
    if received.contains(needle) {
        Ok(())
    } else {
        Err(mismatch(what, format!("to contain {:?}", needle), format!("{:?}", received)))
    }
}

/// Passes when some item satisfies `pred`; otherwise reports all candidates
pub fn expect_any<T: Debug>(what: &str, expected: &str, items: &[T], pred: impl Fn(&T) -> bool) -> CheckOutcome {
    if items.iter().any(pred) {
        Ok(())
    } else {
        Err(mismatch(what, expected.to_string(), format!("{:?}", items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_eq_message() {
        let err = expect_eq("number of <h1> elements", 1, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "number of <h1> elements\nExpected: 1\nReceived: 2"
        );
    }

    #[test]
    fn test_expect_ne() {
        assert!(expect_ne("title", "My Page Title", "Recipes").is_ok());
        let err = expect_ne("title", "My Page Title", "My Page Title").unwrap_err();
        assert!(err.to_string().contains("Expected: not \"My Page Title\""));
    }

    #[test]
    fn test_expect_text_rejects_whitespace() {
        assert!(expect_text("heading", "Hi").is_ok());
        assert!(expect_text("heading", "  \n").is_err());
    }

    #[test]
    fn test_expect_defined() {
        assert_eq!(expect_defined("color", Some("red")), Ok("red"));
        let err = expect_defined("color", None).unwrap_err();
        assert!(err.to_string().ends_with("Received: undefined"));
    }

    #[test]
    fn test_expect_match_and_any() {
        let re = Regex::new(r"^https?://").unwrap();
        assert!(expect_match("href", &re, "https://example.com").is_ok());
        assert!(expect_match("href", &re, "example.com").is_err());

        let srcs = vec!["pics/a.png", "img/b.png"];
        assert!(expect_any("src", "img/...", &srcs, |s| s.starts_with("img/")).is_ok());
        assert!(expect_any("src", "img/...", &srcs[..1], |s| s.starts_with("img/")).is_err());
    }

    #[test]
    fn test_diagnostics_trimmed() {
        let failure = Failure::Diagnostics("Error: 'x' at line 1, column 1.\n".to_string());
        assert_eq!(failure.to_string(), "Error: 'x' at line 1, column 1.");
    }
}
