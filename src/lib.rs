// SPDX-License-Identifier: PMPL-1.0-or-later
//! Gradebot - conformance grader for introductory HTML/CSS exercises
//!
//! Grades a student submission (`index.html` plus `css/style.css`) against a
//! fixed rubric and reports a pass/fail per named check.
//!
//! ## Check groups
//!
//! - **Source code is valid**: markup and stylesheet lint clean
//! - **Has required HTML**: charset, title, author, heading, image, paragraph,
//!   hyperlink and list structure
//! - **Has required CSS**: stylesheet link and computed font, line-height,
//!   image height and list item color
//!
//! Groups run in that order. A group's setup step (parsing, style inlining)
//! runs once; if it fails, every check in the group fails with its error.

pub mod checks;
pub mod config;
pub mod document;
pub mod error;
pub mod inline;
pub mod lint;
pub mod matchers;
pub mod report;
pub mod results;
pub mod scanner;

pub use config::Config;
pub use document::Document;
pub use error::{GradeError, Result};
pub use results::{CheckResult, RunReport, Status};
pub use scanner::{discover_submissions, grade_directory, grade_submission};
