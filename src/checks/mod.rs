// SPDX-License-Identifier: PMPL-1.0-or-later
//! Check groups.
//!
//! A group owns one setup step (parse, inline, ...) whose product every
//! check in the group reads. Setup runs once and finishes before any of the
//! group's checks see it. When setup fails, every check in the group fails
//! with the setup error; a failed assertion fails only its own check.

pub mod assert;
pub mod structure;
pub mod style;
pub mod validity;

use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::results::CheckResult;
use assert::CheckOutcome;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

/// Everything a check may read; shared read-only across groups
pub struct CheckContext<'a> {
    pub document: &'a Document,
    pub config: &'a Config,
    /// Absolute path of the stylesheet to lint
    pub stylesheet: PathBuf,
}

/// A named check over a group's setup product
pub struct Check<S> {
    pub name: &'static str,
    pub run: fn(&S, &CheckContext) -> CheckOutcome,
}

impl<S> Check<S> {
    pub fn new(name: &'static str, run: fn(&S, &CheckContext) -> CheckOutcome) -> Self {
        Self { name, run }
    }
}

/// A named set of checks sharing one setup step
pub trait CheckGroup {
    /// What setup produces for the checks to inspect
    type State;

    fn name(&self) -> &'static str;

    fn setup(&self, ctx: &CheckContext) -> Result<Self::State>;

    fn checks(&self) -> Vec<Check<Self::State>>;

    fn check_names(&self) -> Vec<&'static str> {
        self.checks().iter().map(|c| c.name).collect()
    }
}

/// Run setup, then every check of the group against its product
pub fn run_group<G: CheckGroup>(group: &G, ctx: &CheckContext) -> Vec<CheckResult> {
    let state = match group.setup(ctx) {
        Ok(state) => state,
        Err(e) => {
            warn!(group = group.name(), error = %e, "Group setup failed");
            return fail_group(group, &format!("Setup failed: {}", e));
        }
    };

    group
        .checks()
        .into_iter()
        .map(|check| {
            let started = Instant::now();
            let result = match (check.run)(&state, ctx) {
                Ok(()) => CheckResult::passed(group.name(), check.name),
                Err(failure) => CheckResult::failed(group.name(), check.name, &failure.to_string()),
            };
            debug!(group = group.name(), check = check.name, status = %result.status, "Check finished");
            result.with_duration(started.elapsed())
        })
        .collect()
}

/// Fail every check of a group without running it
pub fn fail_group<G: CheckGroup>(group: &G, reason: &str) -> Vec<CheckResult> {
    group
        .check_names()
        .into_iter()
        .map(|name| CheckResult::failed(group.name(), name, reason))
        .collect()
}

/// Elements matching a constant selector
pub(crate) fn select<'a>(html: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    let sel = Selector::parse(selector).expect("valid selector");
    html.select(&sel).collect()
}

/// Concatenated text content of an element
pub(crate) fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::assert::Failure;
    use crate::error::GradeError;
    use crate::results::Status;

    struct Counting;

    impl CheckGroup for Counting {
        type State = usize;

        fn name(&self) -> &'static str {
            "Counting"
        }

        fn setup(&self, ctx: &CheckContext) -> Result<usize> {
            if ctx.document.source().is_empty() {
                return Err(GradeError::Config("empty".to_string()));
            }
            Ok(ctx.document.source().len())
        }

        fn checks(&self) -> Vec<Check<usize>> {
            vec![
                Check::new("is short", |len, _| assert::expect_eq("length", 2, *len)),
                Check::new("always fails", |_, _| Err(Failure::Error("nope".to_string()))),
            ]
        }
    }

    fn run(source: &str) -> Vec<CheckResult> {
        let document = Document::from_source("index.html", source).unwrap();
        let config = Config::default();
        let ctx = CheckContext {
            document: &document,
            config: &config,
            stylesheet: PathBuf::from("css/style.css"),
        };
        run_group(&Counting, &ctx)
    }

    #[test]
    fn test_failure_is_scoped_to_its_check() {
        let results = run("ab");
        assert_eq!(results[0].status, Status::Passed);
        assert_eq!(results[1].status, Status::Failed);
        assert_eq!(results[1].message.as_deref(), Some("nope"));
    }

    #[test]
    fn test_setup_failure_fails_whole_group() {
        let results = run("");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == Status::Failed));
        assert!(results
            .iter()
            .all(|r| r.message.as_deref().unwrap_or("").starts_with("Setup failed")));
    }
}
