// SPDX-License-Identifier: PMPL-1.0-or-later
//! Result matchers for linter output.
//!
//! Each matcher turns a linter's native result into a pass flag plus a
//! diagnostic written for the student fixing the document.

use crate::lint::css::{FileResult, StyleLintResult};
use crate::lint::html::LintIssue;

/// Outcome of a matcher: whether it passed, and what to tell the reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub pass: bool,
    pub message: String,
}

/// Passes when the markup linter reported nothing
pub fn html_lint_results_contain_no_errors(issues: &[LintIssue]) -> MatchOutcome {
    if issues.is_empty() {
        return MatchOutcome {
            pass: true,
            message: "expected html to contain validity errors".to_string(),
        };
    }

    let message = issues
        .iter()
        .map(|issue| {
            format!(
                "Error: '{}' at line {}, column {}.\n",
                issue.rule, issue.line, issue.column
            )
        })
        .collect();

    MatchOutcome {
        pass: false,
        message,
    }
}

/// Passes when the stylesheet linter did not error; on failure the first
/// file's warnings are read back out of the JSON output
pub fn css_lint_results_contain_no_errors(result: &StyleLintResult) -> MatchOutcome {
    if !result.errored {
        return MatchOutcome {
            pass: true,
            message: "expected CSS to contain validity errors".to_string(),
        };
    }

    let message = match serde_json::from_str::<Vec<FileResult>>(&result.output) {
        Ok(files) => files
            .first()
            .map(|file| {
                file.warnings
                    .iter()
                    .map(|w| {
                        format!(
                            "{}: {}\n       At line {}, column {}.\n",
                            w.severity, w.text, w.line, w.column
                        )
                    })
                    .collect::<String>()
            })
            .unwrap_or_default(),
        Err(e) => format!("Unreadable stylesheet lint output: {}\n", e),
    };

    MatchOutcome {
        pass: false,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleLintConfig;
    use crate::lint::css::lint_source;

    fn style_result(css: &str) -> StyleLintResult {
        let file = lint_source(css, "css/style.css", &StyleLintConfig::default());
        StyleLintResult {
            errored: file.errored,
            output: serde_json::to_string(&vec![file.clone()]).unwrap(),
            results: vec![file],
        }
    }

    #[test]
    fn test_html_matcher_pass() {
        let outcome = html_lint_results_contain_no_errors(&[]);
        assert!(outcome.pass);
    }

    #[test]
    fn test_html_matcher_lists_every_issue() {
        let issues = vec![
            LintIssue {
                rule: "attr-bans".to_string(),
                line: 12,
                column: 5,
                message: String::new(),
            },
            LintIssue {
                rule: "html-req-lang".to_string(),
                line: 2,
                column: 1,
                message: String::new(),
            },
        ];
        let outcome = html_lint_results_contain_no_errors(&issues);
        assert!(!outcome.pass);
        assert_eq!(
            outcome.message,
            "Error: 'attr-bans' at line 12, column 5.\nError: 'html-req-lang' at line 2, column 1.\n"
        );
    }

    #[test]
    fn test_css_matcher_pass() {
        assert!(css_lint_results_contain_no_errors(&style_result("p { color: red; }\n")).pass);
    }

    #[test]
    fn test_css_matcher_formats_first_file() {
        let outcome = css_lint_results_contain_no_errors(&style_result(
            "p {\n  color: red;\n  color: blue;\n}\n",
        ));
        assert!(!outcome.pass);
        assert_eq!(
            outcome.message,
            "error: Unexpected duplicate \"color\" (declaration-block-no-duplicate-properties)\n       At line 3, column 3.\n"
        );
    }

    #[test]
    fn test_css_matcher_bad_output() {
        let result = StyleLintResult {
            errored: true,
            results: Vec::new(),
            output: "not json".to_string(),
        };
        let outcome = css_lint_results_contain_no_errors(&result);
        assert!(!outcome.pass);
        assert!(outcome.message.starts_with("Unreadable stylesheet lint output"));
    }
}
