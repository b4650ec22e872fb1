// SPDX-License-Identifier: PMPL-1.0-or-later
//! "Source code is valid": both source files must lint clean.

use super::assert::{CheckOutcome, Failure};
use super::{Check, CheckContext, CheckGroup};
use crate::error::Result;
use crate::lint::{css, html};
use crate::matchers::{
    css_lint_results_contain_no_errors, html_lint_results_contain_no_errors, MatchOutcome,
};
use tracing::info;

pub const GROUP: &str = "Source code is valid";

/// Markup and stylesheet lint checks
pub struct ValidityChecks;

impl CheckGroup for ValidityChecks {
    type State = ();

    fn name(&self) -> &'static str {
        GROUP
    }

    fn setup(&self, _ctx: &CheckContext) -> Result<()> {
        Ok(())
    }

    fn checks(&self) -> Vec<Check<()>> {
        vec![
            Check::new("HTML validates without errors", html_validates),
            Check::new("CSS validates without errors", css_validates),
        ]
    }
}

fn into_outcome(matched: MatchOutcome) -> CheckOutcome {
    if matched.pass {
        Ok(())
    } else {
        Err(Failure::Diagnostics(matched.message))
    }
}

fn html_validates(_: &(), ctx: &CheckContext) -> CheckOutcome {
    let issues = html::lint(ctx.document.source(), &ctx.config.markup_lint);
    info!(
        document = %ctx.document.path().display(),
        issues = issues.len(),
        "Markup lint complete"
    );
    into_outcome(html_lint_results_contain_no_errors(&issues))
}

fn css_validates(_: &(), ctx: &CheckContext) -> CheckOutcome {
    let result = css::lint_files(&[ctx.stylesheet.clone()], &ctx.config.style_lint)?;
    into_outcome(css_lint_results_contain_no_errors(&result))
}
