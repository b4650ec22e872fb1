// SPDX-License-Identifier: PMPL-1.0-or-later
//! "Has required HTML": structural assertions on the parsed document.
//!
//! Every check is a presence or count query on the DOM; none depends on
//! another's outcome.

use super::assert::{
    expect_any, expect_at_least, expect_eq, expect_ne, expect_text, CheckOutcome,
};
use super::{select, text_of, Check, CheckContext, CheckGroup};
use crate::error::Result;
use regex::Regex;
use scraper::Html;
use tracing::debug;

pub const GROUP: &str = "Has required HTML";

/// Structural checks over the document as written
pub struct StructureChecks;

impl CheckGroup for StructureChecks {
    type State = Html;

    fn name(&self) -> &'static str {
        GROUP
    }

    fn setup(&self, ctx: &CheckContext) -> Result<Html> {
        let html = Html::parse_document(ctx.document.source());
        debug!(parse_errors = html.errors.len(), "Parsed document");
        Ok(html)
    }

    fn checks(&self) -> Vec<Check<Html>> {
        vec![
            Check::new("Specifies charset", specifies_charset),
            Check::new("Includes page title", includes_page_title),
            Check::new("Includes author metadata", includes_author_metadata),
            Check::new("Has a top-level heading", has_top_level_heading),
            Check::new("Has an image", has_an_image),
            Check::new("Includes a paragraph", includes_a_paragraph),
            Check::new("Includes a hyperlink in the paragraph", includes_a_hyperlink),
            Check::new("Includes a list", includes_a_list),
            Check::new("List has at least 3 items", list_has_enough_items),
        ]
    }
}

fn specifies_charset(html: &Html, _ctx: &CheckContext) -> CheckOutcome {
    expect_eq(
        "number of <meta charset> declarations",
        1,
        select(html, "meta[charset]").len(),
    )
}

fn includes_page_title(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let titles = select(html, "head > title");
    expect_eq("number of <title> elements in <head>", 1, titles.len())?;

    let text = text_of(&titles[0]);
    expect_text("page title", &text)?;
    expect_ne(
        "page title",
        ctx.config.expectations.title_placeholder.as_str(),
        text.trim(),
    )
}

fn includes_author_metadata(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let authors = select(html, r#"head > meta[name="author"]"#);
    expect_eq("number of author <meta> tags in <head>", 1, authors.len())?;

    let content = authors[0].value().attr("content").unwrap_or("");
    expect_text("author metadata content", content)?;
    expect_ne(
        "author metadata content",
        ctx.config.expectations.author_placeholder.as_str(),
        content.trim(),
    )
}

fn has_top_level_heading(html: &Html, _ctx: &CheckContext) -> CheckOutcome {
    let headings = select(html, "h1");
    expect_eq("number of <h1> elements", 1, headings.len())?;
    expect_text("<h1> text", &text_of(&headings[0]))
}

fn has_an_image(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let images = select(html, "img");
    expect_at_least("number of <img> elements", 1, images.len())?;

    let prefix = ctx.config.expectations.image_prefix.as_str();
    let sources: Vec<&str> = images
        .iter()
        .map(|img| img.value().attr("src").unwrap_or(""))
        .collect();
    expect_any(
        "<img> src",
        &format!("an src starting with {:?}", prefix),
        &sources,
        |src| src.starts_with(prefix),
    )
}

fn includes_a_paragraph(html: &Html, _ctx: &CheckContext) -> CheckOutcome {
    let paragraphs = select(html, "p");
    expect_at_least("number of <p> elements", 1, paragraphs.len())?;

    let texts: Vec<String> = paragraphs.iter().map(text_of).collect();
    expect_any("<p> text", "a paragraph with text", &texts, |t| {
        !t.trim().is_empty()
    })
}

fn includes_a_hyperlink(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let links = select(html, "p a");
    expect_at_least("number of <a> elements inside a <p>", 1, links.len())?;

    let pattern = Regex::new(&ctx.config.expectations.link_pattern)?;
    let targets: Vec<&str> = links
        .iter()
        .map(|a| a.value().attr("href").unwrap_or(""))
        .collect();
    expect_any(
        "<a> href",
        &format!("an href matching /{}/", pattern.as_str()),
        &targets,
        |href| pattern.is_match(href),
    )
}

fn includes_a_list(html: &Html, _ctx: &CheckContext) -> CheckOutcome {
    expect_at_least(
        "number of <ul> or <ol> elements",
        1,
        select(html, "ul, ol").len(),
    )
}

fn list_has_enough_items(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let items = select(html, "ul > li, ol > li");
    expect_at_least(
        "number of list items",
        ctx.config.expectations.min_list_items,
        items.len(),
    )?;

    let empty = items
        .iter()
        .filter(|li| text_of(li).trim().is_empty())
        .count();
    expect_eq("number of empty list items", 0, empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::run_group;
    use crate::config::Config;
    use crate::document::Document;
    use crate::results::{CheckResult, Status};
    use std::path::PathBuf;

    const COMPLETE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="author" content="Grace Hopper">
  <title>Compilers I Have Known</title>
</head>
<body>
  <h1>Compilers</h1>
  <img src="img/mark1.jpg" alt="The Harvard Mark I">
  <p>Read more <a href="https://en.wikipedia.org/wiki/Compiler">here</a>.</p>
  <ol>
    <li>A-0</li>
    <li>FLOW-MATIC</li>
    <li>COBOL</li>
  </ol>
</body>
</html>
"#;

    fn run(source: &str) -> Vec<CheckResult> {
        let document = Document::from_source("index.html", source).unwrap();
        let config = Config::default();
        let ctx = CheckContext {
            document: &document,
            config: &config,
            stylesheet: PathBuf::from("css/style.css"),
        };
        run_group(&StructureChecks, &ctx)
    }

    fn status(results: &[CheckResult], name: &str) -> Status {
        results
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.status)
            .expect("check exists")
    }

    #[test]
    fn test_complete_document_passes() {
        let results = run(COMPLETE);
        let failed: Vec<_> = results.iter().filter(|r| r.is_failure()).collect();
        assert!(failed.is_empty(), "unexpected failures: {:?}", failed);
        assert_eq!(results.len(), 9);
    }

    #[test]
    fn test_charset_count() {
        let none = COMPLETE.replace("  <meta charset=\"utf-8\">\n", "");
        assert_eq!(status(&run(&none), "Specifies charset"), Status::Failed);

        let two = COMPLETE.replace(
            "<meta charset=\"utf-8\">",
            "<meta charset=\"utf-8\"><meta charset=\"utf-8\">",
        );
        assert_eq!(status(&run(&two), "Specifies charset"), Status::Failed);
    }

    #[test]
    fn test_placeholder_title_fails() {
        let html = COMPLETE.replace("Compilers I Have Known", "My Page Title");
        let results = run(&html);
        assert_eq!(status(&results, "Includes page title"), Status::Failed);
        let message = results
            .iter()
            .find(|r| r.name == "Includes page title")
            .and_then(|r| r.message.clone())
            .unwrap_or_default();
        assert!(message.contains("Expected: not \"My Page Title\""));
    }

    #[test]
    fn test_placeholder_or_missing_author_fails() {
        let html = COMPLETE.replace("Grace Hopper", "your name");
        assert_eq!(status(&run(&html), "Includes author metadata"), Status::Failed);

        let html = COMPLETE.replace(" content=\"Grace Hopper\"", "");
        assert_eq!(status(&run(&html), "Includes author metadata"), Status::Failed);
    }

    #[test]
    fn test_two_headings_fail() {
        let html = COMPLETE.replace("<h1>Compilers</h1>", "<h1>A</h1><h1>B</h1>");
        assert_eq!(status(&run(&html), "Has a top-level heading"), Status::Failed);
    }

    #[test]
    fn test_image_outside_prefix_fails() {
        let html = COMPLETE.replace("img/mark1.jpg", "pictures/mark1.jpg");
        assert_eq!(status(&run(&html), "Has an image"), Status::Failed);

        let html = COMPLETE.replace("img/mark1.jpg", "images/img/mark1.jpg");
        assert_eq!(status(&run(&html), "Has an image"), Status::Failed);
    }

    #[test]
    fn test_relative_link_fails() {
        let html = COMPLETE.replace("https://en.wikipedia.org/wiki/Compiler", "about.html");
        assert_eq!(
            status(&run(&html), "Includes a hyperlink in the paragraph"),
            Status::Failed
        );
    }

    #[test]
    fn test_link_outside_paragraph_fails() {
        let html = COMPLETE.replace(
            "<p>Read more <a href=\"https://en.wikipedia.org/wiki/Compiler\">here</a>.</p>",
            "<p>Read more.</p><a href=\"https://example.com\">here</a>",
        );
        let results = run(&html);
        assert_eq!(status(&results, "Includes a paragraph"), Status::Passed);
        assert_eq!(
            status(&results, "Includes a hyperlink in the paragraph"),
            Status::Failed
        );
    }

    #[test]
    fn test_list_item_counts() {
        let two = COMPLETE.replace("    <li>COBOL</li>\n", "");
        let results = run(&two);
        assert_eq!(status(&results, "Includes a list"), Status::Passed);
        assert_eq!(status(&results, "List has at least 3 items"), Status::Failed);

        let with_empty = COMPLETE.replace("<li>COBOL</li>", "<li> </li>");
        assert_eq!(
            status(&run(&with_empty), "List has at least 3 items"),
            Status::Failed
        );
    }

    #[test]
    fn test_nested_items_do_not_count() {
        let html = COMPLETE.replace(
            "<ol>\n    <li>A-0</li>\n    <li>FLOW-MATIC</li>\n    <li>COBOL</li>\n  </ol>",
            "<div><li>A-0</li><li>FLOW-MATIC</li><li>COBOL</li></div>",
        );
        let results = run(&html);
        assert_eq!(status(&results, "Includes a list"), Status::Failed);
        assert_eq!(status(&results, "List has at least 3 items"), Status::Failed);
    }
}
