// SPDX-License-Identifier: PMPL-1.0-or-later
//! "Has required CSS": computed-style assertions.
//!
//! Setup inlines the linked stylesheet into `style` attributes and parses the
//! result, so each check reads the effective value straight off the element.

use super::assert::{
    expect_at_least, expect_contains, expect_defined, expect_eq, expect_match, CheckOutcome,
};
use super::{select, Check, CheckContext, CheckGroup};
use crate::error::Result;
use crate::inline::{inline_styles, style_value};
use regex::Regex;
use scraper::Html;

pub const GROUP: &str = "Has required CSS";

pub struct StyleChecks;

impl CheckGroup for StyleChecks {
    type State = Html;

    fn name(&self) -> &'static str {
        GROUP
    }

    fn setup(&self, ctx: &CheckContext) -> Result<Html> {
        let inlined = inline_styles(ctx.document)?;
        Ok(Html::parse_document(&inlined))
    }

    fn checks(&self) -> Vec<Check<Html>> {
        vec![
            Check::new("Links in local stylesheet", links_local_stylesheet),
            Check::new("Body has default font size", body_font_size),
            Check::new("Body has default font family", body_font_family),
            Check::new("Paragraphs have specified line height", paragraph_line_height),
            Check::new("Images have constrained height", image_max_height),
            Check::new("Important list item is colored", important_item_colored),
        ]
    }
}

fn links_local_stylesheet(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let links = select(html, "head > link");
    expect_eq("number of <link> elements in <head>", 1, links.len())?;
    expect_eq(
        "<link> href",
        Some(ctx.config.expectations.stylesheet_href.as_str()),
        links[0].value().attr("href"),
    )
}

/// Computed value of `property` on the first element matching `selector`
fn first_style(html: &Html, selector: &str, property: &str) -> Option<String> {
    select(html, selector)
        .first()
        .and_then(|el| style_value(el, property))
}

fn body_font_size(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let size = first_style(html, "body", "font-size");
    let size = expect_defined("body font-size", size.as_deref())?;
    expect_eq(
        "body font-size",
        ctx.config.expectations.body_font_size.as_str(),
        size,
    )
}

fn body_font_family(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let family = first_style(html, "body", "font-family");
    let family = expect_defined("body font-family", family.as_deref())?;
    let pattern = Regex::new(&ctx.config.expectations.body_font_family)?;
    expect_match("body font-family", &pattern, &family.replace('"', "'"))
}

fn paragraph_line_height(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let paragraphs = select(html, "p");
    expect_at_least("number of <p> elements", 1, paragraphs.len())?;

    let expected = ctx.config.expectations.paragraph_line_height.as_str();
    for p in &paragraphs {
        let height = style_value(p, "line-height");
        let height = expect_defined("<p> line-height", height.as_deref())?;
        expect_contains("<p> line-height", expected, height)?;
        expect_eq("<p> id attribute", None, p.value().attr("id"))?;
        expect_eq("<p> class attribute", None, p.value().attr("class"))?;
    }
    Ok(())
}

fn image_max_height(html: &Html, ctx: &CheckContext) -> CheckOutcome {
    let images = select(html, "img");
    expect_at_least("number of <img> elements", 1, images.len())?;

    let expected = ctx.config.expectations.image_max_height.as_str();
    for img in &images {
        let height = style_value(img, "max-height");
        let height = expect_defined("<img> max-height", height.as_deref())?;
        expect_eq("<img> max-height", expected, height)?;
    }
    Ok(())
}

fn important_item_colored(html: &Html, _ctx: &CheckContext) -> CheckOutcome {
    let items = select(html, "li[class]");
    expect_eq("number of <li> elements with a class", 1, items.len())?;

    let color = style_value(&items[0], "color");
    expect_defined("classed <li> color", color.as_deref())?;
    Ok(())
}
