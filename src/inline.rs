// SPDX-License-Identifier: PMPL-1.0-or-later
//! Style inlining and computed-style lookup.
//!
//! Linked stylesheets are resolved against the document's own `file://`
//! directory, read from disk and merged into per-element `style` attributes
//! with `css-inline`. The `<link>` tag is kept so the link itself can still
//! be asserted on.

use crate::document::Document;
use crate::error::{GradeError, Result};
use css_inline::CSSInliner;
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;
use tracing::debug;

/// Inline the document's stylesheets into element style attributes
pub fn inline_styles(document: &Document) -> Result<String> {
    let css = linked_stylesheets(document)?;

    let inliner = CSSInliner::options()
        .load_remote_stylesheets(false)
        .keep_link_tags(true)
        .extra_css(Some(Cow::Owned(css)))
        .build();

    let inlined = inliner.inline(document.source())?;
    debug!(
        base_url = %document.base_url(),
        bytes = inlined.len(),
        "Inlined stylesheet"
    );
    Ok(inlined)
}

/// Text of every local stylesheet the document links, in document order.
///
/// Each href is resolved to a URL and turned back into a filesystem path,
/// so percent-encoded directory names read the real file. Non-`file` links
/// are skipped.
fn linked_stylesheets(document: &Document) -> Result<String> {
    let html = Html::parse_document(document.source());
    let selector = Selector::parse(r#"link[rel~="stylesheet"][href]"#).expect("valid selector");

    let mut css = String::new();
    for link in html.select(&selector) {
        let href = link.value().attr("href").unwrap_or("");
        let url = document.base_url().join(href)?;
        if url.scheme() != "file" {
            debug!(%url, "Skipping non-local stylesheet");
            continue;
        }

        let path = url
            .to_file_path()
            .map_err(|_| GradeError::MissingFile(url.to_string()))?;
        if !path.is_file() {
            return Err(GradeError::MissingFile(path.display().to_string()));
        }

        debug!(path = %path.display(), "Loading stylesheet");
        css.push_str(&std::fs::read_to_string(&path)?);
        css.push('\n');
    }

    Ok(css)
}

/// Parse a `style` attribute into ordered (property, value) pairs.
///
/// Property names are lowercased and `!important` is dropped from values.
pub fn parse_style_attribute(style: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    let mut flush = |raw: &mut String| {
        if let Some((property, value)) = raw.split_once(':') {
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            let value = strip_important(value);
            if !property.is_empty() {
                declarations.push((property, value.to_string()));
            }
        }
        raw.clear();
    };

    for c in style.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                flush(&mut current);
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    flush(&mut current);

    declarations
}

/// Drop a trailing `!important`, in any letter case
fn strip_important(value: &str) -> &str {
    const FLAG: &str = "!important";
    let split = value.len().saturating_sub(FLAG.len());
    match (value.get(..split), value.get(split..)) {
        (Some(rest), Some(tail)) if tail.eq_ignore_ascii_case(FLAG) => rest.trim_end(),
        _ => value,
    }
}

/// Computed value of `property` on an element after inlining; the last
/// declaration wins, as in the cascade
pub fn style_value(element: &ElementRef, property: &str) -> Option<String> {
    let style = element.value().attr("style")?;
    parse_style_attribute(style)
        .into_iter()
        .rev()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_parse_style_attribute() {
        let decls = parse_style_attribute(
            "font-size: 16px;font-family: \"Helvetica Neue\", Arial; background: url(a;b.png) ;COLOR: red !important",
        );
        assert_eq!(
            decls,
            vec![
                ("font-size".to_string(), "16px".to_string()),
                ("font-family".to_string(), "\"Helvetica Neue\", Arial".to_string()),
                ("background".to_string(), "url(a;b.png)".to_string()),
                ("color".to_string(), "red".to_string()),
            ]
        );
    }

    #[test]
    fn test_important_flag_any_case() {
        let decls = parse_style_attribute("color: red !IMPORTANT; margin: 0 !Important");
        assert_eq!(
            decls,
            vec![
                ("color".to_string(), "red".to_string()),
                ("margin".to_string(), "0".to_string()),
            ]
        );
        assert_eq!(strip_important("é"), "é");
    }

    #[test]
    fn test_style_value_last_wins() {
        let html = Html::parse_document(r#"<p style="line-height: 1.2; line-height: 1.5">x</p>"#);
        let sel = Selector::parse("p").expect("valid selector");
        let p = html.select(&sel).next().expect("paragraph");
        assert_eq!(style_value(&p, "line-height").as_deref(), Some("1.5"));
        assert_eq!(style_value(&p, "color"), None);
    }

    #[test]
    fn test_inline_resolves_relative_stylesheet() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("css")).unwrap();
        std::fs::write(temp.path().join("css/style.css"), "p { color: red; }").unwrap();
        let index = temp.path().join("index.html");
        std::fs::write(
            &index,
            r#"<html><head><link rel="stylesheet" href="css/style.css"></head><body><p>x</p></body></html>"#,
        )
        .unwrap();

        let doc = Document::load(&index).unwrap();
        let inlined = inline_styles(&doc).unwrap();
        let html = Html::parse_document(&inlined);

        let p_sel = Selector::parse("p").expect("valid selector");
        let p = html.select(&p_sel).next().expect("paragraph");
        assert_eq!(style_value(&p, "color").as_deref(), Some("red"));

        let link_sel = Selector::parse("head > link").expect("valid selector");
        assert_eq!(html.select(&link_sel).count(), 1);
    }

    #[test]
    fn test_inline_from_directory_needing_url_encoding() {
        let temp = tempfile::TempDir::new().unwrap();
        for name in ["Jane Doe", "José"] {
            let root = temp.path().join(name);
            std::fs::create_dir_all(root.join("css")).unwrap();
            std::fs::write(root.join("css/style.css"), "p { color: red; }").unwrap();
            let index = root.join("index.html");
            std::fs::write(
                &index,
                r#"<html><head><link rel="stylesheet" href="css/style.css"></head><body><p>x</p></body></html>"#,
            )
            .unwrap();

            let doc = Document::load(&index).unwrap();
            assert!(doc.base_url().as_str().contains('%'));
            let inlined = inline_styles(&doc).unwrap();
            let html = Html::parse_document(&inlined);

            let p_sel = Selector::parse("p").expect("valid selector");
            let p = html.select(&p_sel).next().expect("paragraph");
            assert_eq!(style_value(&p, "color").as_deref(), Some("red"), "{}", name);
        }
    }

    #[test]
    fn test_missing_linked_stylesheet_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let index = temp.path().join("index.html");
        std::fs::write(
            &index,
            r#"<html><head><link rel="stylesheet" href="css/style.css"></head><body></body></html>"#,
        )
        .unwrap();

        let doc = Document::load(&index).unwrap();
        let err = inline_styles(&doc).unwrap_err();
        assert!(matches!(err, GradeError::MissingFile(_)));
    }
}
