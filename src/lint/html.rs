// SPDX-License-Identifier: PMPL-1.0-or-later
//! Markup linter
//!
//! Tokenizes the raw document (keeping line/column positions, which a DOM
//! parser throws away) and applies htmllint-style rules:
//! - `attr-bans`, `attr-no-dup`, `attr-name-style`, `attr-quote-style`, `attr-req-value`
//! - `class-no-dup`, `id-class-no-ad`, `id-class-style`, `id-no-dup`
//! - `doctype-first`, `doctype-html5`, `html-req-lang`, `head-req-title`
//! - `img-req-alt`, `img-req-src`, `input-radio-req-name`
//! - `spec-char-escape`
//! - `tag-bans`, `tag-close`, `tag-name-lowercase`, `tag-name-match`
//! - `title-max-len`, `title-no-dup`
//! - `line-end-style`, `line-no-trailing-whitespace`, `indent-style`, `indent-width`

use super::{advance, Cursor, Position};
use crate::config::{
    AttrNameStyle, IdClassStyle, IndentStyle, LineEndStyle, MarkupLintConfig, QuoteStyle,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Elements that never take an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is not markup
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Raw text elements whose content is not character data at all
const SCRIPT_ELEMENTS: &[&str] = &["script", "style"];

/// Attributes that are complete without a value
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls", "default",
    "defer", "disabled", "formnovalidate", "hidden", "inert", "ismap", "itemscope", "loop",
    "multiple", "muted", "nomodule", "novalidate", "open", "playsinline", "readonly",
    "required", "reversed", "selected",
];

/// A single markup rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIssue {
    /// htmllint rule name, e.g. "attr-bans"
    pub rule: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl LintIssue {
    fn new(rule: &str, pos: Position, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LintIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.rule, self.line, self.column
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Attribute {
    name: String,
    value: Option<String>,
    quote: Option<char>,
    pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
struct StartTag {
    raw_name: String,
    name: String,
    attrs: Vec<Attribute>,
    self_closing: bool,
    pos: Position,
}

impl StartTag {
    fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Doctype { body: String, pos: Position },
    Comment { pos: Position },
    Text { text: String, pos: Position },
    Start(StartTag),
    End { raw_name: String, name: String, pos: Position },
}

impl Token {
    fn pos(&self) -> Position {
        match self {
            Token::Doctype { pos, .. }
            | Token::Comment { pos }
            | Token::Text { pos, .. }
            | Token::End { pos, .. } => *pos,
            Token::Start(tag) => tag.pos,
        }
    }

    /// Comments and blank text do not count as the "first element"
    fn is_ignorable(&self) -> bool {
        match self {
            Token::Comment { .. } => true,
            Token::Text { text, .. } => text.trim().is_empty(),
            _ => false,
        }
    }
}

/// Lint document text against the given rule configuration
pub fn lint(source: &str, config: &MarkupLintConfig) -> Vec<LintIssue> {
    let tokens = tokenize(source);
    let mut issues = Vec::new();

    let patterns = Patterns::new(config);

    check_doctype(&tokens, config, &mut issues);
    check_elements(&tokens, config, &patterns, &mut issues);
    if config.spec_char_escape {
        check_text_escapes(&tokens, &patterns, &mut issues);
    }
    check_lines(source, config, &mut issues);

    issues.sort_by(|a, b| {
        (a.line, a.column, &a.rule).cmp(&(b.line, b.column, &b.rule))
    });

    debug!(tokens = tokens.len(), issues = issues.len(), "Markup lint complete");
    issues
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut cur = Cursor::new(source);
    let mut tokens = Vec::new();

    while !cur.is_eof() {
        let pos = cur.position();

        if cur.starts_with("<!--") {
            cur.bump_n(4);
            let _ = cur.take_until("-->", false);
            cur.bump_n(3);
            tokens.push(Token::Comment { pos });
        } else if cur.starts_with_ci("<!doctype") {
            cur.bump_n(2);
            let (body, _) = cur.take_until(">", false);
            cur.bump();
            tokens.push(Token::Doctype { body, pos });
        } else if cur.starts_with("</") && matches!(cur.peek_at(2), Some(c) if c.is_ascii_alphabetic()) {
            cur.bump_n(2);
            let raw_name = read_tag_name(&mut cur);
            let _ = cur.take_until(">", false);
            cur.bump();
            tokens.push(Token::End {
                name: raw_name.to_ascii_lowercase(),
                raw_name,
                pos,
            });
        } else if cur.peek() == Some('<') && matches!(cur.peek_at(1), Some(c) if c.is_ascii_alphabetic()) {
            let tag = read_start_tag(&mut cur, pos);
            let raw_text = !tag.self_closing && RAW_TEXT_ELEMENTS.contains(&tag.name.as_str());
            let closer = format!("</{}", tag.name);
            tokens.push(Token::Start(tag));

            if raw_text {
                let text_pos = cur.position();
                let (text, _) = cur.take_until(&closer, true);
                if !text.is_empty() {
                    tokens.push(Token::Text { text, pos: text_pos });
                }
            }
        } else if cur.starts_with("<!") || cur.starts_with("<?") {
            let _ = cur.take_until(">", false);
            cur.bump();
            tokens.push(Token::Comment { pos });
        } else {
            let mut text = String::new();
            // always consume one char so a stray '<' cannot stall the scan
            if let Some(c) = cur.bump() {
                text.push(c);
            }
            while let Some(c) = cur.peek() {
                if c == '<' {
                    break;
                }
                text.push(c);
                cur.bump();
            }
            tokens.push(Token::Text { text, pos });
        }
    }

    tokens
}

fn read_tag_name(cur: &mut Cursor) -> String {
    let mut name = String::new();
    while let Some(c) = cur.peek() {
        if c.is_whitespace() || c == '>' || c == '/' {
            break;
        }
        name.push(c);
        cur.bump();
    }
    name
}

fn read_start_tag(cur: &mut Cursor, pos: Position) -> StartTag {
    cur.bump();
    let raw_name = read_tag_name(cur);
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        cur.skip_whitespace();
        match cur.peek() {
            None => break,
            Some('>') => {
                cur.bump();
                break;
            }
            Some('/') => {
                cur.bump();
                if cur.peek() == Some('>') {
                    cur.bump();
                    self_closing = true;
                    break;
                }
                continue;
            }
            _ => {}
        }

        let attr_pos = cur.position();
        let mut name = String::new();
        while let Some(c) = cur.peek() {
            if c.is_whitespace() || c == '=' || c == '>' || (c == '/' && cur.peek_at(1) == Some('>')) {
                break;
            }
            name.push(c);
            cur.bump();
        }
        if name.is_empty() {
            // stray '=' or similar; skip it
            cur.bump();
            continue;
        }

        cur.skip_whitespace();
        let (value, quote) = if cur.peek() == Some('=') {
            cur.bump();
            cur.skip_whitespace();
            match cur.peek() {
                Some(q @ ('"' | '\'')) => {
                    cur.bump();
                    let (v, _) = cur.take_until(&q.to_string(), false);
                    cur.bump();
                    (Some(v), Some(q))
                }
                _ => {
                    let mut v = String::new();
                    while let Some(c) = cur.peek() {
                        if c.is_whitespace() || c == '>' {
                            break;
                        }
                        v.push(c);
                        cur.bump();
                    }
                    (Some(v), None)
                }
            }
        } else {
            (None, None)
        };

        attrs.push(Attribute {
            name,
            value,
            quote,
            pos: attr_pos,
        });
    }

    StartTag {
        name: raw_name.to_ascii_lowercase(),
        raw_name,
        attrs,
        self_closing,
        pos,
    }
}

fn check_doctype(tokens: &[Token], config: &MarkupLintConfig, issues: &mut Vec<LintIssue>) {
    if config.doctype_first {
        if let Some(first) = tokens.iter().find(|t| !t.is_ignorable()) {
            if !matches!(first, Token::Doctype { .. }) {
                issues.push(LintIssue::new(
                    "doctype-first",
                    first.pos(),
                    "The doctype must be the first element in the document",
                ));
            }
        }
    }

    if config.doctype_html5 {
        for token in tokens {
            if let Token::Doctype { body, pos } = token {
                let normalized = body
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_ascii_lowercase();
                if normalized != "doctype html" {
                    issues.push(LintIssue::new(
                        "doctype-html5",
                        *pos,
                        "The doctype must be the HTML5 doctype <!DOCTYPE html>",
                    ));
                }
            }
        }
    }
}

/// Compiled name patterns shared by the attribute rules
struct Patterns {
    attr_dash: Regex,
    id_class: Option<Regex>,
    ad: Regex,
    entity: Regex,
}

impl Patterns {
    fn new(config: &MarkupLintConfig) -> Self {
        let id_class = match config.id_class_style {
            IdClassStyle::Off => None,
            IdClassStyle::Underscore => Some(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$"),
            IdClassStyle::Dash => Some(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$"),
            IdClassStyle::Camel => Some(r"^[a-z][a-zA-Z0-9]*$"),
        };
        Self {
            attr_dash: Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid regex"),
            id_class: id_class.map(|p| Regex::new(p).expect("valid regex")),
            ad: Regex::new(r"(?i)(^|[^a-z0-9])(ad|banner|sponsor)([^a-z0-9]|$)")
                .expect("valid regex"),
            entity: Regex::new(r"^&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
                .expect("valid regex"),
        }
    }
}

/// Byte offsets of `<`, `>` and of `&` not starting a character reference
fn unescaped_chars(entity: &Regex, text: &str) -> Vec<usize> {
    text.char_indices()
        .filter(|(i, c)| match c {
            '<' | '>' => true,
            '&' => !entity.is_match(&text[*i..]),
            _ => false,
        })
        .map(|(i, _)| i)
        .collect()
}

fn check_text_escapes(tokens: &[Token], patterns: &Patterns, issues: &mut Vec<LintIssue>) {
    let mut in_script = false;

    for token in tokens {
        match token {
            Token::Start(tag) => {
                in_script = !tag.self_closing && SCRIPT_ELEMENTS.contains(&tag.name.as_str());
            }
            Token::Text { text, pos } if !in_script => {
                for offset in unescaped_chars(&patterns.entity, text) {
                    issues.push(LintIssue::new(
                        "spec-char-escape",
                        advance(*pos, &text[..offset]),
                        "Special characters must be escaped",
                    ));
                }
            }
            _ => in_script = false,
        }
    }
}

fn check_elements(
    tokens: &[Token],
    config: &MarkupLintConfig,
    patterns: &Patterns,
    issues: &mut Vec<LintIssue>,
) {
    let mut ids = HashSet::new();
    // (lowercase name, name as written, position)
    let mut open: Vec<(String, String, Position)> = Vec::new();
    let mut head_pos = None;
    let mut head_has_title = false;
    let mut title_count = 0;

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Start(tag) => {
                let name = tag.name.as_str();

                if config.tag_name_lowercase && tag.raw_name != tag.name {
                    issues.push(LintIssue::new(
                        "tag-name-lowercase",
                        tag.pos,
                        format!("Tag name <{}> must be lowercase", tag.raw_name),
                    ));
                }

                if config.tag_bans.iter().any(|b| b.eq_ignore_ascii_case(name)) {
                    issues.push(LintIssue::new(
                        "tag-bans",
                        tag.pos,
                        format!("The <{}> tag is banned", name),
                    ));
                }

                check_attributes(tag, config, patterns, &mut ids, issues);

                match name {
                    "html" if config.html_req_lang => {
                        let has_lang = tag
                            .attr("lang")
                            .and_then(|a| a.value.as_deref())
                            .map(|v| !v.trim().is_empty())
                            .unwrap_or(false);
                        if !has_lang {
                            issues.push(LintIssue::new(
                                "html-req-lang",
                                tag.pos,
                                "The <html> tag requires a lang attribute",
                            ));
                        }
                    }
                    "input" if config.input_radio_req_name => {
                        let is_radio = tag
                            .attr("type")
                            .and_then(|a| a.value.as_deref())
                            .map(|v| v.trim().eq_ignore_ascii_case("radio"))
                            .unwrap_or(false);
                        let has_name = tag
                            .attr("name")
                            .and_then(|a| a.value.as_deref())
                            .map(|v| !v.trim().is_empty())
                            .unwrap_or(false);
                        if is_radio && !has_name {
                            issues.push(LintIssue::new(
                                "input-radio-req-name",
                                tag.pos,
                                "Radio inputs require a non-empty name",
                            ));
                        }
                    }
                    "img" => {
                        if config.img_req_alt && tag.attr("alt").is_none() {
                            issues.push(LintIssue::new(
                                "img-req-alt",
                                tag.pos,
                                "The <img> tag requires an alt attribute",
                            ));
                        }
                        let has_src = tag
                            .attr("src")
                            .and_then(|a| a.value.as_deref())
                            .map(|v| !v.trim().is_empty())
                            .unwrap_or(false);
                        if config.img_req_src && !has_src {
                            issues.push(LintIssue::new(
                                "img-req-src",
                                tag.pos,
                                "The <img> tag requires a non-empty src attribute",
                            ));
                        }
                    }
                    "head" => head_pos = Some(tag.pos),
                    "title" => {
                        title_count += 1;
                        if open.iter().any(|(n, _, _)| n == "head") {
                            head_has_title = true;
                        }
                        if config.title_no_dup && title_count > 1 {
                            issues.push(LintIssue::new(
                                "title-no-dup",
                                tag.pos,
                                "The document may only have one <title>",
                            ));
                        }
                        if config.title_max_len > 0 {
                            if let Some(Token::Text { text, .. }) = tokens.get(idx + 1) {
                                let len = text.trim().chars().count();
                                if len > config.title_max_len {
                                    issues.push(LintIssue::new(
                                        "title-max-len",
                                        tag.pos,
                                        format!(
                                            "Title is {} characters long; at most {} allowed",
                                            len, config.title_max_len
                                        ),
                                    ));
                                }
                            }
                        }
                    }
                    _ => {}
                }

                if !tag.self_closing && !VOID_ELEMENTS.contains(&name) {
                    open.push((tag.name.clone(), tag.raw_name.clone(), tag.pos));
                }
            }
            Token::End { raw_name, name, pos } => {
                if config.tag_name_lowercase && raw_name != name {
                    issues.push(LintIssue::new(
                        "tag-name-lowercase",
                        *pos,
                        format!("Tag name </{}> must be lowercase", raw_name),
                    ));
                }

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }

                match open.iter().rposition(|(n, _, _)| n == name) {
                    Some(at) => {
                        if config.tag_name_match && open[at].1 != *raw_name {
                            issues.push(LintIssue::new(
                                "tag-name-match",
                                *pos,
                                format!(
                                    "End tag </{}> does not match start tag <{}>",
                                    raw_name, open[at].1
                                ),
                            ));
                        }
                        let unclosed: Vec<_> = open.drain(at + 1..).collect();
                        open.pop();
                        if config.tag_close {
                            for (tag, _, tag_pos) in unclosed {
                                issues.push(unclosed_issue(&tag, tag_pos));
                            }
                        }
                    }
                    None if config.tag_close => {
                        issues.push(LintIssue::new(
                            "tag-close",
                            *pos,
                            format!("End tag </{}> has no matching start tag", name),
                        ));
                    }
                    None => {}
                }
            }
            _ => {}
        }
    }

    if config.tag_close {
        for (tag, _, pos) in open {
            issues.push(unclosed_issue(&tag, pos));
        }
    }

    if config.head_req_title {
        if let Some(pos) = head_pos {
            if !head_has_title {
                issues.push(LintIssue::new(
                    "head-req-title",
                    pos,
                    "The <head> tag must contain a <title>",
                ));
            }
        }
    }
}

fn unclosed_issue(tag: &str, pos: Position) -> LintIssue {
    LintIssue::new("tag-close", pos, format!("Tag <{}> is not closed", tag))
}

fn check_attributes(
    tag: &StartTag,
    config: &MarkupLintConfig,
    patterns: &Patterns,
    ids: &mut HashSet<String>,
    issues: &mut Vec<LintIssue>,
) {
    let mut seen = HashSet::new();

    for attr in &tag.attrs {
        let lower = attr.name.to_ascii_lowercase();

        if config.attr_bans.iter().any(|b| b.eq_ignore_ascii_case(&lower)) {
            issues.push(LintIssue::new(
                "attr-bans",
                attr.pos,
                format!("The \"{}\" attribute is banned", lower),
            ));
        }

        if config.attr_no_dup && !seen.insert(lower.clone()) {
            issues.push(LintIssue::new(
                "attr-no-dup",
                attr.pos,
                format!("The \"{}\" attribute is repeated", lower),
            ));
        }

        let name_ok = match config.attr_name_style {
            AttrNameStyle::Off => true,
            AttrNameStyle::Dash => patterns.attr_dash.is_match(&attr.name),
            AttrNameStyle::Lowercase => !attr.name.chars().any(char::is_uppercase),
        };
        if !name_ok {
            issues.push(LintIssue::new(
                "attr-name-style",
                attr.pos,
                format!("Attribute name \"{}\" does not match the naming style", attr.name),
            ));
        }

        if attr.value.is_some() {
            let quote_ok = match config.attr_quote_style {
                QuoteStyle::Off => true,
                QuoteStyle::Double => attr.quote == Some('"'),
                QuoteStyle::Single => attr.quote == Some('\''),
                QuoteStyle::Quoted => attr.quote.is_some(),
            };
            if !quote_ok {
                issues.push(LintIssue::new(
                    "attr-quote-style",
                    attr.pos,
                    format!("Value of \"{}\" is not quoted in the required style", attr.name),
                ));
            }
        }

        let value = match attr.value.as_deref() {
            Some(value) => value,
            None => {
                if config.attr_req_value && !BOOLEAN_ATTRIBUTES.contains(&lower.as_str()) {
                    issues.push(LintIssue::new(
                        "attr-req-value",
                        attr.pos,
                        format!("The \"{}\" attribute requires a value", lower),
                    ));
                }
                continue;
            }
        };

        if config.spec_char_escape && !unescaped_chars(&patterns.entity, value).is_empty() {
            issues.push(LintIssue::new(
                "spec-char-escape",
                attr.pos,
                format!("Special characters in \"{}\" must be escaped", lower),
            ));
        }

        if lower == "id" || lower == "class" {
            check_id_class(&lower, value, attr.pos, config, patterns, issues);
        }

        if config.id_no_dup && lower == "id" {
            if let Some(value) = attr.value.as_deref().filter(|v| !v.is_empty()) {
                if !ids.insert(value.to_string()) {
                    issues.push(LintIssue::new(
                        "id-no-dup",
                        attr.pos,
                        format!("The id \"{}\" is already in use", value),
                    ));
                }
            }
        }
    }
}

fn check_id_class(
    attr: &str,
    value: &str,
    pos: Position,
    config: &MarkupLintConfig,
    patterns: &Patterns,
    issues: &mut Vec<LintIssue>,
) {
    let names: Vec<&str> = if attr == "class" {
        value.split_whitespace().collect()
    } else {
        vec![value.trim()]
    };

    if config.class_no_dup && attr == "class" {
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(*name) {
                issues.push(LintIssue::new(
                    "class-no-dup",
                    pos,
                    format!("The class \"{}\" is repeated", name),
                ));
            }
        }
    }

    for name in names.iter().filter(|n| !n.is_empty()) {
        if let Some(style) = &patterns.id_class {
            if !style.is_match(name) {
                issues.push(LintIssue::new(
                    "id-class-style",
                    pos,
                    format!("The {} \"{}\" does not match the naming style", attr, name),
                ));
            }
        }
        if config.id_class_no_ad && patterns.ad.is_match(name) {
            issues.push(LintIssue::new(
                "id-class-no-ad",
                pos,
                format!("The {} \"{}\" may be hidden by ad blockers", attr, name),
            ));
        }
    }
}

/// Split source into lines, remembering which terminator ended each one
fn split_lines(source: &str) -> Vec<(String, Option<LineEndStyle>)> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                let ending = if chars.peek() == Some(&'\n') {
                    chars.next();
                    LineEndStyle::Crlf
                } else {
                    LineEndStyle::Cr
                };
                lines.push((std::mem::take(&mut current), Some(ending)));
            }
            '\n' => lines.push((std::mem::take(&mut current), Some(LineEndStyle::Lf))),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        lines.push((current, None));
    }

    lines
}

fn check_lines(source: &str, config: &MarkupLintConfig, issues: &mut Vec<LintIssue>) {
    for (idx, (content, ending)) in split_lines(source).iter().enumerate() {
        let line = idx + 1;

        if config.line_end_style != LineEndStyle::Off {
            if let Some(ending) = ending {
                if *ending != config.line_end_style {
                    issues.push(LintIssue::new(
                        "line-end-style",
                        Position::new(line, content.chars().count() + 1),
                        format!("Line ending must be {:?}", config.line_end_style).to_lowercase(),
                    ));
                }
            }
        }

        if config.line_no_trailing_whitespace {
            let trimmed = content.trim_end_matches([' ', '\t']);
            if trimmed.len() != content.len() {
                issues.push(LintIssue::new(
                    "line-no-trailing-whitespace",
                    Position::new(line, trimmed.chars().count() + 1),
                    "Lines must not end with whitespace",
                ));
            }
        }

        let indent: String = content
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        if indent.is_empty() || indent.len() == content.len() {
            continue;
        }

        let has_tabs = indent.contains('\t');
        let has_spaces = indent.contains(' ');
        let style_ok = match config.indent_style {
            IndentStyle::Off => true,
            IndentStyle::Tabs => !has_spaces,
            IndentStyle::Spaces => !has_tabs,
            IndentStyle::Nonmixed => !(has_tabs && has_spaces),
        };
        if !style_ok {
            issues.push(LintIssue::new(
                "indent-style",
                Position::new(line, 1),
                format!("Indentation does not follow the {:?} style", config.indent_style)
                    .to_lowercase(),
            ));
        }

        if config.indent_width > 0 && !has_tabs && indent.len() % config.indent_width != 0 {
            issues.push(LintIssue::new(
                "indent-width",
                Position::new(line, 1),
                format!(
                    "Indentation must be a multiple of {} spaces",
                    config.indent_width
                ),
            ));
        }
    }
}
