// SPDX-License-Identifier: PMPL-1.0-or-later
//! Stylesheet linter
//!
//! A small position-tracking CSS reader (comments, strings, rule blocks,
//! nested at-rules) feeding stylelint-named rules. Results serialize to the
//! same JSON shape stylelint's `json` formatter produces, so the matcher can
//! consume either.

use super::{advance, Cursor, Position};
use crate::config::{RuleSeverity, StyleLintConfig, STYLE_RULES};
use crate::error::{GradeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// At-rules whose block holds declarations rather than rules
const DECLARATION_AT_RULES: &[&str] = &["font-face", "page", "counter-style", "property", "viewport"];

const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "math",
    "emoji",
    "fangsong",
];

const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

const KNOWN_UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "rex", "ch", "rch", "cap", "rcap", "ic", "ric", "lh", "rlh", "vw",
    "vh", "vi", "vb", "vmin", "vmax", "svw", "svh", "lvw", "lvh", "dvw", "dvh", "svi", "svb",
    "lvi", "lvb", "dvi", "dvb", "svmin", "svmax", "lvmin", "lvmax", "dvmin", "dvmax", "cqw",
    "cqh", "cqi", "cqb", "cqmin", "cqmax", "cm", "mm", "q", "in", "pt", "pc", "deg", "grad",
    "rad", "turn", "s", "ms", "hz", "khz", "dpi", "dpcm", "dppx", "x", "fr",
];

/// One stylesheet warning, in stylelint's shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleWarning {
    pub line: usize,
    pub column: usize,
    pub rule: String,
    pub severity: RuleSeverity,
    /// Message with the rule name appended, e.g. "Unexpected empty block (block-no-empty)"
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidOptionWarning {
    pub text: String,
}

/// Lint results for one stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    pub source: String,
    pub errored: bool,
    pub warnings: Vec<StyleWarning>,
    #[serde(default)]
    pub invalid_option_warnings: Vec<InvalidOptionWarning>,
}

/// Aggregate result of a lint run
#[derive(Debug, Clone)]
pub struct StyleLintResult {
    /// True when any file has an error-severity warning
    pub errored: bool,
    pub results: Vec<FileResult>,
    /// JSON array of `results`, as stylelint's json formatter prints it
    pub output: String,
}

/// Lint each stylesheet on disk
pub fn lint_files(paths: &[PathBuf], config: &StyleLintConfig) -> Result<StyleLintResult> {
    let invalid: Vec<InvalidOptionWarning> = config
        .rules
        .keys()
        .filter(|rule| !STYLE_RULES.contains(&rule.as_str()))
        .map(|rule| InvalidOptionWarning {
            text: format!("Unknown rule {}.", rule),
        })
        .collect();

    let mut results = Vec::new();
    for path in paths {
        if !path.is_file() {
            return Err(GradeError::MissingFile(path.display().to_string()));
        }
        let source = std::fs::read_to_string(path)?;
        let mut result = lint_source(&source, &path.display().to_string(), config);
        result.invalid_option_warnings = invalid.clone();
        results.push(result);
    }

    let errored = results.iter().any(|r| r.errored);
    let output = serde_json::to_string(&results)?;

    info!(files = results.len(), errored, "Stylesheet lint complete");
    Ok(StyleLintResult {
        errored,
        results,
        output,
    })
}

/// Lint stylesheet text; `name` is recorded as the result's source
pub fn lint_source(source: &str, name: &str, config: &StyleLintConfig) -> FileResult {
    let mut report = Report {
        config,
        warnings: Vec::new(),
    };

    if source.trim().is_empty() {
        report.emit("no-empty-source", Position::default(), "Unexpected empty source");
        return report.finish(name);
    }

    let sheet = Parser::new(source).parse();
    debug!(
        blocks = sheet.blocks.len(),
        comments = sheet.comments.len(),
        "Parsed stylesheet"
    );

    for (message, pos) in &sheet.syntax_errors {
        report.syntax_error(message, *pos);
    }

    for (text, pos) in &sheet.comments {
        if text.trim().is_empty() {
            report.emit("comment-no-empty", *pos, "Unexpected empty comment");
        }
    }

    for pos in &sheet.string_newlines {
        report.emit("string-no-newline", *pos, "Unexpected newline in string");
    }

    let mut blocks: Vec<&Block> = sheet.blocks.iter().collect();
    blocks.sort_by_key(|b| b.pos);

    let mut selectors: HashMap<(String, String), Position> = HashMap::new();
    let hex_re = Regex::new(r"#([0-9A-Za-z]+)").expect("valid regex");
    let unit_re = Regex::new(r"([+-]?(?:\d*\.)?\d+)([a-zA-Z]+)").expect("valid regex");

    for block in blocks {
        if !block.has_content {
            report.emit("block-no-empty", block.open_pos, "Unexpected empty block");
        }

        if block.is_rule && !block.context.contains("keyframes") {
            let key = (block.context.clone(), normalize_selector(&block.prelude));
            match selectors.get(&key) {
                Some(first) => report.emit(
                    "no-duplicate-selectors",
                    block.pos,
                    format!(
                        "Unexpected duplicate selector \"{}\", first used at line {}",
                        block.prelude, first.line
                    ),
                ),
                None => {
                    selectors.insert(key, block.pos);
                }
            }
        }

        let mut seen = HashSet::new();
        for decl in &block.declarations {
            let property = decl.property.to_ascii_lowercase();
            if !seen.insert(property.clone()) {
                report.emit(
                    "declaration-block-no-duplicate-properties",
                    decl.pos,
                    format!("Unexpected duplicate \"{}\"", property),
                );
            }

            let masked = mask_strings_and_urls(&decl.value);
            check_hex_colors(&hex_re, decl, &masked, &mut report);
            check_units(&unit_re, decl, &masked, &mut report);

            if property == "font-family" {
                check_font_family(decl, block.in_font_face, &mut report);
            }
        }
    }

    report.finish(name)
}

struct Report<'a> {
    config: &'a StyleLintConfig,
    warnings: Vec<StyleWarning>,
}

impl Report<'_> {
    fn emit(&mut self, rule: &str, pos: Position, message: impl AsRef<str>) {
        let severity = self.config.severity(rule);
        if severity == RuleSeverity::Off {
            return;
        }
        self.warnings.push(StyleWarning {
            line: pos.line,
            column: pos.column,
            rule: rule.to_string(),
            severity,
            text: format!("{} ({})", message.as_ref(), rule),
        });
    }

    fn syntax_error(&mut self, message: &str, pos: Position) {
        self.warnings.push(StyleWarning {
            line: pos.line,
            column: pos.column,
            rule: "CssSyntaxError".to_string(),
            severity: RuleSeverity::Error,
            text: format!("{} (CssSyntaxError)", message),
        });
    }

    fn finish(mut self, name: &str) -> FileResult {
        self.warnings
            .sort_by(|a, b| (a.line, a.column, &a.rule).cmp(&(b.line, b.column, &b.rule)));
        FileResult {
            source: name.to_string(),
            errored: self.warnings.iter().any(|w| w.severity == RuleSeverity::Error),
            warnings: self.warnings,
            invalid_option_warnings: Vec::new(),
        }
    }
}

fn check_hex_colors(re: &Regex, decl: &Declaration, masked: &str, report: &mut Report) {
    for caps in re.captures_iter(masked) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let hex = digits.as_str();
        let valid = matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            report.emit(
                "color-no-invalid-hex",
                advance(decl.value_pos, &masked[..whole.start()]),
                format!("Unexpected invalid hex color \"{}\"", whole.as_str()),
            );
        }
    }
}

fn check_units(re: &Regex, decl: &Declaration, masked: &str, report: &mut Report) {
    for caps in re.captures_iter(masked) {
        let (Some(whole), Some(unit)) = (caps.get(0), caps.get(2)) else {
            continue;
        };

        // part of an identifier or hex color, not a dimension
        let before = masked[..whole.start()].chars().last();
        if matches!(before, Some(c) if c.is_alphanumeric() || c == '_' || c == '#' || c == '-' || c == '.') {
            continue;
        }
        // exponent notation such as 1e3 or 2e-4
        let after = masked[unit.end()..].chars().next();
        if matches!(after, Some(c) if c.is_ascii_digit() || c == '_')
            || (unit.as_str().eq_ignore_ascii_case("e") && matches!(after, Some('-' | '+')))
        {
            continue;
        }

        let lower = unit.as_str().to_ascii_lowercase();
        if !KNOWN_UNITS.contains(&lower.as_str()) {
            report.emit(
                "unit-no-unknown",
                advance(decl.value_pos, &masked[..unit.start()]),
                format!("Unexpected unknown unit \"{}\"", unit.as_str()),
            );
        }
    }
}

fn check_font_family(decl: &Declaration, in_font_face: bool, report: &mut Report) {
    let families = split_font_families(&decl.value);

    let mut seen = HashSet::new();
    for (name, _) in &families {
        if !seen.insert(name.to_lowercase()) {
            report.emit(
                "font-family-no-duplicate-names",
                decl.value_pos,
                format!("Unexpected duplicate name {}", name),
            );
        }
    }

    if in_font_face {
        return;
    }

    let lower = decl.value.to_ascii_lowercase();
    let exempt = CSS_WIDE_KEYWORDS.contains(&lower.trim()) || lower.contains("var(");
    let has_generic = families
        .iter()
        .any(|(name, quoted)| !quoted && GENERIC_FAMILIES.contains(&name.to_lowercase().as_str()));

    if !exempt && !has_generic {
        report.emit(
            "font-family-no-missing-generic-family-keyword",
            decl.value_pos,
            "Unexpected missing generic font family",
        );
    }
}

/// Split a font stack on top-level commas; each name is returned unquoted
/// together with whether it was quoted
pub(crate) fn split_font_families(value: &str) -> Vec<(String, bool)> {
    let mut families = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in value.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            }
            (None, ',') => families.push(std::mem::take(&mut current)),
            (None, c) => current.push(c),
        }
    }
    families.push(current);

    families
        .into_iter()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            let quoted = raw.len() >= 2
                && ((raw.starts_with('"') && raw.ends_with('"'))
                    || (raw.starts_with('\'') && raw.ends_with('\'')));
            if quoted {
                (raw[1..raw.len() - 1].to_string(), true)
            } else {
                (raw.split_whitespace().collect::<Vec<_>>().join(" "), false)
            }
        })
        .collect()
}

/// Blank out string and url() contents, keeping newlines and char count
fn mask_strings_and_urls(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut quote: Option<char> = None;
    let mut url_depth = 0usize;
    let lower: Vec<char> = value.to_ascii_lowercase().chars().collect();

    for (i, c) in value.chars().enumerate() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            out.push(if c == '\n' { '\n' } else { ' ' });
            continue;
        }
        if url_depth > 0 {
            if c == ')' {
                url_depth -= 1;
                out.push(c);
            } else {
                out.push(if c == '\n' { '\n' } else { ' ' });
            }
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
            out.push(' ');
            continue;
        }
        if c == '(' && i >= 3 && lower[i - 3..i] == ['u', 'r', 'l'] {
            url_depth = 1;
        }
        out.push(c);
    }

    out
}

fn normalize_selector(selector: &str) -> String {
    let mut parts: Vec<String> = selector
        .split(',')
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect();
    parts.sort();
    parts.join(",")
}

fn at_rule_name(prelude: &str) -> Option<String> {
    let rest = prelude.strip_prefix('@')?;
    Some(
        rest.chars()
            .take_while(|c| !c.is_whitespace() && *c != '(')
            .collect::<String>()
            .to_ascii_lowercase(),
    )
}

#[derive(Debug)]
struct Declaration {
    property: String,
    value: String,
    pos: Position,
    value_pos: Position,
}

#[derive(Debug)]
struct Block {
    prelude: String,
    pos: Position,
    open_pos: Position,
    /// Enclosing at-rule preludes, used to scope duplicate selectors
    context: String,
    is_rule: bool,
    in_font_face: bool,
    declarations: Vec<Declaration>,
    has_content: bool,
}

#[derive(Debug, Default)]
struct Sheet {
    blocks: Vec<Block>,
    comments: Vec<(String, Position)>,
    string_newlines: Vec<Position>,
    syntax_errors: Vec<(String, Position)>,
}

struct Parser {
    cur: Cursor,
    sheet: Sheet,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            cur: Cursor::new(source),
            sheet: Sheet::default(),
        }
    }

    fn parse(mut self) -> Sheet {
        self.parse_list("", false);
        self.sheet
    }

    /// Parse a list of rules and at-rules; returns (has_content, closed)
    fn parse_list(&mut self, context: &str, nested: bool) -> (bool, bool) {
        let mut has_content = false;

        loop {
            has_content |= self.skip_trivia();
            let pos = self.cur.position();

            match self.cur.peek() {
                None => return (has_content, false),
                Some('}') => {
                    self.cur.bump();
                    if nested {
                        return (has_content, true);
                    }
                    self.syntax_error("Unexpected }", pos);
                    continue;
                }
                _ => {}
            }

            let prelude = self.read_until(&['{', ';', '}']).trim().to_string();
            let at_rule = at_rule_name(&prelude);

            match self.cur.peek() {
                Some('{') => {
                    let open_pos = self.cur.position();
                    self.cur.bump();
                    has_content = true;

                    match at_rule {
                        Some(name) if DECLARATION_AT_RULES.contains(&name.as_str()) => {
                            let in_font_face = name == "font-face";
                            self.parse_declarations(prelude, pos, open_pos, context, false, in_font_face);
                        }
                        Some(_) => {
                            let inner = format!("{}{}|", context, prelude);
                            let (inner_content, closed) = self.parse_list(&inner, true);
                            if !closed {
                                self.syntax_error("Unclosed block", pos);
                            }
                            self.sheet.blocks.push(Block {
                                prelude,
                                pos,
                                open_pos,
                                context: context.to_string(),
                                is_rule: false,
                                in_font_face: false,
                                declarations: Vec::new(),
                                has_content: inner_content,
                            });
                        }
                        None => self.parse_declarations(prelude, pos, open_pos, context, true, false),
                    }
                }
                Some(';') => {
                    self.cur.bump();
                    if at_rule.is_some() {
                        has_content = true;
                    } else if !prelude.is_empty() {
                        self.syntax_error("Unknown word", pos);
                    }
                }
                _ => {
                    if at_rule.is_some() {
                        has_content = true;
                    } else if !prelude.is_empty() {
                        self.syntax_error("Unknown word", pos);
                    }
                }
            }
        }
    }

    fn parse_declarations(
        &mut self,
        prelude: String,
        pos: Position,
        open_pos: Position,
        context: &str,
        is_rule: bool,
        in_font_face: bool,
    ) {
        let mut declarations = Vec::new();
        let mut has_content = false;
        let mut closed = false;

        loop {
            has_content |= self.skip_trivia();
            let decl_pos = self.cur.position();

            match self.cur.peek() {
                None => break,
                Some('}') => {
                    self.cur.bump();
                    closed = true;
                    break;
                }
                Some(';') => {
                    self.cur.bump();
                    continue;
                }
                _ => {}
            }

            let property = self.read_until(&[':', ';', '{', '}']).trim().to_string();

            match self.cur.peek() {
                Some(':') => {
                    self.cur.bump();
                    self.cur.skip_whitespace();
                    let value_pos = self.cur.position();
                    let value = self.read_until(&[';', '}']).trim_end().to_string();
                    declarations.push(Declaration {
                        property,
                        value,
                        pos: decl_pos,
                        value_pos,
                    });
                    has_content = true;
                }
                Some('{') => {
                    // nested rule
                    let nested_open = self.cur.position();
                    self.cur.bump();
                    self.parse_declarations(property, decl_pos, nested_open, context, true, false);
                    has_content = true;
                }
                _ => {
                    if !property.is_empty() {
                        self.syntax_error("Unknown word", decl_pos);
                        has_content = true;
                    }
                }
            }
        }

        if !closed {
            self.syntax_error("Unclosed block", pos);
        }

        self.sheet.blocks.push(Block {
            prelude,
            pos,
            open_pos,
            context: context.to_string(),
            is_rule,
            in_font_face,
            declarations,
            has_content,
        });
    }

    /// Skip whitespace and comments; true if a comment was seen
    fn skip_trivia(&mut self) -> bool {
        let mut saw_comment = false;
        loop {
            self.cur.skip_whitespace();
            if self.cur.starts_with("/*") {
                self.read_comment();
                saw_comment = true;
            } else {
                return saw_comment;
            }
        }
    }

    fn read_comment(&mut self) {
        let pos = self.cur.position();
        self.cur.bump_n(2);
        let (text, found) = self.cur.take_until("*/", false);
        if found {
            self.cur.bump_n(2);
        } else {
            self.syntax_error("Unclosed comment", pos);
        }
        self.sheet.comments.push((text, pos));
    }

    /// Read until one of `stops` at paren depth zero; comments are dropped
    fn read_until(&mut self, stops: &[char]) -> String {
        let mut out = String::new();
        let mut depth = 0usize;

        while let Some(c) = self.cur.peek() {
            if depth == 0 && stops.contains(&c) {
                break;
            }
            match c {
                '/' if self.cur.peek_at(1) == Some('*') => {
                    self.read_comment();
                    continue;
                }
                '"' | '\'' => {
                    self.read_string(&mut out);
                    continue;
                }
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
            out.push(c);
            self.cur.bump();
        }

        out
    }

    fn read_string(&mut self, out: &mut String) {
        let pos = self.cur.position();
        let Some(quote) = self.cur.bump() else {
            return;
        };
        out.push(quote);

        loop {
            match self.cur.peek() {
                None => {
                    self.syntax_error("Unclosed string", pos);
                    return;
                }
                Some('\\') => {
                    out.push('\\');
                    self.cur.bump();
                    if let Some(next) = self.cur.bump() {
                        out.push(next);
                    }
                }
                Some('\n') => {
                    // a raw newline ends the string token
                    self.sheet.string_newlines.push(pos);
                    return;
                }
                Some(c) => {
                    out.push(c);
                    self.cur.bump();
                    if c == quote {
                        return;
                    }
                }
            }
        }
    }

    fn syntax_error(&mut self, message: &str, pos: Position) {
        self.sheet.syntax_errors.push((message.to_string(), pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"/* Site styles */
body {
  font-size: 16px;
  font-family: "Helvetica Neue", Helvetica, Arial, sans-serif;
  color: #333;
}

p {
  line-height: 1.5;
}

img {
  max-height: 400px;
}

.important {
  color: #c0ffee;
}

@media (max-width: 600px) {
  body {
    font-size: 1.1rem;
  }
}
"#;

    fn lint(css: &str) -> FileResult {
        lint_source(css, "style.css", &StyleLintConfig::default())
    }

    fn rules(result: &FileResult) -> Vec<&str> {
        result.warnings.iter().map(|w| w.rule.as_str()).collect()
    }

    #[test]
    fn test_clean_stylesheet() {
        let result = lint(CLEAN);
        assert!(!result.errored, "unexpected warnings: {:?}", result.warnings);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_source() {
        let result = lint("  \n ");
        assert!(result.errored);
        assert_eq!(rules(&result), vec!["no-empty-source"]);
    }

    #[test]
    fn test_empty_block_and_comment() {
        let result = lint("p {}\n/* */\n");
        assert_eq!(rules(&result), vec!["block-no-empty", "comment-no-empty"]);
        assert_eq!(result.warnings[0].text, "Unexpected empty block (block-no-empty)");
        assert_eq!((result.warnings[0].line, result.warnings[0].column), (1, 3));
    }

    #[test]
    fn test_duplicate_property_position() {
        let result = lint("p {\n  color: red;\n  color: blue;\n}\n");
        assert!(result.errored);
        assert_eq!(rules(&result), vec!["declaration-block-no-duplicate-properties"]);
        assert_eq!((result.warnings[0].line, result.warnings[0].column), (3, 3));
    }

    #[test]
    fn test_invalid_hex_and_unknown_unit() {
        let result = lint("a {\n  color: #ggg;\n  margin: 10pixels;\n}\n");
        assert_eq!(rules(&result), vec!["color-no-invalid-hex", "unit-no-unknown"]);
        assert_eq!((result.warnings[0].line, result.warnings[0].column), (2, 10));
        assert_eq!((result.warnings[1].line, result.warnings[1].column), (3, 13));
    }

    #[test]
    fn test_units_ignore_hex_strings_and_urls() {
        let css = "a {\n  color: #1a2b3c;\n  background: url(img/2x.png);\n  content: \"3bananas\";\n  width: 1e3px;\n}\n";
        assert!(lint(css).warnings.is_empty());
    }

    #[test]
    fn test_font_family_rules() {
        let result = lint("body { font-family: Arial, \"Arial\"; }\n");
        assert_eq!(
            rules(&result),
            vec![
                "font-family-no-duplicate-names",
                "font-family-no-missing-generic-family-keyword"
            ]
        );

        let result = lint("@font-face { font-family: Brand; src: url(brand.woff2); }\n");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_selectors_scoped_by_media() {
        let css = "p, a { color: red; }\n@media print { p { color: black; } }\na,p { margin: 0; }\n";
        let result = lint(css);
        assert_eq!(rules(&result), vec!["no-duplicate-selectors"]);
        assert_eq!(result.warnings[0].line, 3);
        assert!(result.warnings[0].text.contains("first used at line 1"));
    }

    #[test]
    fn test_keyframe_steps_are_not_duplicates() {
        let css = "@keyframes a { from { opacity: 0; } to { opacity: 1; } }\n@keyframes b { from { opacity: 1; } to { opacity: 0; } }\n";
        assert!(lint(css).warnings.is_empty());
    }

    #[test]
    fn test_syntax_errors() {
        let result = lint("p { color: red;\n");
        assert_eq!(rules(&result), vec!["CssSyntaxError"]);
        assert_eq!(result.warnings[0].text, "Unclosed block (CssSyntaxError)");

        let result = lint("p { color: red; } }\n");
        assert_eq!(rules(&result), vec!["CssSyntaxError"]);
    }

    #[test]
    fn test_string_newline() {
        let result = lint("a::after { content: \"one\ntwo\"; }\n");
        assert!(rules(&result).contains(&"string-no-newline"));
    }

    #[test]
    fn test_severity_override() {
        let mut config = StyleLintConfig::default();
        config
            .rules
            .insert("block-no-empty".to_string(), RuleSeverity::Warning);
        let result = lint_source("p {}\n", "style.css", &config);
        assert!(!result.errored);
        assert_eq!(result.warnings[0].severity, RuleSeverity::Warning);

        config.rules.insert("block-no-empty".to_string(), RuleSeverity::Off);
        assert!(lint_source("p {}\n", "style.css", &config).warnings.is_empty());
    }

    #[test]
    fn test_output_is_stylelint_json() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("style.css");
        std::fs::write(&path, "p {}\n").unwrap();

        let mut config = StyleLintConfig::default();
        config.rules.insert("no-such-rule".to_string(), RuleSeverity::Error);
        let result = lint_files(&[path], &config).unwrap();
        assert!(result.errored);

        let parsed: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(parsed[0]["errored"], true);
        assert_eq!(parsed[0]["warnings"][0]["rule"], "block-no-empty");
        assert_eq!(parsed[0]["warnings"][0]["severity"], "error");
        assert_eq!(
            parsed[0]["invalidOptionWarnings"][0]["text"],
            "Unknown rule no-such-rule."
        );
    }

    #[test]
    fn test_missing_file() {
        let err = lint_files(&[PathBuf::from("/nonexistent/style.css")], &StyleLintConfig::default())
            .unwrap_err();
        assert!(matches!(err, GradeError::MissingFile(_)));
    }

    #[test]
    fn test_split_font_families() {
        let families = split_font_families("\"Helvetica Neue\", Helvetica ,  Times  New Roman, serif");
        assert_eq!(
            families,
            vec![
                ("Helvetica Neue".to_string(), true),
                ("Helvetica".to_string(), false),
                ("Times New Roman".to_string(), false),
                ("serif".to_string(), false),
            ]
        );
    }
}
