// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for gradebot
//!
//! Every default here is the fixed rule set of the exercise, so running
//! without a config file grades exactly the way the assignment specifies.

use crate::error::{GradeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document to grade, relative to the submission root
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// Stylesheet to lint, relative to the submission root
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,

    /// Placeholder strings and expected style values
    #[serde(default)]
    pub expectations: Expectations,

    /// Markup linter rule settings
    #[serde(default)]
    pub markup_lint: MarkupLintConfig,

    /// Stylesheet linter rule settings
    #[serde(default)]
    pub style_lint: StyleLintConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Directories skipped when discovering submissions
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            stylesheet: default_stylesheet(),
            expectations: Expectations::default(),
            markup_lint: MarkupLintConfig::default(),
            style_lint: StyleLintConfig::default(),
            log: LogConfig::default(),
            exclude: default_exclude(),
        }
    }
}

fn default_document() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_stylesheet() -> PathBuf {
    PathBuf::from("css/style.css")
}

fn default_exclude() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "target".to_string(),
        "dist".to_string(),
    ]
}

/// Values the structural and style assertions compare against
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Expectations {
    /// Starter-template title that must be replaced
    pub title_placeholder: String,
    /// Starter-template author that must be replaced
    pub author_placeholder: String,
    /// Directory prefix every graded image source lives under
    pub image_prefix: String,
    /// Pattern an external hyperlink target must match
    pub link_pattern: String,
    /// Minimum number of direct list items
    pub min_list_items: usize,
    /// Expected href of the single stylesheet link
    pub stylesheet_href: String,
    /// Expected body font size
    pub body_font_size: String,
    /// Pattern the body font stack must match after quote normalization
    pub body_font_family: String,
    /// Expected paragraph line height
    pub paragraph_line_height: String,
    /// Expected image max-height
    pub image_max_height: String,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            title_placeholder: "My Page Title".to_string(),
            author_placeholder: "your name".to_string(),
            image_prefix: "img/".to_string(),
            link_pattern: r"^https?://".to_string(),
            min_list_items: 3,
            stylesheet_href: "css/style.css".to_string(),
            body_font_size: "16px".to_string(),
            body_font_family: r"'Helvetica Neue', '?Helvetica'?, '?Arial'?, sans-serif".to_string(),
            paragraph_line_height: "1.5".to_string(),
            image_max_height: "400px".to_string(),
        }
    }
}

/// Attribute name conventions for `attr-name-style`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttrNameStyle {
    Off,
    /// Lowercase words joined by dashes
    Dash,
    /// Any lowercase name
    Lowercase,
}

/// Quote conventions for `attr-quote-style`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Off,
    Double,
    Single,
    /// Either quote, as long as the value is quoted
    Quoted,
}

/// Naming conventions for `id-class-style`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdClassStyle {
    Off,
    /// Lowercase words joined by underscores
    Underscore,
    /// Lowercase words joined by dashes
    Dash,
    /// camelCase
    Camel,
}

/// Line ending conventions for `line-end-style`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineEndStyle {
    Off,
    Lf,
    Crlf,
    Cr,
}

/// Indentation conventions for `indent-style`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Off,
    Tabs,
    Spaces,
    /// Tabs or spaces, but not both on one line
    Nonmixed,
}

/// Markup linter configuration, keyed by htmllint option names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MarkupLintConfig {
    pub attr_bans: Vec<String>,
    pub attr_no_dup: bool,
    pub attr_name_style: AttrNameStyle,
    pub attr_quote_style: QuoteStyle,
    /// Non-boolean attributes must be given a value
    pub attr_req_value: bool,
    pub class_no_dup: bool,
    pub doctype_first: bool,
    pub doctype_html5: bool,
    pub head_req_title: bool,
    pub html_req_lang: bool,
    /// Ids and classes must not look like ad containers
    pub id_class_no_ad: bool,
    pub id_class_style: IdClassStyle,
    pub id_no_dup: bool,
    pub img_req_alt: bool,
    pub img_req_src: bool,
    /// Spaces per indent level; 0 disables the rule
    pub indent_width: usize,
    pub indent_style: IndentStyle,
    pub input_radio_req_name: bool,
    pub line_end_style: LineEndStyle,
    pub line_no_trailing_whitespace: bool,
    /// `<`, `>` and bare `&` must be written as character references
    pub spec_char_escape: bool,
    pub tag_bans: Vec<String>,
    pub tag_close: bool,
    pub tag_name_lowercase: bool,
    /// End tags must be spelled exactly like their start tags
    pub tag_name_match: bool,
    /// Maximum title length; 0 disables the rule
    pub title_max_len: usize,
    pub title_no_dup: bool,
}

impl Default for MarkupLintConfig {
    fn default() -> Self {
        Self {
            // height is banned on top of the usual presentational set
            attr_bans: [
                "align",
                "background",
                "bgcolor",
                "border",
                "frameborder",
                "marginwidth",
                "marginheight",
                "scrolling",
                "style",
                "width",
                "height",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            attr_no_dup: true,
            attr_name_style: AttrNameStyle::Dash,
            attr_quote_style: QuoteStyle::Double,
            attr_req_value: true,
            class_no_dup: true,
            doctype_first: true,
            doctype_html5: true,
            head_req_title: true,
            html_req_lang: true,
            id_class_no_ad: true,
            id_class_style: IdClassStyle::Underscore,
            id_no_dup: true,
            img_req_alt: true,
            img_req_src: true,
            indent_width: 0,
            indent_style: IndentStyle::Off,
            input_radio_req_name: true,
            line_end_style: LineEndStyle::Off,
            line_no_trailing_whitespace: true,
            spec_char_escape: true,
            tag_bans: vec!["style".to_string(), "b".to_string(), "i".to_string()],
            tag_close: true,
            tag_name_lowercase: true,
            tag_name_match: true,
            title_max_len: 60,
            title_no_dup: true,
        }
    }
}

/// Severity of a stylesheet rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warning,
    Off,
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSeverity::Error => write!(f, "error"),
            RuleSeverity::Warning => write!(f, "warning"),
            RuleSeverity::Off => write!(f, "off"),
        }
    }
}

/// Every stylesheet rule the linter knows, by stylelint name
pub const STYLE_RULES: &[&str] = &[
    "block-no-empty",
    "color-no-invalid-hex",
    "comment-no-empty",
    "declaration-block-no-duplicate-properties",
    "font-family-no-duplicate-names",
    "font-family-no-missing-generic-family-keyword",
    "no-duplicate-selectors",
    "no-empty-source",
    "string-no-newline",
    "unit-no-unknown",
];

/// Stylesheet linter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleLintConfig {
    /// Severity per rule; rules missing from the map run at `error`
    pub rules: BTreeMap<String, RuleSeverity>,
}

impl Default for StyleLintConfig {
    fn default() -> Self {
        Self {
            rules: STYLE_RULES
                .iter()
                .map(|r| (r.to_string(), RuleSeverity::Error))
                .collect(),
        }
    }
}

impl StyleLintConfig {
    /// Severity a rule runs at
    pub fn severity(&self, rule: &str) -> RuleSeverity {
        self.rules.get(rule).copied().unwrap_or(RuleSeverity::Error)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from a path, falling back to defaults when absent
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Default config path inside a submission root
pub fn default_config_path() -> PathBuf {
    PathBuf::from("gradebot.toml")
}

/// Write default configuration to a file
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if is_toml(path) {
        toml::to_string_pretty(&config).map_err(|e| GradeError::Config(e.to_string()))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|e| e == "toml").unwrap_or(false)
}
