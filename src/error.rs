// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for gradebot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GradeError>;

/// Main error type for gradebot
#[derive(Error, Debug)]
pub enum GradeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Style inlining failed: {0}")]
    Inline(#[from] css_inline::InlineError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("File not found: {0}")]
    MissingFile(String),
}
