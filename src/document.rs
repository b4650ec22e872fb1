// SPDX-License-Identifier: PMPL-1.0-or-later
//! The graded document: loaded once, shared read-only by every check group.

use crate::error::{GradeError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Source text of a submission plus the base URL its relative links resolve from
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    source: String,
    base_url: Url,
}

impl Document {
    /// Read a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(GradeError::MissingFile(path.display().to_string()));
        }

        let source = std::fs::read_to_string(path)?;
        let absolute = path.canonicalize()?;
        debug!(path = %absolute.display(), bytes = source.len(), "Loaded document");

        Self::from_source(absolute, source)
    }

    /// Build a document from text already in memory.
    ///
    /// Relative paths are anchored at the current directory so the base URL
    /// is always an absolute `file://` directory URL.
    pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let absolute = if path.is_absolute() {
            path.clone()
        } else {
            std::env::current_dir()?.join(&path)
        };
        let dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let base_url = Url::from_directory_path(&dir).map_err(|_| {
            GradeError::Config(format!("cannot build a file URL for {}", dir.display()))
        })?;

        Ok(Self {
            path,
            source: source.into(),
            base_url,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// `file://` URL of the directory holding the document, with trailing slash
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
