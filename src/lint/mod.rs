// SPDX-License-Identifier: PMPL-1.0-or-later
//! Source linters for the two static inputs of a submission.
//!
//! - [`html`]: markup rules named after htmllint options
//! - [`css`]: stylesheet rules named after stylelint rules, with
//!   stylelint-compatible JSON output

pub mod css;
pub mod html;

use serde::{Deserialize, Serialize};

/// 1-indexed location in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Position reached after scanning `text` from `start`
pub(crate) fn advance(start: Position, text: &str) -> Position {
    let mut pos = start;
    for c in text.chars() {
        if c == '\n' {
            pos.line += 1;
            pos.column = 1;
        } else {
            pos.column += 1;
        }
    }
    pos
}

/// Character cursor that tracks line and column while scanning
pub(crate) struct Cursor {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            idx: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.idx >= self.chars.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub(crate) fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// ASCII case-insensitive lookahead
    pub(crate) fn starts_with_ci(&self, needle: &str) -> bool {
        needle
            .chars()
            .enumerate()
            .all(|(i, n)| match self.peek_at(i) {
                Some(c) => c.eq_ignore_ascii_case(&n),
                None => false,
            })
    }

    pub(crate) fn starts_with(&self, needle: &str) -> bool {
        needle
            .chars()
            .enumerate()
            .all(|(i, n)| self.peek_at(i) == Some(n))
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Consume until `needle` (exclusive); returns the consumed text and
    /// whether the needle was found
    pub(crate) fn take_until(&mut self, needle: &str, case_insensitive: bool) -> (String, bool) {
        let mut out = String::new();
        loop {
            let hit = if case_insensitive {
                self.starts_with_ci(needle)
            } else {
                self.starts_with(needle)
            };
            if hit {
                return (out, true);
            }
            match self.bump() {
                Some(c) => out.push(c),
                None => return (out, false),
            }
        }
    }
}
