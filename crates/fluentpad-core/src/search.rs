//! Literal text search over a buffer.
//!
//! Search is stateless: every call takes a [`SearchQuery`] with its own
//! start offset and direction and returns the nearest match in that
//! direction. "Nothing found" is `Ok(None)`; only an empty pattern is an
//! error.
//!
//! Forward search considers matches starting at or after `start`, then
//! (with wrap) matches starting before it. Backward search considers
//! matches starting strictly before `start`, nearest first, then (with
//! wrap) the rest of the document from the end. Between the two passes
//! every candidate position is visited exactly once.

use fluentpad_buffer::TextBuffer;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Case and wrap flags shared by find next / find previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub wrap: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            wrap: true,
        }
    }
}

/// A single search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub pattern: String,
    pub direction: Direction,
    pub start: usize,
    pub options: SearchOptions,
}

impl SearchQuery {
    /// Forward, case-insensitive, wrapping search from offset 0.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            direction: Direction::Forward,
            start: 0,
            options: SearchOptions::default(),
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.options.case_sensitive = case_sensitive;
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.options.wrap = wrap;
        self
    }

    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

/// A match: `len` characters starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchMatch {
    pub start: usize,
    pub len: usize,
}

impl SearchMatch {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Search errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Nothing to search for")]
    InvalidQuery,
}

/// Finds the match nearest to `query.start` in the query's direction.
pub fn find(buffer: &TextBuffer, query: &SearchQuery) -> Result<Option<SearchMatch>, SearchError> {
    let pattern: Vec<char> = query.pattern.chars().collect();
    if pattern.is_empty() {
        return Err(SearchError::InvalidQuery);
    }

    let text: Vec<char> = buffer.chars().collect();
    let Some(last) = text.len().checked_sub(pattern.len()) else {
        return Ok(None);
    };

    let case_sensitive = query.options.case_sensitive;
    let is_match = |at: &usize| matches_at(&text, &pattern, *at, case_sensitive);
    let start = query.start.min(text.len());
    let split = start.min(last + 1);

    let found = match query.direction {
        Direction::Forward => (split..=last)
            .find(is_match)
            .or_else(|| query.options.wrap.then(|| (0..split).find(is_match)).flatten()),
        Direction::Backward => (0..split).rev().find(is_match).or_else(|| {
            query
                .options
                .wrap
                .then(|| (split..=last).rev().find(is_match))
                .flatten()
        }),
    };

    let result = found.map(|start| SearchMatch {
        start,
        len: pattern.len(),
    });
    tracing::debug!(
        pattern = %query.pattern,
        direction = ?query.direction,
        start = query.start,
        found = ?result,
        "find"
    );
    Ok(result)
}

/// Every match start in document order, overlapping matches included.
pub fn find_all(
    buffer: &TextBuffer,
    pattern: &str,
    case_sensitive: bool,
) -> Result<Vec<SearchMatch>, SearchError> {
    let pattern: Vec<char> = pattern.chars().collect();
    if pattern.is_empty() {
        return Err(SearchError::InvalidQuery);
    }

    let text: Vec<char> = buffer.chars().collect();
    let Some(last) = text.len().checked_sub(pattern.len()) else {
        return Ok(Vec::new());
    };

    Ok((0..=last)
        .filter(|&at| matches_at(&text, &pattern, at, case_sensitive))
        .map(|start| SearchMatch {
            start,
            len: pattern.len(),
        })
        .collect())
}

fn matches_at(text: &[char], pattern: &[char], at: usize, case_sensitive: bool) -> bool {
    text[at..at + pattern.len()]
        .iter()
        .zip(pattern)
        .all(|(&a, &b)| chars_equal(a, b, case_sensitive))
}

/// Characters match case-insensitively when either their lowercase or
/// their uppercase mappings agree, so final sigma matches `σ` and `Σ`.
fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    a == b
        || (!case_sensitive
            && (a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())))
}
