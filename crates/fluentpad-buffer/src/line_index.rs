//! Line-start index over the buffer text.
//!
//! The index is a sorted list of character offsets where each line
//! begins. It is derived data: the buffer throws it away on every edit
//! and rebuilds it on the next line query.

use ropey::Rope;

/// Character offsets at which each line starts.
///
/// `starts[0]` is always 0, the list is strictly increasing, and it holds
/// exactly one more entry than the text has `\n` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Scans the rope once and records every line start.
    pub fn build(rope: &Rope) -> Self {
        let mut starts = Vec::with_capacity(rope.len_lines());
        starts.push(0);

        for (offset, ch) in rope.chars().enumerate() {
            if ch == '\n' {
                starts.push(offset + 1);
            }
        }

        tracing::trace!(lines = starts.len(), "rebuilt line index");
        Self { starts }
    }

    /// Number of lines. Never zero.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Offset of the first character of `line`.
    #[inline]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Offset of the start of the line after `line`, or `total_len` for
    /// the last line. This is the end of the line *including* its `\n`.
    pub fn line_end_inclusive(&self, line: usize, total_len: usize) -> Option<usize> {
        if line >= self.starts.len() {
            return None;
        }
        Some(self.starts.get(line + 1).copied().unwrap_or(total_len))
    }

    /// `[start, end)` of `line`, excluding the terminator.
    pub fn line_range(&self, line: usize, total_len: usize) -> Option<(usize, usize)> {
        let start = self.line_start(line)?;
        let end = match self.starts.get(line + 1) {
            Some(next) => next - 1,
            None => total_len,
        };
        Some((start, end))
    }

    /// Line containing `offset`, by binary search.
    ///
    /// An offset sitting on a `\n` belongs to the line that `\n` ends.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// All line starts, in order.
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }
}
