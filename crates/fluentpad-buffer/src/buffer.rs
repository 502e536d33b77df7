//! Core text buffer implementation using rope data structure.
//!
//! The buffer is deliberately small: it stores characters, answers
//! questions about lines, and exposes exactly two mutations, [`insert`]
//! and [`delete`]. Cursor bookkeeping and undo records live with the
//! caller, which knows what the edit meant.
//!
//! [`insert`]: TextBuffer::insert
//! [`delete`]: TextBuffer::delete

use ropey::Rope;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

use crate::line_index::LineIndex;
use crate::{BufferError, BufferResult};

/// Document text backed by a rope, plus a lazily rebuilt line index.
///
/// # Thread Safety
///
/// `TextBuffer` is `Send` but not `Sync`: the line index is filled in
/// through a `&self` query. A background reader should take a clone,
/// which shares rope chunks and is cheap.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Line starts; emptied on every mutation
    lines: OnceCell<LineIndex>,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use fluentpad_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// assert_eq!(buffer.line_count(), 1);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    ///
    /// Borrowed when the rope is a single chunk, allocated otherwise.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns `count` characters starting at `offset`.
    pub fn text_at(&self, offset: usize, count: usize) -> BufferResult<Cow<'_, str>> {
        let end = self.checked_end(offset, count)?;
        Ok(self.rope.slice(offset..end).into())
    }

    /// Iterates over every character of the document.
    pub fn chars(&self) -> ropey::iter::Chars<'_> {
        self.rope.chars()
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of characters (Unicode scalar values) in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines: one more than the number of `\n` characters.
    pub fn line_count(&self) -> usize {
        self.line_index().line_count()
    }

    /// Returns the `[start, end)` offsets of a line, without its `\n`.
    pub fn line_range(&self, line: usize) -> BufferResult<Range<usize>> {
        self.line_index()
            .line_range(line, self.len_chars())
            .map(|(start, end)| start..end)
            .ok_or(BufferError::LineOutOfRange {
                line,
                count: self.line_count(),
            })
    }

    /// Returns the text of a line, without its `\n`.
    pub fn line_text(&self, line: usize) -> BufferResult<Cow<'_, str>> {
        let range = self.line_range(line)?;
        Ok(self.rope.slice(range).into())
    }

    /// Line containing `offset`. Offsets past the end saturate to the
    /// last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.line_index()
            .line_of_offset(offset.min(self.len_chars()))
    }

    /// Character column of `offset` within its line.
    pub fn column_of_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_chars());
        let line = self.line_of_offset(offset);
        offset - self.line_index().line_start(line).unwrap_or(0)
    }

    fn line_index(&self) -> &LineIndex {
        self.lines.get_or_init(|| LineIndex::build(&self.rope))
    }

    // ==================== Mutations ====================

    /// Inserts text at a character offset.
    pub fn insert(&mut self, offset: usize, text: &str) -> BufferResult<()> {
        if offset > self.len_chars() {
            return Err(BufferError::OutOfRange {
                offset,
                len: self.len_chars(),
            });
        }
        if text.is_empty() {
            return Ok(());
        }

        self.rope.insert(offset, text);
        self.lines.take();
        Ok(())
    }

    /// Removes `count` characters starting at `offset` and returns them.
    pub fn delete(&mut self, offset: usize, count: usize) -> BufferResult<String> {
        let end = self.checked_end(offset, count)?;
        let removed: String = self.rope.slice(offset..end).into();

        if count > 0 {
            self.rope.remove(offset..end);
            self.lines.take();
        }
        Ok(removed)
    }

    fn checked_end(&self, offset: usize, count: usize) -> BufferResult<usize> {
        let len = self.len_chars();
        match offset.checked_add(count) {
            Some(end) if end <= len => Ok(end),
            _ => Err(BufferError::OutOfRange {
                offset: offset.saturating_add(count),
                len,
            }),
        }
    }

    // ==================== Grapheme Steps ====================

    /// Offset of the grapheme cluster boundary before `offset`.
    ///
    /// Returns 0 at the start of the document.
    pub fn prev_grapheme_boundary(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_chars());
        if offset == 0 {
            return 0;
        }

        let (start, text) = self.full_line(self.line_of_offset(offset - 1));
        let target = offset - start;
        let mut boundary = 0;
        let mut pos = 0;
        for grapheme in text.graphemes(true) {
            if pos >= target {
                break;
            }
            boundary = pos;
            pos += grapheme.chars().count();
        }
        start + boundary
    }

    /// Offset of the grapheme cluster boundary after `offset`.
    ///
    /// Returns the buffer length at the end of the document.
    pub fn next_grapheme_boundary(&self, offset: usize) -> usize {
        let len = self.len_chars();
        if offset >= len {
            return len;
        }

        let (start, text) = self.full_line(self.line_of_offset(offset));
        let target = offset - start;
        let mut pos = 0;
        for grapheme in text.graphemes(true) {
            pos += grapheme.chars().count();
            if pos > target {
                return start + pos;
            }
        }
        len
    }

    /// A line including its terminator, with its start offset.
    fn full_line(&self, line: usize) -> (usize, String) {
        let index = self.line_index();
        let start = index.line_start(line).unwrap_or(0);
        let end = index
            .line_end_inclusive(line, self.len_chars())
            .unwrap_or(start);
        (start, self.rope.slice(start..end).into())
    }
}

/// Remaps an externally held offset across an edit at `edit_offset` that
/// removed `removed` characters and inserted `inserted` characters.
///
/// Offsets before the edit are untouched. Offsets at or after it shift by
/// `inserted - removed` but never fall below `edit_offset`.
pub fn remap_offset(offset: usize, edit_offset: usize, removed: usize, inserted: usize) -> usize {
    if offset < edit_offset {
        return offset;
    }
    (offset + inserted).saturating_sub(removed).max(edit_offset)
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            lines: OnceCell::new(),
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello").unwrap();
        buffer.insert(5, ", World!").unwrap();
        assert_eq!(buffer.text(), "Hello, World!");

        let removed = buffer.delete(5, 2).unwrap();
        assert_eq!(removed, ", ");
        assert_eq!(buffer.text(), "HelloWorld!");
    }

    #[test]
    fn test_out_of_range() {
        let mut buffer = TextBuffer::from("abc");
        assert_eq!(
            buffer.insert(4, "x"),
            Err(BufferError::OutOfRange { offset: 4, len: 3 })
        );
        assert!(buffer.delete(2, 2).is_err());
        assert!(buffer.text_at(1, 5).is_err());
        assert!(buffer.text_at(usize::MAX, 2).is_err());
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_text_at() {
        let buffer = TextBuffer::from("héllo wörld");
        assert_eq!(buffer.text_at(1, 4).unwrap(), "éllo");
        assert_eq!(buffer.text_at(11, 0).unwrap(), "");
    }

    #[test]
    fn test_line_scenario() {
        let mut buffer = TextBuffer::from("line1\nline2\nline3");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_range(1).unwrap(), 6..11);
        assert_eq!(buffer.line_text(1).unwrap(), "line2");

        buffer.insert(0, "X").unwrap();
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_range(1).unwrap(), 7..12);
    }

    #[test]
    fn test_line_index_follows_edits() {
        let mut buffer = TextBuffer::from("a\nb");
        assert_eq!(buffer.line_count(), 2);

        buffer.insert(1, "\n\n").unwrap();
        assert_eq!(buffer.line_count(), 4);

        buffer.delete(0, 4).unwrap();
        assert_eq!(buffer.text(), "b");
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_line_out_of_range() {
        let buffer = TextBuffer::from("one\ntwo");
        assert_eq!(
            buffer.line_range(2),
            Err(BufferError::LineOutOfRange { line: 2, count: 2 })
        );
    }

    #[test]
    fn test_line_and_column_of_offset() {
        let buffer = TextBuffer::from("ab\ncde");
        assert_eq!(buffer.line_of_offset(4), 1);
        assert_eq!(buffer.column_of_offset(4), 1);
        assert_eq!(buffer.line_of_offset(100), 1);
        assert_eq!(buffer.column_of_offset(2), 2);
    }

    #[test]
    fn test_grapheme_boundaries() {
        // "e" + combining acute accent is one cluster of two chars
        let buffer = TextBuffer::from("ae\u{301}b\r\nc");
        assert_eq!(buffer.next_grapheme_boundary(0), 1);
        assert_eq!(buffer.next_grapheme_boundary(1), 3);
        assert_eq!(buffer.prev_grapheme_boundary(3), 1);
        assert_eq!(buffer.next_grapheme_boundary(4), 6);
        assert_eq!(buffer.prev_grapheme_boundary(6), 4);
        assert_eq!(buffer.prev_grapheme_boundary(0), 0);
        assert_eq!(buffer.next_grapheme_boundary(7), 7);
    }

    #[test]
    fn test_remap_offset() {
        // insert 3 at 5
        assert_eq!(remap_offset(4, 5, 0, 3), 4);
        assert_eq!(remap_offset(5, 5, 0, 3), 8);
        // delete 4 at 2
        assert_eq!(remap_offset(3, 2, 4, 0), 2);
        assert_eq!(remap_offset(10, 2, 4, 0), 6);
        // replace 2 with 1 at 0
        assert_eq!(remap_offset(1, 0, 2, 1), 0);
    }

    proptest! {
        #[test]
        fn prop_insert_then_delete_restores(
            base in "[a-z\\n é]{0,40}",
            text in "[A-Z\\n ü]{0,10}",
            pos in 0usize..50,
        ) {
            let mut buffer = TextBuffer::from(base.as_str());
            let offset = pos.min(buffer.len_chars());
            let count = text.chars().count();

            buffer.insert(offset, &text).unwrap();
            buffer.delete(offset, count).unwrap();

            prop_assert_eq!(buffer.text(), base.as_str());
        }

        #[test]
        fn prop_line_count_matches_newlines(text in "[ab\\n]{0,60}") {
            let buffer = TextBuffer::from(text.as_str());
            let newlines = text.chars().filter(|&c| c == '\n').count();
            prop_assert_eq!(buffer.line_count(), newlines + 1);
        }
    }
}
