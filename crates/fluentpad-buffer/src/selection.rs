//! The cursor and its selection.
//!
//! A selection is an `anchor` (where selecting started) and a `head`
//! (where the caret is). It is empty when they coincide. Both ends are
//! character offsets, and every setter saturates into the buffer instead
//! of failing: these calls come from arrow keys and mouse clicks.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

use crate::buffer::{TextBuffer, remap_offset};

/// Anchor/head pair into a [`TextBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Fixed end of the selection
    pub anchor: usize,
    /// Moving end of the selection, where the caret is drawn
    pub head: usize,
}

impl Selection {
    /// Creates a selection, unclamped.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Creates an empty selection (a bare cursor).
    pub fn cursor(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Smaller end.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Larger end.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Selected range, start first.
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Number of selected characters.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Moves both ends to `offset`.
    pub fn move_to(&mut self, offset: usize, buffer: &TextBuffer) {
        let offset = offset.min(buffer.len_chars());
        self.anchor = offset;
        self.head = offset;
    }

    /// Moves the head to `offset`, keeping the anchor.
    pub fn extend(&mut self, offset: usize, buffer: &TextBuffer) {
        self.head = offset.min(buffer.len_chars());
    }

    /// Drops the selection, leaving the cursor at the head.
    pub fn collapse(&mut self) {
        self.anchor = self.head;
    }

    /// Selects `range`, with the head at its end.
    pub fn select(&mut self, range: Range<usize>, buffer: &TextBuffer) {
        let len = buffer.len_chars();
        self.anchor = range.start.min(len);
        self.head = range.end.min(len);
    }

    /// Text between the two ends.
    pub fn selected_text<'a>(&self, buffer: &'a TextBuffer) -> Cow<'a, str> {
        let start = self.start().min(buffer.len_chars());
        let count = self.end().min(buffer.len_chars()) - start;
        buffer.text_at(start, count).unwrap_or_default()
    }

    /// Applies the edit-adjustment rule to both ends.
    pub fn remap(&mut self, edit_offset: usize, removed: usize, inserted: usize) {
        self.anchor = remap_offset(self.anchor, edit_offset, removed, inserted);
        self.head = remap_offset(self.head, edit_offset, removed, inserted);
    }
}
