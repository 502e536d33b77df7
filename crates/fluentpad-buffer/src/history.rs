//! Undo/redo history management.
//!
//! Every committed mutation is described by one [`EditRecord`]: the text
//! removed and the text inserted at a single offset, plus the selection
//! before and after. Forward means "remove `removed`, then insert
//! `inserted`"; the exact undo is "remove `inserted`, then insert
//! `removed`", both at the same offset.
//!
//! Two stacks hold the records. [`History::commit`] pushes onto the undo
//! stack and is the only place the redo stack is dropped; undo and redo
//! shuttle the same record between the two.
//!
//! ## Typing bursts
//!
//! Consecutive single-character insertions that continue each other, with
//! no cursor move in between, are coalesced into one record so that undo
//! steps through words rather than keystrokes. Whitespace, deletions,
//! replacements and jumps all start a new record, and so does
//! [`History::break_coalescing`], which the session calls on every cursor
//! move even when the caret ends up where it started.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::buffer::TextBuffer;
use crate::selection::Selection;
use crate::{BufferError, BufferResult};

/// A single reversible edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Character offset where the edit happened
    pub offset: usize,
    /// Text that was removed at `offset` (possibly empty)
    pub removed: String,
    /// Text that was inserted at `offset` (possibly empty)
    pub inserted: String,
    /// Selection before the edit
    pub before: Selection,
    /// Selection after the edit
    pub after: Selection,
}

impl EditRecord {
    /// Creates a record.
    pub fn new(
        offset: usize,
        removed: impl Into<String>,
        inserted: impl Into<String>,
        before: Selection,
        after: Selection,
    ) -> Self {
        Self {
            offset,
            removed: removed.into(),
            inserted: inserted.into(),
            before,
            after,
        }
    }

    /// Returns true if the edit changes nothing.
    pub fn is_noop(&self) -> bool {
        self.removed == self.inserted
    }

    /// Re-applies the edit.
    pub fn apply(&self, buffer: &mut TextBuffer) -> BufferResult<()> {
        buffer.delete(self.offset, self.removed.chars().count())?;
        buffer.insert(self.offset, &self.inserted)
    }

    /// Reverses the edit.
    pub fn revert(&self, buffer: &mut TextBuffer) -> BufferResult<()> {
        buffer.delete(self.offset, self.inserted.chars().count())?;
        buffer.insert(self.offset, &self.removed)
    }

    /// Returns true if `next` is another keystroke of the same typing
    /// burst and can be folded into this record.
    pub fn can_coalesce(&self, next: &EditRecord) -> bool {
        if !self.removed.is_empty() || !next.removed.is_empty() {
            return false;
        }

        let mut next_chars = next.inserted.chars();
        let (Some(ch), None) = (next_chars.next(), next_chars.next()) else {
            return false;
        };
        if ch.is_whitespace() {
            return false;
        }

        match self.inserted.chars().last() {
            Some(last) if !last.is_whitespace() => {}
            _ => return false,
        }

        self.offset + self.inserted.chars().count() == next.offset && self.after == next.before
    }

    /// Folds `next` into this record.
    pub fn coalesce(&mut self, next: EditRecord) {
        self.inserted.push_str(&next.inserted);
        self.after = next.after;
    }
}

/// Manages undo/redo history.
///
/// Each record carries a state id so the session can tell whether the
/// document is back at the state it was last saved in.
#[derive(Debug, Clone)]
pub struct History {
    /// Undoable records, most recent at the back
    undo_stack: VecDeque<(u64, EditRecord)>,
    /// Redoable records, most recent on top
    redo_stack: Vec<(u64, EditRecord)>,
    /// Maximum number of undo records to keep; `None` keeps everything
    limit: Option<usize>,
    /// Whether typing bursts are merged
    coalesce: bool,
    /// Set when the current burst has ended and the next commit must
    /// start a fresh record
    burst_closed: bool,
    /// Next state id to hand out
    next_id: u64,
    /// State reached by the oldest trimmed record, if any were trimmed
    base: Option<u64>,
    /// State at the last save
    saved: Option<u64>,
}

impl History {
    /// Creates an unbounded history.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Creates a history keeping at most `limit` undo records, or every
    /// record when `limit` is `None`.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.map(|n| n.max(1)),
            coalesce: true,
            burst_closed: false,
            next_id: 1,
            base: None,
            saved: None,
        }
    }

    /// Changes the record limit, dropping the oldest records if the undo
    /// stack is already over it.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit.map(|n| n.max(1));
        self.trim();
    }

    /// Enables or disables typing-burst coalescing.
    pub fn set_coalescing(&mut self, enabled: bool) {
        self.coalesce = enabled;
    }

    /// Ends the current typing burst. The next commit starts a new record.
    pub fn break_coalescing(&mut self) {
        self.burst_closed = true;
    }

    /// Pushes a committed edit onto the undo stack and drops redo history.
    ///
    /// A record that changes nothing is ignored.
    pub fn commit(&mut self, record: EditRecord) {
        if record.is_noop() {
            return;
        }
        self.redo_stack.clear();

        let saved = self.saved;
        let id = self.fresh_id();
        let burst_closed = std::mem::take(&mut self.burst_closed);
        if self.coalesce && !burst_closed {
            if let Some((top_id, top)) = self.undo_stack.back_mut() {
                if Some(*top_id) != saved && top.can_coalesce(&record) {
                    top.coalesce(record);
                    *top_id = id;
                    return;
                }
            }
        }

        tracing::debug!(
            offset = record.offset,
            removed = record.removed.chars().count(),
            inserted = record.inserted.chars().count(),
            "committed edit"
        );
        self.undo_stack.push_back((id, record));
        self.trim();
    }

    fn trim(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.undo_stack.len() > limit {
            if let Some((dropped, _)) = self.undo_stack.pop_front() {
                self.base = Some(dropped);
            }
        }
    }

    /// Reverts the most recent record and restores the selection it was
    /// made from.
    pub fn undo(
        &mut self,
        buffer: &mut TextBuffer,
        selection: &mut Selection,
    ) -> BufferResult<()> {
        let (id, record) = self.undo_stack.pop_back().ok_or(BufferError::NothingToUndo)?;

        if let Err(err) = record.revert(buffer) {
            self.undo_stack.push_back((id, record));
            return Err(err);
        }

        tracing::debug!(offset = record.offset, "undo");
        self.burst_closed = true;
        *selection = record.before;
        self.redo_stack.push((id, record));
        Ok(())
    }

    /// Re-applies the most recently undone record and restores the
    /// selection it left behind.
    pub fn redo(
        &mut self,
        buffer: &mut TextBuffer,
        selection: &mut Selection,
    ) -> BufferResult<()> {
        let (id, record) = self.redo_stack.pop().ok_or(BufferError::NothingToRedo)?;

        if let Err(err) = record.apply(buffer) {
            self.redo_stack.push((id, record));
            return Err(err);
        }

        tracing::debug!(offset = record.offset, "redo");
        self.burst_closed = true;
        *selection = record.after;
        self.undo_stack.push_back((id, record));
        Ok(())
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Records the current state as the saved one.
    pub fn mark_saved(&mut self) {
        self.saved = self.current_state();
    }

    /// Returns true if the document differs from the last saved state.
    pub fn is_dirty(&self) -> bool {
        self.current_state() != self.saved
    }

    /// Clears all history; the current state becomes the saved one.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.base = None;
        self.saved = None;
        self.burst_closed = false;
    }

    fn current_state(&self) -> Option<u64> {
        self.undo_stack.back().map(|(id, _)| *id).or(self.base)
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
