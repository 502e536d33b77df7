//! The editing session.
//!
//! One `EditingSession` per open document. It exclusively owns the
//! buffer, the selection, the undo history and the viewport, and exposes
//! the intents the presentation layer sends: edits, cursor motions,
//! undo/redo, find, scroll and zoom. Each intent returns the state the
//! caller needs next; there are no callbacks and no globals.

use fluentpad_buffer::{BufferError, EditRecord, History, Selection, TextBuffer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::search::{self, Direction, SearchMatch, SearchOptions, SearchQuery};
use crate::viewport::{GutterLines, Viewport, ViewportState};
use crate::CoreResult;

/// Where a cursor motion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Absolute character offset, saturated to the document
    Offset(usize),
    /// One grapheme cluster left
    Left,
    /// One grapheme cluster right
    Right,
    /// One line up, keeping the goal column
    Up,
    /// One line down, keeping the goal column
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// Result of an edit or cursor intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Selection after the intent
    pub selection: Selection,
    /// Whether the document differs from its last saved state
    pub dirty: bool,
}

/// Values for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    /// One-based line of the cursor
    pub line: usize,
    /// One-based character column of the cursor
    pub column: usize,
    /// One-based column in monospace cells
    pub display_column: usize,
    /// Total characters in the document
    pub char_count: usize,
    pub zoom_percent: u32,
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ln {}, Col {}  {} characters  {}%",
            self.line, self.column, self.char_count, self.zoom_percent
        )
    }
}

/// A single document being edited.
#[derive(Debug, Clone)]
pub struct EditingSession {
    /// The underlying text buffer
    buffer: TextBuffer,

    /// Cursor and selection
    selection: Selection,

    /// Undo/redo records
    history: History,

    /// Scroll and zoom
    viewport: Viewport,

    config: Config,

    /// Session-local clipboard for cut/copy/paste
    clipboard: String,

    /// Column that vertical motions try to return to
    goal_column: Option<usize>,
}

impl EditingSession {
    /// Creates an empty session.
    pub fn new(config: Config) -> Self {
        let mut history = History::with_limit(config.editor.undo_limit);
        history.set_coalescing(config.editor.coalesce_typing);

        Self {
            buffer: TextBuffer::new(),
            selection: Selection::default(),
            history,
            viewport: Viewport::new(config.view.visible_lines),
            config,
            clipboard: String::new(),
            goal_column: None,
        }
    }

    /// Creates a session holding loaded text.
    pub fn from_text(text: &str, config: Config) -> Self {
        let mut session = Self::new(config);
        session.load(text);
        session
    }

    // ==================== Load / Save ====================

    /// Replaces the document with freshly loaded text and forgets all
    /// history. The result is clean.
    pub fn load(&mut self, text: &str) {
        self.buffer = TextBuffer::from(text);
        self.selection = Selection::default();
        self.history.clear();
        self.goal_column = None;
        self.viewport.scroll_to(0, self.buffer.line_count());
        tracing::debug!(
            chars = self.buffer.len_chars(),
            lines = self.buffer.line_count(),
            "loaded document"
        );
    }

    /// Full document text, for saving.
    pub fn text(&self) -> Cow<'_, str> {
        self.buffer.text()
    }

    /// Records that the current text has been written out.
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Returns true if the document has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    // ==================== Getters ====================

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration. Existing history is kept, trimmed to
    /// a new undo limit if there is one; the viewport takes the new line
    /// count and zoom range.
    pub fn set_config(&mut self, config: Config) {
        self.history.set_limit(config.editor.undo_limit);
        self.history.set_coalescing(config.editor.coalesce_typing);
        self.viewport.resize(config.view.visible_lines);
        self.viewport.set_zoom(self.viewport.zoom_factor(), &config.view);
        self.config = config;
        self.follow_cursor();
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Text covered by the selection.
    pub fn selected_text(&self) -> Cow<'_, str> {
        self.selection.selected_text(&self.buffer)
    }

    // ==================== Editing ====================

    /// Types `text`, replacing the selection if there is one.
    pub fn insert(&mut self, text: &str) -> CoreResult<EditOutcome> {
        self.replace(self.selection.range(), text)
    }

    /// Deletes the selection, or one grapheme cluster next to the cursor.
    pub fn delete(&mut self, direction: Direction) -> CoreResult<EditOutcome> {
        let range = if !self.selection.is_empty() {
            self.selection.range()
        } else {
            let head = self.selection.head;
            match direction {
                Direction::Backward => self.buffer.prev_grapheme_boundary(head)..head,
                Direction::Forward => head..self.buffer.next_grapheme_boundary(head),
            }
        };
        self.replace(range, "")
    }

    /// Copies the selection to the session clipboard.
    pub fn copy(&mut self) -> EditOutcome {
        if !self.selection.is_empty() {
            self.clipboard = self.selected_text().into_owned();
        }
        self.outcome()
    }

    /// Copies the selection and deletes it.
    pub fn cut(&mut self) -> CoreResult<EditOutcome> {
        if self.selection.is_empty() {
            return Ok(self.outcome());
        }
        self.copy();
        self.replace(self.selection.range(), "")
    }

    /// Inserts the session clipboard.
    pub fn paste(&mut self) -> CoreResult<EditOutcome> {
        let text = self.clipboard.clone();
        self.insert(&text)
    }

    /// Replaces `range` with `text` as one undoable edit, leaving the
    /// cursor after the inserted text.
    fn replace(&mut self, range: Range<usize>, text: &str) -> CoreResult<EditOutcome> {
        if range.is_empty() && text.is_empty() {
            return Ok(self.outcome());
        }

        let before = self.selection;
        let offset = range.start;
        let removed = self.buffer.delete(offset, range.len())?;
        self.buffer.insert(offset, text)?;

        // the caret lands where the end of the replaced range moves to
        let mut after = Selection::cursor(range.end);
        after.remap(offset, range.len(), text.chars().count());
        self.selection = after;
        self.history
            .commit(EditRecord::new(offset, removed, text, before, self.selection));

        self.goal_column = None;
        self.follow_cursor();
        Ok(self.outcome())
    }

    // ==================== Undo/Redo ====================

    /// Reverts the last edit. Fails with `NothingToUndo` when there is
    /// none, leaving everything unchanged.
    pub fn undo(&mut self) -> CoreResult<EditOutcome> {
        self.history.undo(&mut self.buffer, &mut self.selection)?;
        self.goal_column = None;
        self.follow_cursor();
        Ok(self.outcome())
    }

    /// Re-applies the last undone edit. Fails with `NothingToRedo` when
    /// there is none.
    pub fn redo(&mut self) -> CoreResult<EditOutcome> {
        self.history.redo(&mut self.buffer, &mut self.selection)?;
        self.goal_column = None;
        self.follow_cursor();
        Ok(self.outcome())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor, dropping any selection.
    pub fn move_cursor(&mut self, motion: Motion) -> EditOutcome {
        // Left/Right on a selection collapse it to the matching side
        let target = match (motion, self.selection.is_empty()) {
            (Motion::Left, false) => self.selection.start(),
            (Motion::Right, false) => self.selection.end(),
            _ => self.target(motion),
        };
        if matches!(motion, Motion::Left | Motion::Right) {
            self.goal_column = None;
        }
        self.selection.move_to(target, &self.buffer);
        self.history.break_coalescing();
        self.follow_cursor();
        self.outcome()
    }

    /// Moves the head, keeping the anchor.
    pub fn extend_selection(&mut self, motion: Motion) -> EditOutcome {
        let target = self.target(motion);
        self.selection.extend(target, &self.buffer);
        self.history.break_coalescing();
        self.follow_cursor();
        self.outcome()
    }

    /// Selects `range`, saturated to the document, head at its end.
    pub fn select(&mut self, range: Range<usize>) -> EditOutcome {
        self.selection.select(range, &self.buffer);
        self.goal_column = None;
        self.history.break_coalescing();
        self.follow_cursor();
        self.outcome()
    }

    pub fn select_all(&mut self) -> EditOutcome {
        self.select(0..self.buffer.len_chars())
    }

    /// Resolves a motion to an offset and updates the goal column.
    fn target(&mut self, motion: Motion) -> usize {
        let head = self.selection.head;
        let line = self.buffer.line_of_offset(head);

        if !matches!(motion, Motion::Up | Motion::Down) {
            self.goal_column = None;
        }

        match motion {
            Motion::Offset(offset) => offset,
            Motion::Left => self.buffer.prev_grapheme_boundary(head),
            Motion::Right => self.buffer.next_grapheme_boundary(head),
            Motion::Up if line == 0 => 0,
            Motion::Up => self.vertical_target(line - 1),
            Motion::Down if line + 1 >= self.buffer.line_count() => self.buffer.len_chars(),
            Motion::Down => self.vertical_target(line + 1),
            Motion::LineStart => self.line_range(line).start,
            Motion::LineEnd => self.line_range(line).end,
            Motion::DocumentStart => 0,
            Motion::DocumentEnd => self.buffer.len_chars(),
        }
    }

    fn vertical_target(&mut self, line: usize) -> usize {
        let column = *self
            .goal_column
            .get_or_insert_with(|| self.buffer.column_of_offset(self.selection.head));
        let range = self.line_range(line);
        range.start + column.min(range.len())
    }

    fn line_range(&self, line: usize) -> Range<usize> {
        self.buffer.line_range(line).unwrap_or(0..0)
    }

    // ==================== Search ====================

    /// Finds the next match after the selection and selects it.
    pub fn find_next(
        &mut self,
        pattern: &str,
        options: SearchOptions,
    ) -> CoreResult<Option<SearchMatch>> {
        self.find(pattern, Direction::Forward, options)
    }

    /// Finds the nearest match before the selection and selects it.
    pub fn find_previous(
        &mut self,
        pattern: &str,
        options: SearchOptions,
    ) -> CoreResult<Option<SearchMatch>> {
        self.find(pattern, Direction::Backward, options)
    }

    /// Search options from the configuration.
    pub fn default_search_options(&self) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.config.search.case_sensitive,
            wrap: self.config.search.wrap,
        }
    }

    /// Number of matches of `pattern` in the document.
    pub fn match_count(&self, pattern: &str, case_sensitive: bool) -> CoreResult<usize> {
        Ok(search::find_all(&self.buffer, pattern, case_sensitive)?.len())
    }

    fn find(
        &mut self,
        pattern: &str,
        direction: Direction,
        options: SearchOptions,
    ) -> CoreResult<Option<SearchMatch>> {
        let start = match direction {
            Direction::Forward => self.selection.end(),
            Direction::Backward => self.selection.start(),
        };
        let query = SearchQuery::new(pattern)
            .direction(direction)
            .start(start)
            .options(options);

        let found = search::find(&self.buffer, &query)?;
        if let Some(m) = found {
            self.selection.select(m.range(), &self.buffer);
            self.goal_column = None;
            self.history.break_coalescing();
            self.follow_cursor();
        }
        Ok(found)
    }

    // ==================== Viewport ====================

    /// Scrolls so `line` is at the top.
    pub fn scroll_to(&mut self, line: usize) -> ViewportState {
        self.viewport.scroll_to(line, self.buffer.line_count());
        tracing::debug!(first_line = self.viewport.first_line(), "scrolled");
        self.viewport_state()
    }

    /// Changes how many lines fit on screen.
    pub fn resize(&mut self, visible_lines: usize) -> ViewportState {
        self.viewport.resize(visible_lines);
        self.viewport_state()
    }

    /// Sets the zoom factor; invalid factors leave it unchanged.
    pub fn set_zoom(&mut self, factor: f32) -> ViewportState {
        if !self.viewport.set_zoom(factor, &self.config.view) {
            tracing::debug!(factor, "ignored invalid zoom factor");
        }
        self.viewport_state()
    }

    pub fn zoom_in(&mut self) -> ViewportState {
        self.viewport.zoom_in(&self.config.view);
        self.viewport_state()
    }

    pub fn zoom_out(&mut self) -> ViewportState {
        self.viewport.zoom_out(&self.config.view);
        self.viewport_state()
    }

    pub fn reset_zoom(&mut self) -> ViewportState {
        self.viewport.reset_zoom();
        self.viewport_state()
    }

    /// Current viewport, for rendering.
    pub fn viewport_state(&self) -> ViewportState {
        self.viewport
            .state(&self.buffer, self.selection.head, &self.config.view)
    }

    /// Line containing the cursor head.
    pub fn current_line(&self) -> usize {
        Viewport::current_line(&self.buffer, self.selection.head)
    }

    /// Gutter rows for the visible lines.
    pub fn gutter(&self) -> GutterLines {
        self.viewport
            .visible_line_numbers(self.buffer.line_count(), self.current_line())
    }

    /// Status line values.
    pub fn status(&self) -> StatusInfo {
        let head = self.selection.head;
        let line = self.current_line();
        let line_start = self.line_range(line).start;
        let prefix = self
            .buffer
            .text_at(line_start, head - line_start)
            .unwrap_or_default();

        StatusInfo {
            line: line + 1,
            column: head - line_start + 1,
            display_column: prefix.width() + 1,
            char_count: self.buffer.len_chars(),
            zoom_percent: self.viewport.zoom_percent(),
        }
    }

    fn follow_cursor(&mut self) {
        self.viewport.clamp(self.buffer.line_count());
        self.viewport.ensure_visible(self.current_line());
    }

    fn outcome(&self) -> EditOutcome {
        EditOutcome {
            selection: self.selection,
            dirty: self.is_dirty(),
        }
    }
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Returns true if `err` is the normal "history exhausted" outcome rather
/// than a real failure.
pub fn is_history_exhausted(err: &crate::CoreError) -> bool {
    matches!(
        err,
        crate::CoreError::Buffer(BufferError::NothingToUndo | BufferError::NothingToRedo)
    )
}
