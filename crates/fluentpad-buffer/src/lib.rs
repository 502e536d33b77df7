//! # Fluentpad Buffer
//!
//! The data layer of the editing core: document text, line boundaries,
//! the selection that points into it, and the reversible edit history.
//!
//! ## Offsets
//!
//! Every position in this crate is a zero-based *character* offset
//! (Unicode scalar values), never a byte index. Line numbers only show up
//! at the edges, through [`TextBuffer::line_range`] and
//! [`TextBuffer::line_of_offset`].
//!
//! ## Ownership
//!
//! - `TextBuffer` owns the rope and its line-start index
//! - `Selection` is a plain `Copy` value held by the editing session
//! - `History` owns the edit records and replays them against a buffer
//!   it borrows mutably for the duration of an undo/redo

mod buffer;
mod history;
mod line_index;
mod selection;

pub use buffer::{TextBuffer, remap_offset};
pub use history::{EditRecord, History};
pub use line_index::LineIndex;
pub use selection::Selection;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Offset {offset} is out of range for a buffer of {len} characters")]
    OutOfRange { offset: usize, len: usize },

    #[error("Line {line} is out of range ({count} lines)")]
    LineOutOfRange { line: usize, count: usize },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_chars(), 0);
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_edit_and_undo_through_history() {
        let mut buffer = TextBuffer::from("Hello");
        let mut selection = Selection::cursor(5);
        let mut history = History::new();

        buffer.insert(5, " World").unwrap();
        let after = Selection::cursor(11);
        history.commit(EditRecord::new(5, "", " World", selection, after));
        selection = after;

        history.undo(&mut buffer, &mut selection).unwrap();
        assert_eq!(buffer.text(), "Hello");
        assert_eq!(selection, Selection::cursor(5));

        history.redo(&mut buffer, &mut selection).unwrap();
        assert_eq!(buffer.text(), "Hello World");
        assert_eq!(selection, Selection::cursor(11));
    }

    #[test]
    fn test_error_messages() {
        let err = BufferError::OutOfRange { offset: 9, len: 3 };
        assert_eq!(
            err.to_string(),
            "Offset 9 is out of range for a buffer of 3 characters"
        );
        assert_eq!(BufferError::NothingToUndo.to_string(), "Nothing to undo");
    }
}
