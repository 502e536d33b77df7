//! # Fluentpad Core
//!
//! Editing logic above the buffer: search, the viewport/gutter mapper,
//! configuration, and the editing session that ties them together.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────── EditingSession ───────────────────────────┐
//! │  TextBuffer ── Selection ── History        Viewport        Config     │
//! │       │                                        │                      │
//! │       └──────── search::find ──────────────────┘                      │
//! └───────────────────────────────────────────────────────────────────────┘
//!             ▲ Command / intent calls          │ outcomes, ViewportState
//!             │                                 ▼
//!                         presentation layer
//! ```
//!
//! The session never calls back into the presentation layer. Every
//! intent returns the state the caller needs to redraw.

pub mod command;
pub mod config;
pub mod search;
pub mod session;
pub mod viewport;

pub use command::{Command, CommandOutcome};
pub use config::{Config, ConfigError};
pub use search::{Direction, SearchError, SearchMatch, SearchOptions, SearchQuery};
pub use session::{EditOutcome, EditingSession, Motion, StatusInfo};
pub use viewport::{GutterLine, GutterLines, LineMetrics, Viewport, ViewportState};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Buffer error: {0}")]
    Buffer(#[from] fluentpad_buffer::BufferError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
