//! Intents as values.
//!
//! Every operation the presentation layer can ask of a session has a
//! [`Command`] variant, so intents can be queued, bound to menu entries,
//! or parsed from text (the headless driver takes them on the command
//! line). [`EditingSession::execute`] runs one and returns what changed.
//!
//! ## Text form
//!
//! ```text
//! insert:TEXT      delete-backward   delete-forward   cut  copy  paste
//! move:MOTION      extend:MOTION     select:A..B      select-all
//! undo  redo       find:PATTERN      find-prev:PATTERN
//! scroll:LINE      resize:LINES      zoom:FACTOR      zoom-in  zoom-out  zoom-reset
//! ```
//!
//! `MOTION` is `left`, `right`, `up`, `down`, `line-start`, `line-end`,
//! `start`, `end`, or a character offset. In `insert:` text, `\n` and
//! `\t` stand for newline and tab.

use std::fmt;
use std::str::FromStr;

use crate::search::{Direction, SearchMatch, SearchOptions};
use crate::session::{EditOutcome, EditingSession, Motion};
use crate::viewport::ViewportState;
use crate::{CoreError, CoreResult};

/// Built-in editor commands.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Command {
    // Edit commands
    Insert(String),
    Delete(Direction),
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,

    // Cursor and selection
    Move(Motion),
    Extend(Motion),
    Select { start: usize, end: usize },
    SelectAll,

    // Search; `None` options fall back to the session config
    FindNext {
        pattern: String,
        options: Option<SearchOptions>,
    },
    FindPrevious {
        pattern: String,
        options: Option<SearchOptions>,
    },

    // View
    ScrollTo(usize),
    Resize(usize),
    SetZoom(f32),
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

impl Command {
    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "Insert",
            Command::Delete(Direction::Backward) => "Delete Backward",
            Command::Delete(Direction::Forward) => "Delete Forward",
            Command::Cut => "Cut",
            Command::Copy => "Copy",
            Command::Paste => "Paste",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Move(_) => "Move Cursor",
            Command::Extend(_) => "Extend Selection",
            Command::Select { .. } => "Select",
            Command::SelectAll => "Select All",
            Command::FindNext { .. } => "Find Next",
            Command::FindPrevious { .. } => "Find Previous",
            Command::ScrollTo(_) => "Scroll To Line",
            Command::Resize(_) => "Resize",
            Command::SetZoom(_) => "Set Zoom",
            Command::ZoomIn => "Zoom In",
            Command::ZoomOut => "Zoom Out",
            Command::ZoomReset => "Zoom Reset",
        }
    }

    /// Returns true if the command can change the document text.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Insert(_)
                | Command::Delete(_)
                | Command::Cut
                | Command::Paste
                | Command::Undo
                | Command::Redo
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CoreError::UnknownCommand(s.to_string());
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let command = match (name, arg) {
            ("insert", Some(text)) => Command::Insert(unescape(text)),
            ("delete-backward", None) => Command::Delete(Direction::Backward),
            ("delete-forward", None) => Command::Delete(Direction::Forward),
            ("cut", None) => Command::Cut,
            ("copy", None) => Command::Copy,
            ("paste", None) => Command::Paste,
            ("undo", None) => Command::Undo,
            ("redo", None) => Command::Redo,
            ("move", Some(motion)) => Command::Move(parse_motion(motion).ok_or_else(unknown)?),
            ("extend", Some(motion)) => Command::Extend(parse_motion(motion).ok_or_else(unknown)?),
            ("select", Some(range)) => {
                let (start, end) = range.split_once("..").ok_or_else(unknown)?;
                Command::Select {
                    start: start.parse().map_err(|_| unknown())?,
                    end: end.parse().map_err(|_| unknown())?,
                }
            }
            ("select-all", None) => Command::SelectAll,
            ("find", Some(pattern)) => Command::FindNext {
                pattern: pattern.to_string(),
                options: None,
            },
            ("find-prev", Some(pattern)) => Command::FindPrevious {
                pattern: pattern.to_string(),
                options: None,
            },
            ("scroll", Some(line)) => Command::ScrollTo(line.parse().map_err(|_| unknown())?),
            ("resize", Some(lines)) => Command::Resize(lines.parse().map_err(|_| unknown())?),
            ("zoom", Some(factor)) => Command::SetZoom(factor.parse().map_err(|_| unknown())?),
            ("zoom-in", None) => Command::ZoomIn,
            ("zoom-out", None) => Command::ZoomOut,
            ("zoom-reset", None) => Command::ZoomReset,
            _ => return Err(unknown()),
        };
        Ok(command)
    }
}

fn parse_motion(s: &str) -> Option<Motion> {
    Some(match s {
        "left" => Motion::Left,
        "right" => Motion::Right,
        "up" => Motion::Up,
        "down" => Motion::Down,
        "line-start" => Motion::LineStart,
        "line-end" => Motion::LineEnd,
        "start" => Motion::DocumentStart,
        "end" => Motion::DocumentEnd,
        offset => Motion::Offset(offset.parse().ok()?),
    })
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Text or selection changed
    Edited(EditOutcome),
    /// Result of a find; `None` means no match
    Found(Option<SearchMatch>),
    /// Scroll or zoom changed
    Viewport(ViewportState),
}

impl EditingSession {
    /// Executes a command.
    pub fn execute(&mut self, command: &Command) -> CoreResult<CommandOutcome> {
        tracing::debug!(command = command.display_name(), "execute");

        let outcome = match command {
            Command::Insert(text) => CommandOutcome::Edited(self.insert(text)?),
            Command::Delete(direction) => CommandOutcome::Edited(self.delete(*direction)?),
            Command::Cut => CommandOutcome::Edited(self.cut()?),
            Command::Copy => CommandOutcome::Edited(self.copy()),
            Command::Paste => CommandOutcome::Edited(self.paste()?),
            Command::Undo => CommandOutcome::Edited(self.undo()?),
            Command::Redo => CommandOutcome::Edited(self.redo()?),

            Command::Move(motion) => CommandOutcome::Edited(self.move_cursor(*motion)),
            Command::Extend(motion) => CommandOutcome::Edited(self.extend_selection(*motion)),
            Command::Select { start, end } => CommandOutcome::Edited(self.select(*start..*end)),
            Command::SelectAll => CommandOutcome::Edited(self.select_all()),

            Command::FindNext { pattern, options } => {
                let options = options.unwrap_or_else(|| self.default_search_options());
                CommandOutcome::Found(self.find_next(pattern, options)?)
            }
            Command::FindPrevious { pattern, options } => {
                let options = options.unwrap_or_else(|| self.default_search_options());
                CommandOutcome::Found(self.find_previous(pattern, options)?)
            }

            Command::ScrollTo(line) => CommandOutcome::Viewport(self.scroll_to(*line)),
            Command::Resize(lines) => CommandOutcome::Viewport(self.resize(*lines)),
            Command::SetZoom(factor) => CommandOutcome::Viewport(self.set_zoom(*factor)),
            Command::ZoomIn => CommandOutcome::Viewport(self.zoom_in()),
            Command::ZoomOut => CommandOutcome::Viewport(self.zoom_out()),
            Command::ZoomReset => CommandOutcome::Viewport(self.reset_zoom()),
        };
        Ok(outcome)
    }
}
