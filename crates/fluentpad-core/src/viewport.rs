//! Viewport and gutter mapping.
//!
//! The viewport is the window of lines the presentation layer draws:
//! a first line, a line count, and a zoom level. From those plus the
//! buffer's line count and the cursor head it derives everything the
//! gutter needs. Zoom is only a scale on reported metrics; it never
//! touches offsets, line indices or text.

use fluentpad_buffer::TextBuffer;
use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;

/// Zoom level at 100%.
pub const DEFAULT_ZOOM: u32 = 100;

/// Scroll position, visible line count and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    first_line: usize,
    visible_lines: usize,
    zoom_percent: u32,
}

impl Viewport {
    /// Creates a viewport at the top of the document, unzoomed.
    pub fn new(visible_lines: usize) -> Self {
        Self {
            first_line: 0,
            visible_lines: visible_lines.max(1),
            zoom_percent: DEFAULT_ZOOM,
        }
    }

    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    pub fn zoom_percent(&self) -> u32 {
        self.zoom_percent
    }

    /// Zoom as a scale factor, 1.0 at 100%.
    pub fn zoom_factor(&self) -> f32 {
        self.zoom_percent as f32 / 100.0
    }

    // ==================== Scrolling ====================

    /// Scrolls so `line` is the first visible line, clamped to the
    /// document.
    pub fn scroll_to(&mut self, line: usize, line_count: usize) {
        self.first_line = line.min(line_count.saturating_sub(1));
    }

    /// Changes how many lines fit on screen.
    pub fn resize(&mut self, visible_lines: usize) {
        self.visible_lines = visible_lines.max(1);
    }

    /// Scrolls the minimum amount needed to show `line`.
    pub fn ensure_visible(&mut self, line: usize) {
        if line < self.first_line {
            self.first_line = line;
        } else if line >= self.first_line + self.visible_lines {
            self.first_line = line + 1 - self.visible_lines;
        }
    }

    /// Pulls the scroll position back inside a document that shrank.
    pub fn clamp(&mut self, line_count: usize) {
        self.first_line = self.first_line.min(line_count.saturating_sub(1));
    }

    // ==================== Zoom ====================

    /// Sets the zoom from a scale factor, saturating into the configured
    /// range. Returns false, leaving the zoom alone, for a factor that is
    /// not a positive finite number.
    pub fn set_zoom(&mut self, factor: f32, config: &ViewConfig) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let percent = (factor * 100.0).round() as u32;
        self.zoom_percent = percent.clamp(config.min_zoom, config.max_zoom.max(config.min_zoom));
        true
    }

    pub fn zoom_in(&mut self, config: &ViewConfig) {
        self.zoom_percent = self
            .zoom_percent
            .saturating_add(config.zoom_step)
            .min(config.max_zoom);
    }

    pub fn zoom_out(&mut self, config: &ViewConfig) {
        self.zoom_percent = self
            .zoom_percent
            .saturating_sub(config.zoom_step)
            .max(config.min_zoom);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_percent = DEFAULT_ZOOM;
    }

    // ==================== Gutter ====================

    /// Line containing the cursor head.
    pub fn current_line(buffer: &TextBuffer, head: usize) -> usize {
        buffer.line_of_offset(head)
    }

    /// Line numbers to draw, top to bottom.
    pub fn visible_line_numbers(&self, line_count: usize, current_line: usize) -> GutterLines {
        let start = self.first_line.min(line_count);
        let end = self.first_line.saturating_add(self.visible_lines).min(line_count);
        GutterLines {
            next: start,
            end,
            current: current_line,
        }
    }

    /// Zoomed font and gutter metrics.
    pub fn metrics(&self, config: &ViewConfig, line_count: usize) -> LineMetrics {
        let factor = self.zoom_factor();
        let font_size = config.font_size * factor;
        let gutter_width = if config.line_numbers {
            config.gutter_padding + config.digit_advance * factor * digits(line_count) as f32
        } else {
            0.0
        };

        LineMetrics {
            font_size,
            line_height: font_size * config.line_height,
            gutter_width,
        }
    }

    /// Everything the presentation layer needs to draw one frame.
    pub fn state(&self, buffer: &TextBuffer, head: usize, config: &ViewConfig) -> ViewportState {
        let line_count = buffer.line_count();
        ViewportState {
            first_line: self.first_line,
            visible_lines: self.visible_lines,
            line_count,
            current_line: Self::current_line(buffer, head),
            zoom_percent: self.zoom_percent,
            zoom_factor: self.zoom_factor(),
            metrics: self.metrics(config, line_count),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewConfig::default().visible_lines)
    }
}

/// Number of decimal digits in the largest line number, at least 1.
fn digits(line_count: usize) -> usize {
    let mut n = line_count.max(1);
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Font and gutter sizes after zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    /// Font size in points
    pub font_size: f32,
    /// Line height in points
    pub line_height: f32,
    /// Gutter width in pixels
    pub gutter_width: f32,
}

/// Snapshot of the viewport for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub first_line: usize,
    pub visible_lines: usize,
    pub line_count: usize,
    pub current_line: usize,
    pub zoom_percent: u32,
    pub zoom_factor: f32,
    pub metrics: LineMetrics,
}

/// One gutter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GutterLine {
    /// Zero-based line index
    pub index: usize,
    /// Whether this is the cursor's line
    pub is_current: bool,
}

impl GutterLine {
    /// One-based number shown in the gutter.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Lazy sequence of visible gutter rows. Clone it to iterate again.
#[derive(Debug, Clone)]
pub struct GutterLines {
    next: usize,
    end: usize,
    current: usize,
}

impl Iterator for GutterLines {
    type Item = GutterLine;

    fn next(&mut self) -> Option<GutterLine> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(GutterLine {
            index,
            is_current: index == self.current,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GutterLines {}
