//! Cursor placement for the input box.
//!
//! `CursorState` holds a byte offset into the buffer owned by `InputBox` and
//! the internal scroll offset. Every method takes the buffer explicitly.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::text_wrap::{
    CONTENT_OFFSET_X, MAX_VISIBLE_LINES, inner_width, wrap_line_count, wrap_options,
};

pub(super) struct CursorState {
    /// Byte offset in the buffer (0..=buffer.len())
    pub pos: usize,
    /// First wrapped line shown when the content is taller than the box
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Wrapped line and display column of the cursor.
    fn line_and_column(&self, buffer: &str, width: u16) -> (u16, u16) {
        let before = &buffer[..self.pos];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[line_start..];

        // Lines above the current logical line
        let lines_above = if line_start == 0 {
            0
        } else {
            wrap_line_count(&before[..line_start], width).saturating_sub(1)
        };

        let segments = textwrap::wrap(logical, wrap_options(width));
        let wrapped_above = segments.len().saturating_sub(1) as u16;
        // textwrap drops the spaces it breaks on, so locate the last segment in
        // the logical line and measure from there (keeps typed trailing spaces).
        let mut start = 0;
        let mut search_from = 0;
        for segment in &segments {
            if let Some(found) = logical[search_from..].find(segment.as_ref()) {
                start = search_from + found;
                search_from = start + segment.len();
            }
        }
        let column = logical[start..].width();

        (lines_above + wrapped_above, column as u16)
    }

    /// Keep the cursor's line inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16) {
        let width = inner_width(area_width);
        if width == 0 || wrap_line_count(buffer, width) <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let (line, _) = self.line_and_column(buffer, width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Screen position (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + 1, area.y + 1);
        }
        let (line, column) = self.line_and_column(buffer, width);
        let visible_line = line.saturating_sub(self.scroll_offset);
        (
            area.x + CONTENT_OFFSET_X + column.min(width),
            area.y + 1 + visible_line,
        )
    }
}
