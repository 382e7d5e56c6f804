//! Cursor position tracking and navigation for the Editor.
//!
//! `CursorState` owns the cursor byte offset and the first visible line.
//! Navigation methods take `buffer: &str` explicitly; the text itself is
//! owned by `Editor`.

use super::text_nav::{BORDER_OFFSET, line_end, line_start, offset_at_column};
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible line when the buffer is taller than the pane
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new(pos: usize) -> Self {
        Self {
            pos,
            scroll_offset: 0,
        }
    }

    /// Zero-based (line, column) of the cursor. Columns count characters.
    pub fn line_col(&self, buffer: &str) -> (usize, usize) {
        let before = &buffer[..self.pos];
        let line = before.matches('\n').count();
        let col = before[line_start(buffer, self.pos)..].chars().count();
        (line, col)
    }

    /// Move one line up or down, keeping the column where the target line allows.
    ///
    /// Returns `true` if cursor moved, `false` if already at boundary.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let (_, col) = self.line_col(buffer);
        let current_start = line_start(buffer, self.pos);

        let target_start = if direction < 0 {
            if current_start == 0 {
                return false;
            }
            line_start(buffer, current_start - 1)
        } else {
            let end = line_end(buffer, self.pos);
            if end == buffer.len() {
                return false;
            }
            end + 1
        };

        self.pos = offset_at_column(buffer, target_start, col);
        true
    }

    /// Update scroll offset to keep the cursor line inside `visible_lines`.
    pub fn update_scroll_offset(&mut self, buffer: &str, visible_lines: u16) {
        if visible_lines == 0 {
            return;
        }
        let (line, _) = self.line_col(buffer);
        let line = line as u16;

        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + visible_lines {
            self.scroll_offset = line - (visible_lines - 1);
        }
    }

    /// Screen position of the cursor inside a bordered `area`, as (column, row).
    ///
    /// Unlike `line_col`, the column here is a display width, so wide
    /// characters before the cursor push it two cells.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (line, _) = self.line_col(buffer);
        let col = buffer[line_start(buffer, self.pos)..self.pos].width();
        let max_col = area.width.saturating_sub(BORDER_OFFSET * 2 + 1);
        let visible_line = (line as u16).saturating_sub(self.scroll_offset);

        let screen_col = area.x + BORDER_OFFSET + (col as u16).min(max_col);
        let screen_row = area.y + BORDER_OFFSET + visible_line;
        (screen_col, screen_row)
    }
}
