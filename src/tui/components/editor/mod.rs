//! # Editor Component
//!
//! Multi-line source editor with Ice highlighting and block-aware indentation.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, newline, tab)
//! - Handle editing (backspace, delete, cursor movement)
//! - Indent new lines from the language mode and dedent a typed `}`
//! - Render highlighted source with a visible cursor
//!
//! ## State Management
//!
//! The buffer is internal state; the parent mirrors it into the console on
//! every `ContentChanged`. Cursor position and vertical scroll are
//! encapsulated in `CursorState`.

mod cursor;
mod text_nav;
pub mod theme;

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::language::LANGUAGE_MODE;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_nav::{VERTICAL_OVERHEAD, line_end, line_start, next_char_boundary, prev_char_boundary};

/// High-level events emitted by the Editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The buffer changed
    ContentChanged,
    /// Only the cursor moved
    CursorMoved,
}

pub struct Editor {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Columns per indentation level (Prop)
    pub indent_unit: usize,
    cursor: CursorState,
}

impl Editor {
    /// Creates an editor holding `source`, cursor at the end.
    pub fn new(source: impl Into<String>, indent_unit: usize) -> Self {
        let buffer = source.into();
        let cursor = CursorState::new(buffer.len());
        Self {
            buffer,
            indent_unit,
            cursor,
        }
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor.pos
    }

    /// Zero-based (line, column) of the cursor.
    pub fn line_col(&self) -> (usize, usize) {
        self.cursor.line_col(&self.buffer)
    }

    /// Screen position of the cursor when the editor was drawn into `area`.
    pub fn cursor_screen_pos(&self, area: Rect) -> (u16, u16) {
        self.cursor.screen_pos(&self.buffer, area)
    }

    /// Replaces `range` with `text` and leaves the cursor after it.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let start = range.start;
        self.buffer.replace_range(range, text);
        self.cursor.pos = start + text.len();
    }

    fn insert_str(&mut self, text: &str) {
        let pos = self.cursor.pos;
        self.replace_range(pos..pos, text);
    }

    /// Inserts one indentation unit of spaces.
    pub fn indent(&mut self) {
        let unit = " ".repeat(self.indent_unit);
        self.insert_str(&unit);
    }

    /// Breaks the line and indents the new one for its enclosing block.
    fn newline(&mut self) {
        self.insert_str("\n");
        let start = self.cursor.pos;
        let width = LANGUAGE_MODE.indent_with_unit(&self.buffer, start, self.indent_unit);

        // Whitespace carried over from the split line is replaced, not kept
        let carried = self.buffer[start..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .map(char::len_utf8)
            .sum::<usize>();
        self.replace_range(start..start + carried, &" ".repeat(width));
    }

    /// Types `c`. A `}` typed on an otherwise blank line snaps to the
    /// indentation of the block it closes.
    fn insert_char(&mut self, c: char) {
        let start = line_start(&self.buffer, self.cursor.pos);
        let only_blanks = self.buffer[start..self.cursor.pos]
            .chars()
            .all(|ch| ch == ' ' || ch == '\t');

        let mut encoded = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut encoded));

        if c == '}' && only_blanks {
            let closing = self.cursor.pos - 1;
            let width = LANGUAGE_MODE.indent_with_unit(&self.buffer, start, self.indent_unit);
            self.replace_range(start..closing, &" ".repeat(width));
            self.cursor.pos += 1;
        }
    }
}

impl Component for Editor {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible_lines = area.height.saturating_sub(VERTICAL_OVERHEAD);
        self.cursor.update_scroll_offset(&self.buffer, visible_lines);

        let spans = LANGUAGE_MODE.highlight(&self.buffer);
        let lines = theme::highlighted_lines(&self.buffer, &spans);

        let (line, col) = self.line_col();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Source ")
            .title_bottom(format!(" {}:{} ", line + 1, col + 1));

        let editor = Paragraph::new(lines)
            .block(block)
            .scroll((self.cursor.scroll_offset, 0));

        frame.render_widget(editor, area);

        let (cursor_x, cursor_y) = self.cursor.screen_pos(&self.buffer, area);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

impl EventHandler for Editor {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.insert_char(*c);
                Some(EditorEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals deliver pasted newlines as CR
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert_str(&text);
                Some(EditorEvent::ContentChanged)
            }
            TuiEvent::Newline => {
                self.newline();
                Some(EditorEvent::ContentChanged)
            }
            TuiEvent::Tab => {
                self.indent();
                Some(EditorEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(EditorEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(EditorEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                    Some(EditorEvent::CursorMoved)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                    Some(EditorEvent::CursorMoved)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                let start = line_start(&self.buffer, self.cursor.pos);
                (self.cursor.pos != start).then(|| {
                    self.cursor.pos = start;
                    EditorEvent::CursorMoved
                })
            }
            TuiEvent::CursorEnd => {
                let end = line_end(&self.buffer, self.cursor.pos);
                (self.cursor.pos != end).then(|| {
                    self.cursor.pos = end;
                    EditorEvent::CursorMoved
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1)
                .then_some(EditorEvent::CursorMoved),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1)
                .then_some(EditorEvent::CursorMoved),
            _ => None,
        }
    }
}
