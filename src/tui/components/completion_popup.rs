//! # Completion Popup
//!
//! Candidate list for the word before the editor cursor. Shown while the
//! word has at least one catalog match; Tab accepts, Ctrl+N/Ctrl+P cycle.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `CompletionState` lives in `TuiState`
//! - `CompletionPopup` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use crate::language::LANGUAGE_MODE;
use crate::language::completion::{Completion, word_before};
use crate::tui::event::TuiEvent;

/// Most candidates shown at once.
const MAX_VISIBLE: u16 = 6;

/// Persistent state for the completion popup.
#[derive(Default)]
pub struct CompletionState {
    pub candidates: Vec<&'static Completion>,
    /// Byte offset where the word being completed starts
    pub word_start: usize,
    pub selected: usize,
    pub list_state: ListState,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn close(&mut self) {
        self.candidates.clear();
        self.selected = 0;
        self.list_state.select(None);
    }

    /// Recomputes candidates for the word ending at `cursor`. A word that
    /// already equals its only candidate closes the popup.
    pub fn refresh(&mut self, source: &str, cursor: usize) {
        let (start, prefix) = word_before(source, cursor);
        let candidates = LANGUAGE_MODE.complete(prefix);
        let exact = matches!(candidates.as_slice(), [only] if only.label == prefix);

        if exact || candidates.is_empty() {
            self.close();
            return;
        }
        self.word_start = start;
        self.candidates = candidates;
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    /// Moves the selection for Ctrl+N / Ctrl+P, wrapping at the ends.
    pub fn handle_event(&mut self, event: &TuiEvent) -> bool {
        if !self.is_open() {
            return false;
        }
        let len = self.candidates.len();
        match event {
            TuiEvent::NextCompletion => self.selected = (self.selected + 1) % len,
            TuiEvent::PrevCompletion => self.selected = (self.selected + len - 1) % len,
            _ => return false,
        }
        self.list_state.select(Some(self.selected));
        true
    }

    pub fn selected(&self) -> Option<&'static Completion> {
        self.candidates.get(self.selected).copied()
    }
}

/// Transient render wrapper for the completion popup.
pub struct CompletionPopup<'a> {
    state: &'a mut CompletionState,
    /// Screen position of the editor cursor
    anchor: (u16, u16),
}

impl<'a> CompletionPopup<'a> {
    pub fn new(state: &'a mut CompletionState, anchor: (u16, u16)) -> Self {
        Self { state, anchor }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.state.is_open() {
            return;
        }
        let popup = popup_rect(self.anchor, &self.state.candidates, area);
        frame.render_widget(Clear, popup);

        let items: Vec<ListItem> = self
            .state
            .candidates
            .iter()
            .enumerate()
            .map(|(i, completion)| {
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let mut spans = vec![
                    Span::styled(completion.label, style),
                    Span::styled(
                        format!("  {}", completion.kind.label()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if let Some(info) = completion.info {
                    spans.push(Span::styled(
                        format!("  {info}"),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let list = List::new(items).block(block);

        frame.render_stateful_widget(list, popup, &mut self.state.list_state);
    }
}

/// Places the popup just below the cursor, clamped inside `area`.
fn popup_rect(anchor: (u16, u16), candidates: &[&Completion], area: Rect) -> Rect {
    let widest = candidates
        .iter()
        .map(|c| {
            let info = c.info.map_or(0, |i| i.len() + 2);
            c.label.len() + c.kind.label().len() + 2 + info
        })
        .max()
        .unwrap_or(0) as u16;
    let width = (widest + 2).min(area.width);
    let height = (candidates.len() as u16).min(MAX_VISIBLE) + 2;
    let height = height.min(area.height);

    let (x, y) = anchor;
    let right = area.x + area.width;
    let bottom = area.y + area.height;
    let x = x.min(right.saturating_sub(width)).max(area.x);
    let below = y + 1;
    let y = if below + height <= bottom {
        below
    } else {
        y.saturating_sub(height).max(area.y)
    };
    Rect::new(x, y, width, height)
}
