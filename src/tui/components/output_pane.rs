//! # OutputPane Component
//!
//! Scrollable view of the latest run's output entries, with a collapsible
//! header line and a verdict line.
//!
//! ## Architecture
//!
//! `OutputPane` is a transient component (created each frame) that wraps
//! `&'a mut OutputPaneState` (persistent state) and the console's output
//! (props). Entry heights are cached per run generation and width.
//!
//! ```text
//! ╭ Output ──────────────────────────╮
//! │ 3 entries · run #2      (header) │  hidden while scrolling down
//! │ Hello World                      │  past the header threshold
//! │ ...                  (ScrollView)│
//! │ ✔ Success              (verdict) │
//! ╰──────────────────────────────────╯
//! ```

use log::warn;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::output::OutputEntry;
use crate::core::scroll::ScrollTracker;
use crate::core::state::RunPhase;
use crate::interpreter::RunResult;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Most rows the verdict may take; longer diagnostics wrap and are cut here.
const MAX_VERDICT_ROWS: u16 = 6;

/// Scroll and layout state for the output pane.
/// Must be persisted in the parent TuiState.
pub struct OutputPaneState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Direction-aware record of the offset, drives header collapse
    pub tracker: ScrollTracker,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for OutputPaneState {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPaneState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            tracker: ScrollTracker::subscribe(0),
            layout: LayoutCache::new(),
            viewport_height: 0,
        }
    }

    pub fn offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.layout.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Brings a finished run's output into view, starting from its first entry.
    pub fn reveal(&mut self) {
        self.scroll_state.scroll_to_top();
        self.tracker.observe(0);
    }
}

/// EventHandler lives on the state because scrolling outlives the
/// per-frame `OutputPane` wrapper.
impl EventHandler for OutputPaneState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        self.tracker.observe(self.offset());
        None
    }
}

/// Scrollable output view.
/// Created fresh each frame with references to state and data.
pub struct OutputPane<'a> {
    pub state: &'a mut OutputPaneState,
    pub entries: &'a [OutputEntry],
    pub phase: RunPhase,
    pub last_result: Option<&'a RunResult>,
    pub run_count: u64,
    /// Console generation; a new one means the entries were replaced
    pub generation: u64,
    pub header_threshold: u16,
}

impl<'a> OutputPane<'a> {
    pub fn new(
        state: &'a mut OutputPaneState,
        entries: &'a [OutputEntry],
        phase: RunPhase,
        last_result: Option<&'a RunResult>,
        run_count: u64,
        generation: u64,
        header_threshold: u16,
    ) -> Self {
        Self {
            state,
            entries,
            phase,
            last_result,
            run_count,
            generation,
            header_threshold,
        }
    }

    fn header_line(&self) -> Line<'static> {
        let noun = if self.entries.len() == 1 { "entry" } else { "entries" };
        let mut text = format!("{} {}", self.entries.len(), noun);
        if self.run_count > 0 {
            text.push_str(&format!(" · run #{}", self.run_count));
        }
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    }

    /// Success/Error indicator. A result older than the current text is
    /// dimmed. Every line of a multi-line diagnostic is kept.
    fn verdict(&self) -> Option<Paragraph<'static>> {
        if self.phase == RunPhase::Running {
            return Some(Paragraph::new(Line::from(Span::styled(
                "… Running",
                Style::default().fg(Color::Yellow),
            ))));
        }
        let stale = if self.phase == RunPhase::Idle {
            Modifier::DIM
        } else {
            Modifier::empty()
        };
        let lines = match self.last_result? {
            RunResult::Success => vec![Line::from(Span::styled(
                "✔ Success",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD | stale),
            ))],
            RunResult::Failure(message) => {
                let text_style = Style::default().fg(Color::Red).add_modifier(stale);
                let mut message_lines = message.lines();
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        "✖ Error: ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD | stale),
                    ),
                    Span::styled(message_lines.next().unwrap_or_default().to_string(), text_style),
                ])];
                lines.extend(
                    message_lines.map(|line| Line::from(Span::styled(line.to_string(), text_style))),
                );
                lines
            }
        };
        Some(Paragraph::new(lines).wrap(Wrap { trim: false }))
    }
}

impl<'a> Component for OutputPane<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Output ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header_visible = self
            .state
            .tracker
            .state()
            .header_visible(self.header_threshold);
        let verdict = self.verdict();
        let verdict_rows = verdict.as_ref().map_or(0, |paragraph| {
            clamp_rows(paragraph.line_count(inner.width)).clamp(1, MAX_VERDICT_ROWS)
        });

        let [header_area, body_area, verdict_area] = Layout::vertical([
            Constraint::Length(u16::from(header_visible)),
            Constraint::Min(1),
            Constraint::Length(verdict_rows),
        ])
        .areas(inner);

        if header_visible {
            frame.render_widget(self.header_line(), header_area);
        }
        if let Some(paragraph) = verdict {
            frame.render_widget(paragraph, verdict_area);
        }

        let content_width = body_area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update Layout Cache (Internal Mutation)
        let layout = &mut self.state.layout;
        if !layout.is_valid(self.entries.len(), content_width, self.generation) {
            layout.heights = self
                .entries
                .iter()
                .map(|entry| clamp_rows(entry_paragraph(entry).line_count(content_width)).max(1))
                .collect();
            layout.rebuild_prefix_heights();
            layout.update_metadata(self.entries.len(), content_width, self.generation);
        }
        let total_height = layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.viewport_height = body_area.height;
        self.state.clamp_scroll();

        let scroll_offset = self.state.offset();
        let visible_range = self.state.layout.visible_range(scroll_offset, body_area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };
        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(entry_paragraph(&self.entries[i]), rect);
            y_offset += height;
        }

        frame.render_stateful_widget(scroll_view, body_area, &mut self.state.scroll_state);
    }
}

/// Row counts are `u16` on screen; anything taller is cut at `u16::MAX`.
fn clamp_rows(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn entry_paragraph(entry: &OutputEntry) -> Paragraph<'_> {
    Paragraph::new(entry.text.as_str()).wrap(Wrap { trim: false })
}

/// Cached entry heights for one run generation at one width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
    generation: u64,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
            generation: 0,
        }
    }

    /// Heights stay valid until the output is cleared for a run, the width
    /// changes, or an entry arrives.
    pub fn is_valid(&self, entry_count: usize, content_width: u16, generation: u64) -> bool {
        self.entry_count == entry_count
            && self.content_width == content_width
            && self.generation == generation
            && self.heights.len() == entry_count
    }

    pub fn update_metadata(&mut self, entry_count: usize, content_width: u16, generation: u64) {
        self.entry_count = entry_count;
        self.content_width = content_width;
        self.generation = generation;
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Running totals of `heights`. The scroll view is addressed in `u16`
    /// rows, so output taller than `u16::MAX` is cut there with a warning.
    pub fn rebuild_prefix_heights(&mut self) {
        let total: usize = self.heights.iter().map(|&h| usize::from(h)).sum();
        if total > usize::from(u16::MAX) {
            warn!(
                "Output is {} rows tall; only the first {} are scrollable",
                total,
                u16::MAX
            );
        }
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
