//! # TitleBar Component
//!
//! Top status bar: application name, interpreter, and the console's status
//! message, over a one-line separator.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     console.interpreter_name().to_string(),
//!     console.status_message.clone(),
//!     tui.output_pane.tracker.state().raised(threshold),
//! );
//! title_bar.render(frame, area);
//! ```
//!
//! ### Raised Separator
//!
//! Once the output pane is scrolled past the header threshold the separator
//! turns bold, the terminal stand-in for a sticky header's drop shadow.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

/// Rows the title bar occupies: text plus separator.
pub const TITLE_BAR_HEIGHT: u16 = 2;

pub struct TitleBar {
    /// Interpreter shown after the app name (e.g., "ice")
    pub interpreter_name: String,
    /// Status message (e.g., "Running...", "Run #2 succeeded at 10:42:07")
    pub status_message: String,
    /// Whether the output pane is scrolled past the header threshold
    pub raised: bool,
}

impl TitleBar {
    pub fn new(interpreter_name: String, status_message: String, raised: bool) -> Self {
        Self {
            interpreter_name,
            status_message,
            raised,
        }
    }

    fn title_text(&self) -> String {
        if self.status_message.is_empty() {
            format!("icepad (interpreter: {})", self.interpreter_name)
        } else {
            format!(
                "icepad (interpreter: {}) | {}",
                self.interpreter_name, self.status_message
            )
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [text_area, separator_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        frame.render_widget(
            Line::from(Span::styled(
                self.title_text(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            text_area,
        );

        let separator_style = if self.raised {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        let separator = Block::default()
            .borders(Borders::TOP)
            .border_type(if self.raised {
                BorderType::Thick
            } else {
                BorderType::Plain
            })
            .border_style(separator_style);
        frame.render_widget(separator, separator_area);
    }
}
