use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::state::Console;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{CompletionPopup, OutputPane, TITLE_BAR_HEIGHT, TitleBar};

const KEY_HINTS: &str =
    "Ctrl+R run · Tab complete · Ctrl+N/P cycle · PgUp/PgDn scroll · Esc quit";

/// Splits the frame into title, editor, output and hint rows.
pub fn layout(area: Rect) -> [Rect; 4] {
    use Constraint::{Length, Min, Percentage};
    Layout::vertical([Length(TITLE_BAR_HEIGHT), Percentage(55), Min(3), Length(1)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, console: &Console, tui: &mut TuiState) {
    let [title_area, editor_area, output_area, hint_area] = layout(frame.area());

    let raised = tui.output_pane.tracker.state().raised(tui.header_threshold);
    let mut title_bar = TitleBar::new(
        console.interpreter_name().to_string(),
        console.status_message.clone(),
        raised,
    );
    title_bar.render(frame, title_area);

    tui.editor.render(frame, editor_area);

    OutputPane::new(
        &mut tui.output_pane,
        console.output().entries(),
        console.phase(),
        console.last_result(),
        console.run_count,
        console.generation,
        tui.header_threshold,
    )
    .render(frame, output_area);

    frame.render_widget(
        Line::from(Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray))),
        hint_area,
    );

    // Overlay last so it draws above the output pane
    let anchor = tui.editor.cursor_screen_pos(editor_area);
    CompletionPopup::new(&mut tui.completion, anchor).render(frame, frame.area());
}
