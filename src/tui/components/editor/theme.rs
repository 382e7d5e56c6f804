//! Terminal colors for highlight tags, and conversion of highlight spans
//! into styled ratatui lines.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::language::{HighlightSpan, Tag};

pub fn style_for(tag: Tag) -> Style {
    match tag {
        Tag::VariableName => Style::default().fg(Color::LightBlue),
        Tag::Bool | Tag::Number => Style::default().fg(Color::Yellow),
        Tag::String => Style::default().fg(Color::Green),
        Tag::Comment => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        Tag::Keyword => Style::default().fg(Color::Magenta),
        Tag::DefinitionKeyword => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        Tag::ControlKeyword => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        Tag::Paren => Style::default().fg(Color::Gray),
    }
}

/// Splits `source` into lines, styling the parts covered by `spans`.
///
/// `spans` must be sorted and disjoint. A span crossing a newline is
/// clipped to each line it touches.
pub fn highlighted_lines(source: &str, spans: &[HighlightSpan]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut next_span = 0;
    let mut line_start = 0;

    for raw in source.split('\n') {
        let line_end = line_start + raw.len();
        let mut pieces = Vec::new();
        let mut cursor = line_start;

        // Skip spans that ended before this line
        while next_span < spans.len() && spans[next_span].range.end <= line_start {
            next_span += 1;
        }

        let mut i = next_span;
        while i < spans.len() && spans[i].range.start < line_end {
            let span = &spans[i];
            let start = span.range.start.max(line_start);
            let end = span.range.end.min(line_end);
            if start > cursor {
                pieces.push(Span::raw(source[cursor..start].to_string()));
            }
            if end > start {
                pieces.push(Span::styled(source[start..end].to_string(), style_for(span.tag)));
            }
            cursor = end.max(cursor);
            i += 1;
        }
        if cursor < line_end {
            pieces.push(Span::raw(source[cursor..line_end].to_string()));
        }

        lines.push(Line::from(pieces));
        line_start = line_end + 1;
    }

    lines
}
