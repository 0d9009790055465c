//! Widgets shared by the CourseGen screens.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Bottom status line: latest message on the left, global key hints after it.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(msg, Style::default().fg(Color::White)),
        Span::styled("   ? help · q quit", Style::default().fg(Color::Gray)),
    ]);
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray))
}
