use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use taskpad_core::Filter;
use taskpad_core::projection;

use super::super::view::Ui;

impl Ui {
    /// Filter selector, counters and the clear-completed hint.
    pub(in crate::tui) fn draw_filter_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let board = self.app.board();
        let current = board.filter();

        let mut spans = Vec::new();
        for (idx, filter) in Filter::ALL.into_iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" | "));
            }
            let style = if filter == current {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(filter.label(), style));
        }

        spans.push(Span::styled(
            format!("   {}", self.summary_text()),
            Style::default().fg(Color::DarkGray),
        ));

        if projection::show_clear_completed(board) {
            spans.push(Span::styled(
                "   [Clear completed]",
                Style::default().fg(Color::Magenta),
            ));
        }

        let bar = Paragraph::new(Line::from(spans))
            .block(Block::default().title("Filter").borders(Borders::ALL));
        f.render_widget(bar, area);
    }

    pub(in crate::tui) fn summary_text(&self) -> String {
        let summary = projection::summary(self.app.board());
        format!(
            "{} total · {} active · {} completed",
            summary.total, summary.active, summary.completed
        )
    }
}
