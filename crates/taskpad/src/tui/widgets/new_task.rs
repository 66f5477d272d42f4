use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::super::constants::NEW_TASK_PLACEHOLDER;
use super::super::view::{Focus, Ui};
use super::util::input_spans;

impl Ui {
    pub(in crate::tui) fn draw_new_task_input(&self, f: &mut Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::NewTask;
        let line = if self.input.is_empty() && !focused {
            Line::from(Span::styled(
                NEW_TASK_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(input_spans(&self.input, focused, Style::default()))
        };

        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let input = Paragraph::new(line).block(
            Block::default()
                .title("taskpad · New task")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        f.render_widget(input, area);
    }
}
