use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::super::view::{Message, Ui};

impl Ui {
    pub(in crate::tui) fn draw_help(&self, f: &mut Frame<'_>, area: Rect) {
        let instructions = Paragraph::new(self.instructions())
            .block(Block::default().title("Keys").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(instructions, area);
    }

    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let message = Paragraph::new(self.status_text())
            .block(Block::default().title("Status").borders(Borders::ALL))
            .style(self.status_style());
        f.render_widget(message, area);
    }

    pub(in crate::tui) fn instructions(&self) -> String {
        self.keybindings
            .generate_help_text(self.focus.view_type(), self.app.layout())
    }

    fn status_text(&self) -> Cow<'_, str> {
        self.message
            .as_ref()
            .map_or(Cow::Borrowed("Ready"), |msg| Cow::Borrowed(msg.text.as_str()))
    }

    fn status_style(&self) -> Style {
        self.message.as_ref().map_or_else(Style::default, Message::style)
    }
}
