use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout as Split, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use taskpad_core::projection::{self, EMPTY_BOARD_MESSAGE};
use taskpad_core::{Layout, Task, format_age};
use time::OffsetDateTime;

use super::super::constants::{
    AGE_SEPARATOR, CHECKBOX_DONE, CHECKBOX_OPEN, TASK_LIST_HIGHLIGHT_SYMBOL,
};
use super::super::view::{Focus, Ui};
use super::util::{input_spans, truncate_with_ellipsis};

/// Borders plus the highlight symbol.
const ROW_CHROME_WIDTH: usize = 4;

impl Ui {
    pub(in crate::tui) fn draw_task_list(&self, f: &mut Frame<'_>, area: Rect) {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        match self.app.layout() {
            Layout::Filtered => self.draw_filtered_list(f, area, now),
            Layout::Sections => self.draw_sections(f, area, now),
        }
    }

    fn draw_filtered_list(&self, f: &mut Frame<'_>, area: Rect, now: OffsetDateTime) {
        let board = self.app.board();
        if let Some(message) = projection::empty_message(board) {
            draw_empty(f, area, "Tasks", &message);
            return;
        }

        let rows = projection::filtered(board);
        let selected = self
            .app
            .visibility()
            .has_visible_tasks()
            .then(|| self.app.visibility().selected_index());
        self.draw_rows(f, area, "Tasks", &rows, selected, now);
    }

    fn draw_sections(&self, f: &mut Frame<'_>, area: Rect, now: OffsetDateTime) {
        let sections = projection::sections(self.app.board());
        if sections.is_empty() {
            draw_empty(f, area, "Tasks", EMPTY_BOARD_MESSAGE);
            return;
        }

        let selected = self.app.visibility().selected_index();
        let active_len = sections.active.len();
        let mut parts = Vec::new();
        if !sections.active.is_empty() {
            let title = format!("Active Tasks ({active_len})");
            parts.push((title, &sections.active, (selected < active_len).then_some(selected)));
        }
        if !sections.completed.is_empty() {
            let title = format!("Completed ({})", sections.completed.len());
            let index = selected.checked_sub(active_len);
            parts.push((title, &sections.completed, index));
        }

        let constraints: Vec<Constraint> = parts
            .iter()
            .map(|(_, rows, _)| Constraint::Fill(u16::try_from(rows.len()).unwrap_or(u16::MAX)))
            .collect();
        let areas = Split::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for ((title, rows, selected), area) in parts.into_iter().zip(areas.iter()) {
            self.draw_rows(f, *area, &title, rows, selected, now);
        }
    }

    fn draw_rows(
        &self,
        f: &mut Frame<'_>,
        area: Rect,
        title: &str,
        rows: &[&Task],
        selected: Option<usize>,
        now: OffsetDateTime,
    ) {
        let width = usize::from(area.width).saturating_sub(ROW_CHROME_WIDTH);
        let items: Vec<ListItem<'_>> = rows
            .iter()
            .map(|task| self.task_row(task, width, now))
            .collect();

        let list = List::new(items)
            .block(Block::default().title(title.to_owned()).borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(TASK_LIST_HIGHLIGHT_SYMBOL);
        let mut state = ListState::default();
        state.select(selected);
        f.render_stateful_widget(list, area, &mut state);
    }

    fn task_row<'a>(&'a self, task: &'a Task, width: usize, now: OffsetDateTime) -> ListItem<'a> {
        let editing = self.focus == Focus::EditTask && self.app.board().editing_id() == Some(task.id);
        if editing {
            let mut spans = vec![Span::styled("✎ ", Style::default().fg(Color::Cyan))];
            spans.extend(input_spans(&self.draft, true, Style::default()));
            return ListItem::new(Line::from(spans));
        }

        let age = format_age(task.created_at, now);
        let (checkbox, text_style) = if task.completed {
            (
                CHECKBOX_DONE,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else {
            (CHECKBOX_OPEN, Style::default())
        };
        let text_width = width
            .saturating_sub(checkbox.len())
            .saturating_sub(AGE_SEPARATOR.chars().count() + age.len());
        let text = truncate_with_ellipsis(&task.text, text_width);

        ListItem::new(Line::from(vec![
            Span::raw(checkbox),
            Span::styled(text, text_style),
            Span::styled(
                format!("{AGE_SEPARATOR}{age}"),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
    }
}

fn draw_empty(f: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_owned(),
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().title(title.to_owned()).borders(Borders::ALL))
    .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
