use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout as Split},
    style::{Color, Style},
};
use taskpad_core::{Layout, Task, TaskId};

use super::app::App;
use super::clipboard::{ClipboardSink, default_clipboard};
use super::constants::UI_MESSAGE_TTL_SECS;
use super::input::InputLine;
use crate::config::{KeyBindingsConfig, ViewType};

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Focus {
    /// Browsing the task list.
    TaskList,
    /// Typing into the new task input.
    NewTask,
    /// Editing the selected task in place.
    EditTask,
}

impl Focus {
    pub(super) const fn view_type(self) -> ViewType {
        match self {
            Self::TaskList => ViewType::TaskList,
            Self::NewTask => ViewType::NewTask,
            Self::EditTask => ViewType::EditTask,
        }
    }
}

pub(super) struct Ui {
    pub(super) app: App,
    pub(super) focus: Focus,
    /// Cursor-aware mirror of the board's new task buffer.
    pub(super) input: InputLine,
    /// Cursor-aware mirror of the edit session draft.
    pub(super) draft: InputLine,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
    pub(super) clipboard: Box<dyn ClipboardSink>,
    pub(super) keybindings: KeyBindingsConfig,
}

impl Ui {
    pub(super) const INPUT_HEIGHT: u16 = 3;
    pub(super) const FILTER_BAR_HEIGHT: u16 = 3;
    pub(super) const MAIN_MIN_HEIGHT: u16 = 5;
    pub(super) const HELP_HEIGHT: u16 = 3;
    pub(super) const STATUS_HEIGHT: u16 = 3;

    pub(super) fn new(app: App, keybindings: KeyBindingsConfig) -> Self {
        let clipboard = default_clipboard();
        Self::with_clipboard(app, keybindings, clipboard)
    }

    pub(super) fn with_clipboard(
        app: App,
        keybindings: KeyBindingsConfig,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        let input = InputLine::new(app.board().new_task_text());
        Self {
            app,
            focus: Focus::TaskList,
            input,
            draft: InputLine::default(),
            message: None,
            should_quit: false,
            clipboard,
            keybindings,
        }
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        self.app.selected_task()
    }

    pub(super) fn selected_task_id(&self) -> Option<TaskId> {
        self.app.selected_task_id()
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let filtered = self.app.layout() == Layout::Filtered;
        let mut constraints = vec![Constraint::Length(Self::INPUT_HEIGHT)];
        if filtered {
            constraints.push(Constraint::Length(Self::FILTER_BAR_HEIGHT));
        }
        constraints.extend([
            Constraint::Min(Self::MAIN_MIN_HEIGHT),
            Constraint::Length(Self::HELP_HEIGHT),
            Constraint::Length(Self::STATUS_HEIGHT),
        ]);
        let chunks = Split::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(f.area());

        let mut areas = chunks.iter().copied();
        let mut next_area = || areas.next().unwrap_or_default();

        self.draw_new_task_input(f, next_area());
        if filtered {
            self.draw_filter_bar(f, next_area());
        }
        self.draw_task_list(f, next_area());
        self.draw_help(f, next_area());
        self.draw_status(f, next_area());
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    pub(super) fn tick(&mut self) {
        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
    }
}

/// Work that needs the real terminal, handed back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UiAction {
    /// Suspend the TUI and edit the current draft in `$EDITOR`.
    OpenEditor,
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
            created_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_expires_after_ttl() {
        let message = Message::info("Task added");
        assert!(message.is_expired(Duration::ZERO));
        assert!(!message.is_expired(Duration::from_secs(60)));
        assert_eq!(message.style(), Style::default().fg(Color::Green));
        assert_eq!(Message::error("boom").level, MessageLevel::Error);
    }

    #[test]
    fn focus_maps_to_keybinding_view() {
        assert_eq!(Focus::TaskList.view_type(), ViewType::TaskList);
        assert_eq!(Focus::NewTask.view_type(), ViewType::NewTask);
        assert_eq!(Focus::EditTask.view_type(), ViewType::EditTask);
    }
}
