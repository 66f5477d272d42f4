use std::io::Stdout;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use taskpad_core::{AddOutcome, Command, Outcome, SaveOutcome};

use super::super::input::InputLine;
use super::super::terminal::{first_line, launch_editor, with_terminal_suspended};
use super::super::view::{Focus, Ui, UiAction};
use crate::config::{Action, ViewType};

pub(super) fn handle_ui_action(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ui: &mut Ui,
    action: UiAction,
) -> Result<()> {
    match action {
        UiAction::OpenEditor => {
            let initial = ui.draft.text().to_owned();
            let raw = with_terminal_suspended(terminal, || launch_editor(&initial))?;
            ui.apply_editor_output(&raw);
        }
    }
    Ok(())
}

impl Ui {
    pub(in crate::tui) fn handle_new_task_key(&mut self, key: KeyEvent) {
        if self.keybindings.matches(ViewType::NewTask, Action::Submit, &key) {
            self.submit_new_task();
        } else if self.keybindings.matches(ViewType::NewTask, Action::Close, &key) {
            self.focus = Focus::TaskList;
        } else if self.input.handle_key(&key) {
            self.app.dispatch(Command::SetInput(self.input.text().to_owned()));
        }
    }

    pub(in crate::tui) fn handle_edit_task_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if self.keybindings.matches(ViewType::EditTask, Action::Save, &key) {
            self.save_edit();
        } else if self.keybindings.matches(ViewType::EditTask, Action::Cancel, &key) {
            self.app.dispatch(Command::CancelEdit);
            self.draft = InputLine::default();
            self.focus = Focus::TaskList;
        } else if self
            .keybindings
            .matches(ViewType::EditTask, Action::OpenEditor, &key)
        {
            return Some(UiAction::OpenEditor);
        } else if self.draft.handle_key(&key) {
            self.app.dispatch(Command::SetDraft(self.draft.text().to_owned()));
        }
        None
    }

    fn submit_new_task(&mut self) {
        // blank input is ignored silently
        if let Outcome::Add(AddOutcome::Added(_)) = self.app.dispatch(Command::SubmitNew) {
            self.input = InputLine::new(self.app.board().new_task_text());
            self.info("Task added");
        }
    }

    fn save_edit(&mut self) {
        match self.app.dispatch(Command::SaveEdit) {
            Outcome::Save(SaveOutcome::Saved(_)) => {
                self.draft = InputLine::default();
                self.focus = Focus::TaskList;
                self.info("Task updated");
            }
            // blank draft: stay in edit mode
            Outcome::Save(SaveOutcome::RejectedEmpty) => {}
            _ => {
                self.draft = InputLine::default();
                self.focus = Focus::TaskList;
            }
        }
    }

    pub(in crate::tui) fn apply_editor_output(&mut self, raw: &str) {
        if self.app.board().edit_session().is_none() {
            self.error("The task is no longer being edited");
            self.focus = Focus::TaskList;
            return;
        }
        self.draft = InputLine::new(first_line(raw));
        self.app.dispatch(Command::SetDraft(self.draft.text().to_owned()));
        self.info("Loaded draft from editor");
    }
}
