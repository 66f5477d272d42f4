use crossterm::event::{KeyEvent, KeyEventKind};
use taskpad_core::projection;
use taskpad_core::{Command, DeleteOutcome, EditOutcome, Filter, Layout, Outcome, ToggleOutcome};

use super::super::input::InputLine;
use super::super::view::{Focus, Ui, UiAction};
use crate::config::{Action, ViewType};

impl Ui {
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match self.focus {
            Focus::TaskList => {
                self.handle_task_list_key(key);
                None
            }
            Focus::NewTask => {
                self.handle_new_task_key(key);
                None
            }
            Focus::EditTask => self.handle_edit_task_key(key),
        }
    }

    fn handle_task_list_key(&mut self, key: KeyEvent) {
        let matches = |action| self.keybindings.matches(ViewType::TaskList, action, &key);

        if matches(Action::Quit) {
            self.should_quit = true;
        } else if matches(Action::Down) {
            self.app.visibility_mut().select_next();
        } else if matches(Action::Up) {
            self.app.visibility_mut().select_prev();
        } else if matches(Action::NewTask) {
            self.focus = Focus::NewTask;
        } else if matches(Action::Toggle) {
            self.toggle_selected();
        } else if matches(Action::Edit) {
            self.start_edit_selected();
        } else if matches(Action::Delete) {
            self.delete_selected();
        } else if matches(Action::CopyText) {
            self.copy_selected_text();
        } else if self.app.layout() == Layout::Filtered {
            self.handle_filter_key(key);
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let matches = |action| self.keybindings.matches(ViewType::TaskList, action, &key);

        let filter = if matches(Action::NextFilter) {
            Some(self.app.board().filter().next())
        } else if matches(Action::FilterAll) {
            Some(Filter::All)
        } else if matches(Action::FilterActive) {
            Some(Filter::Active)
        } else if matches(Action::FilterCompleted) {
            Some(Filter::Completed)
        } else {
            None
        };

        if let Some(filter) = filter {
            self.app.dispatch(Command::SetFilter(filter));
        } else if matches(Action::ClearCompleted) {
            self.clear_completed();
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Outcome::Toggle(ToggleOutcome::Toggled { completed }) =
            self.app.dispatch(Command::Toggle(id))
        {
            self.info(if completed {
                "Marked as completed"
            } else {
                "Marked as active"
            });
        }
    }

    fn start_edit_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if self.app.dispatch(Command::StartEdit(id)) != Outcome::Edit(EditOutcome::Started) {
            return;
        }
        let draft = self
            .app
            .board()
            .edit_session()
            .map(|session| session.draft.clone())
            .unwrap_or_default();
        self.draft = InputLine::new(draft);
        self.focus = Focus::EditTask;
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if self.app.dispatch(Command::Delete(id)) == Outcome::Delete(DeleteOutcome::Deleted) {
            self.info("Task deleted");
        }
    }

    fn clear_completed(&mut self) {
        if !projection::show_clear_completed(self.app.board()) {
            return;
        }
        if let Outcome::Cleared(count) = self.app.dispatch(Command::ClearCompleted) {
            let noun = if count == 1 { "task" } else { "tasks" };
            self.info(format!("Cleared {count} completed {noun}"));
        }
    }

    pub(in crate::tui) fn copy_selected_text(&mut self) {
        let Some(text) = self.selected_task().map(|task| task.text.clone()) else {
            return;
        };

        if let Err(err) = self.clipboard.set_text(&text) {
            self.error(format!("Failed to copy task text: {err}"));
        } else {
            self.info("Copied task text");
        }
    }
}
