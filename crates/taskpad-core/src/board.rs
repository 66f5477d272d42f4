//! Task list state and the operations that mutate it.
//!
//! [`BoardState`] is the whole state of a session: the ordered tasks, the
//! new-task input buffer, the optional edit session, the current filter and the
//! edit policy. Every operation is synchronous and total; rejected attempts
//! leave the state untouched and report why through an outcome enum.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::filter::Filter;
use crate::id::TaskId;
use crate::task::{EditPolicy, Task, is_blank};

/// The single task currently being edited, with its unsaved text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    /// Task being edited. Always refers to a task on the board.
    pub task: TaskId,
    /// Unsaved replacement text.
    pub draft: String,
}

/// Result of [`BoardState::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A task was appended.
    Added(TaskId),
    /// The text was blank after trimming.
    RejectedEmpty,
}

/// Result of [`BoardState::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The task was removed.
    Deleted,
    /// No task had that id.
    NotFound,
}

/// Result of [`BoardState::toggle_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The flag was flipped to the contained value.
    Toggled {
        /// Completion flag after the toggle.
        completed: bool,
    },
    /// No task had that id.
    NotFound,
}

/// Result of [`BoardState::start_edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit session now targets the task.
    Started,
    /// No task had that id.
    NotFound,
    /// The edit policy does not allow editing this task.
    NotEditable,
}

/// Result of [`BoardState::save_edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The draft replaced the task text and the session ended.
    Saved(TaskId),
    /// The draft was blank; the session stays open.
    RejectedEmpty,
    /// There was no edit session.
    NoSession,
}

/// One user intent, as produced by the interaction surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the new-task input buffer.
    SetInput(String),
    /// Add the input buffer as a task and clear it on success.
    SubmitNew,
    /// Add a task with the given text, bypassing the input buffer.
    Add(String),
    /// Remove a task.
    Delete(TaskId),
    /// Flip the completion flag of a task.
    Toggle(TaskId),
    /// Open the edit session on a task.
    StartEdit(TaskId),
    /// Replace the draft of the open edit session.
    SetDraft(String),
    /// Commit the draft.
    SaveEdit,
    /// Discard the edit session.
    CancelEdit,
    /// Remove every completed task.
    ClearCompleted,
    /// Switch the filtered view.
    SetFilter(Filter),
}

/// What a [`Command`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Buffer, draft, filter or cancel updates that cannot fail.
    Updated,
    /// See [`AddOutcome`].
    Add(AddOutcome),
    /// See [`DeleteOutcome`].
    Delete(DeleteOutcome),
    /// See [`ToggleOutcome`].
    Toggle(ToggleOutcome),
    /// See [`EditOutcome`].
    Edit(EditOutcome),
    /// See [`SaveOutcome`].
    Save(SaveOutcome),
    /// Number of tasks removed by clear-completed.
    Cleared(usize),
}

impl Outcome {
    /// Whether the command was absorbed without changing anything.
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(
            self,
            Self::Add(AddOutcome::RejectedEmpty)
                | Self::Delete(DeleteOutcome::NotFound)
                | Self::Toggle(ToggleOutcome::NotFound)
                | Self::Edit(EditOutcome::NotFound | EditOutcome::NotEditable)
                | Self::Save(SaveOutcome::RejectedEmpty | SaveOutcome::NoSession)
                | Self::Cleared(0)
        )
    }
}

/// Complete, serializable state of a task list session.
///
/// Deserialization goes through [`InvalidBoardState`] checks, so a restored
/// board holds the same invariants as one built through its operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardState")]
pub struct BoardState {
    tasks: Vec<Task>,
    new_task: String,
    edit: Option<EditSession>,
    filter: Filter,
    policy: EditPolicy,
}

/// Reason a deserialized board was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBoardState {
    /// A stored task has blank text.
    #[error("task {0} has blank text")]
    BlankText(TaskId),
    /// Two tasks share an identifier.
    #[error("task id {0} appears more than once")]
    DuplicateId(TaskId),
    /// The edit session points at a task that is not on the board.
    #[error("edit session refers to missing task {0}")]
    DanglingEditSession(TaskId),
}

#[derive(Deserialize)]
struct RawBoardState {
    tasks: Vec<Task>,
    new_task: String,
    edit: Option<EditSession>,
    filter: Filter,
    policy: EditPolicy,
}

impl TryFrom<RawBoardState> for BoardState {
    type Error = InvalidBoardState;

    fn try_from(raw: RawBoardState) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(raw.tasks.len());
        for task in &raw.tasks {
            if is_blank(&task.text) {
                return Err(InvalidBoardState::BlankText(task.id));
            }
            if !seen.insert(task.id) {
                return Err(InvalidBoardState::DuplicateId(task.id));
            }
        }
        if let Some(session) = &raw.edit
            && !seen.contains(&session.task)
        {
            return Err(InvalidBoardState::DanglingEditSession(session.task));
        }
        Ok(Self {
            tasks: raw.tasks,
            new_task: raw.new_task,
            edit: raw.edit,
            filter: raw.filter,
            policy: raw.policy,
        })
    }
}

impl BoardState {
    /// Empty board using the given edit policy.
    #[must_use]
    pub fn new(policy: EditPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Replace the initial filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Number of tasks on the board.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the board holds no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current contents of the new-task input.
    #[must_use]
    pub fn new_task_text(&self) -> &str {
        &self.new_task
    }

    /// Open edit session, if any.
    #[must_use]
    pub const fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Id of the task being edited, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<TaskId> {
        self.edit.as_ref().map(|session| session.task)
    }

    /// Current filter.
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// Edit policy in force.
    #[must_use]
    pub const fn policy(&self) -> EditPolicy {
        self.policy
    }

    /// Whether the task with this id may enter edit mode.
    #[must_use]
    pub fn can_edit(&self, id: TaskId) -> bool {
        self.task(id).is_some_and(|task| self.policy.can_edit(task))
    }

    /// Replace the new-task input buffer.
    pub fn set_new_task_text(&mut self, text: impl Into<String>) {
        self.new_task = text.into();
    }

    /// Add the input buffer as a task, clearing the buffer when it was accepted.
    pub fn submit_new_task(&mut self) -> AddOutcome {
        let text = self.new_task.clone();
        let outcome = self.add(text);
        if matches!(outcome, AddOutcome::Added(_)) {
            self.new_task.clear();
        }
        outcome
    }

    /// Append a task created now.
    pub fn add(&mut self, text: impl Into<String>) -> AddOutcome {
        self.add_at(text, OffsetDateTime::now_utc())
    }

    /// Append a task with an explicit creation time.
    ///
    /// The text is stored as entered; only the emptiness check trims it.
    pub fn add_at(&mut self, text: impl Into<String>, created_at: OffsetDateTime) -> AddOutcome {
        let text = text.into();
        if is_blank(&text) {
            debug!("rejected blank task text");
            return AddOutcome::RejectedEmpty;
        }
        let id = TaskId::new();
        self.tasks.push(Task {
            id,
            text,
            completed: false,
            created_at,
        });
        debug!(%id, total = self.tasks.len(), "task added");
        AddOutcome::Added(id)
    }

    /// Remove a task, ending the edit session if it targeted it.
    pub fn delete(&mut self, id: TaskId) -> DeleteOutcome {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return DeleteOutcome::NotFound;
        };
        self.tasks.remove(index);
        if self.editing_id() == Some(id) {
            self.edit = None;
            debug!(%id, "edit session closed by delete");
        }
        debug!(%id, total = self.tasks.len(), "task deleted");
        DeleteOutcome::Deleted
    }

    /// Flip the completion flag of a task.
    ///
    /// An edit session on the task is closed when the policy no longer allows
    /// editing it.
    pub fn toggle_complete(&mut self, id: TaskId) -> ToggleOutcome {
        let policy = self.policy;
        let Some(task) = self.task_mut(id) else {
            return ToggleOutcome::NotFound;
        };
        task.completed = !task.completed;
        let completed = task.completed;
        let editable = policy.can_edit(task);
        if !editable && self.editing_id() == Some(id) {
            self.edit = None;
            debug!(%id, "edit session closed by toggle");
        }
        debug!(%id, completed, "task toggled");
        ToggleOutcome::Toggled { completed }
    }

    /// Open the edit session on a task, replacing any previous session.
    pub fn start_edit(&mut self, id: TaskId) -> EditOutcome {
        let Some(task) = self.task(id) else {
            return EditOutcome::NotFound;
        };
        if !self.policy.can_edit(task) {
            return EditOutcome::NotEditable;
        }
        let draft = task.text.clone();
        if let Some(previous) = self.edit.replace(EditSession { task: id, draft }) {
            debug!(previous = %previous.task, "edit session replaced");
        }
        debug!(%id, "edit session started");
        EditOutcome::Started
    }

    /// Replace the draft text. Does nothing without an open session.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(session) = self.edit.as_mut() {
            session.draft = text.into();
        }
    }

    /// Commit the draft to the edited task.
    ///
    /// A blank draft is refused and leaves the session open. The stored text
    /// is the draft as typed, not trimmed. A session whose task is gone is
    /// dropped and reported as `NoSession`.
    pub fn save_edit(&mut self) -> SaveOutcome {
        let Some(session) = self.edit.as_ref() else {
            return SaveOutcome::NoSession;
        };
        if is_blank(&session.draft) {
            return SaveOutcome::RejectedEmpty;
        }
        let Some(session) = self.edit.take() else {
            return SaveOutcome::NoSession;
        };
        let id = session.task;
        let Some(task) = self.task_mut(id) else {
            debug!(%id, "edit session target missing; session dropped");
            return SaveOutcome::NoSession;
        };
        task.text = session.draft;
        debug!(%id, "edit saved");
        SaveOutcome::Saved(id)
    }

    /// Discard the edit session and its draft.
    pub fn cancel_edit(&mut self) {
        if let Some(session) = self.edit.take() {
            debug!(id = %session.task, "edit cancelled");
        }
    }

    /// Remove every completed task in one step, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if let Some(id) = self.editing_id()
            && self.task(id).is_none()
        {
            self.edit = None;
        }
        debug!(removed, total = self.tasks.len(), "completed tasks cleared");
        removed
    }

    /// Switch the filtered view.
    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter != filter {
            debug!(%filter, "filter changed");
            self.filter = filter;
        }
    }

    /// Apply one command. Each command resolves completely before returning.
    pub fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::SetInput(text) => {
                self.set_new_task_text(text);
                Outcome::Updated
            }
            Command::SubmitNew => Outcome::Add(self.submit_new_task()),
            Command::Add(text) => Outcome::Add(self.add(text)),
            Command::Delete(id) => Outcome::Delete(self.delete(id)),
            Command::Toggle(id) => Outcome::Toggle(self.toggle_complete(id)),
            Command::StartEdit(id) => Outcome::Edit(self.start_edit(id)),
            Command::SetDraft(text) => {
                self.set_draft(text);
                Outcome::Updated
            }
            Command::SaveEdit => Outcome::Save(self.save_edit()),
            Command::CancelEdit => {
                self.cancel_edit();
                Outcome::Updated
            }
            Command::ClearCompleted => Outcome::Cleared(self.clear_completed()),
            Command::SetFilter(filter) => {
                self.set_filter(filter);
                Outcome::Updated
            }
        }
    }
}
