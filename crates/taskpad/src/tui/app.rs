use taskpad_core::projection;
use taskpad_core::{AddOutcome, BoardState, Command, EditPolicy, Filter, Layout, Outcome, Task, TaskId};
use tracing::debug;

use super::task_visibility::TaskVisibility;

/// Application state shared between the TUI event loop and rendering.
pub(super) struct App {
    board: BoardState,
    layout: Layout,
    visibility: TaskVisibility,
}

impl App {
    pub(super) fn new(layout: Layout, policy: EditPolicy, filter: Filter) -> Self {
        Self::from_board(BoardState::new(policy).with_filter(filter), layout)
    }

    pub(super) fn from_board(board: BoardState, layout: Layout) -> Self {
        let mut app = Self {
            board,
            layout,
            visibility: TaskVisibility::default(),
        };
        app.rebuild_visibility(None);
        app
    }

    pub(super) const fn board(&self) -> &BoardState {
        &self.board
    }

    pub(super) const fn layout(&self) -> Layout {
        self.layout
    }

    pub(super) const fn visibility(&self) -> &TaskVisibility {
        &self.visibility
    }

    pub(super) const fn visibility_mut(&mut self) -> &mut TaskVisibility {
        &mut self.visibility
    }

    /// Tasks on screen, in display order.
    pub(super) fn rows(&self) -> Vec<&Task> {
        match self.layout {
            Layout::Sections => projection::sections(&self.board).rows().collect(),
            Layout::Filtered => projection::filtered(&self.board),
        }
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        self.visibility
            .selected_task_id()
            .and_then(|id| self.board.task(id))
    }

    pub(super) fn selected_task_id(&self) -> Option<TaskId> {
        self.visibility.selected_task_id()
    }

    /// Apply a command and re-project the rows.
    ///
    /// The selection follows the previously selected task; a freshly added
    /// task takes the selection instead.
    pub(super) fn dispatch(&mut self, command: Command) -> Outcome {
        let keep_id = self.selected_task_id();
        let outcome = self.board.handle(command);
        if outcome.is_rejected() {
            debug!(?outcome, "command rejected");
        }
        let preferred = match outcome {
            Outcome::Add(AddOutcome::Added(id)) => Some(id),
            _ => keep_id,
        };
        self.rebuild_visibility(preferred);
        outcome
    }

    pub(super) fn rebuild_visibility(&mut self, preferred: Option<TaskId>) {
        let rows: Vec<TaskId> = self.rows().into_iter().map(|task| task.id).collect();
        self.visibility.rebuild(rows, preferred);
    }
}
