//! Read-only views derived from a [`BoardState`].
//!
//! Nothing here is cached: callers recompute on every draw.

use crate::board::BoardState;
use crate::filter::Filter;
use crate::task::Task;

/// Message shown when the board holds no tasks at all.
pub const EMPTY_BOARD_MESSAGE: &str = "No tasks yet. Add one to get started!";

/// Active and completed tasks, each in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections<'a> {
    /// Tasks that are not completed.
    pub active: Vec<&'a Task>,
    /// Completed tasks.
    pub completed: Vec<&'a Task>,
}

impl<'a> Sections<'a> {
    /// Whether both sections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }

    /// Active rows followed by completed rows.
    pub fn rows(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.active.iter().chain(self.completed.iter()).copied()
    }
}

/// Counters over the whole, unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of tasks.
    pub total: usize,
    /// Tasks that are not completed.
    pub active: usize,
    /// Completed tasks.
    pub completed: usize,
}

/// Split the board into active and completed sections.
#[must_use]
pub fn sections(state: &BoardState) -> Sections<'_> {
    let (completed, active): (Vec<&Task>, Vec<&Task>) =
        state.tasks().iter().partition(|task| task.completed);
    Sections { active, completed }
}

/// Tasks matching the current filter, in list order.
#[must_use]
pub fn filtered(state: &BoardState) -> Vec<&Task> {
    filtered_by(state, state.filter())
}

/// Tasks matching an explicit filter, in list order.
#[must_use]
pub fn filtered_by(state: &BoardState, filter: Filter) -> Vec<&Task> {
    state
        .tasks()
        .iter()
        .filter(|task| filter.matches(task))
        .collect()
}

/// Counters computed over every task regardless of the filter.
#[must_use]
pub fn summary(state: &BoardState) -> Summary {
    let completed = state.tasks().iter().filter(|task| task.completed).count();
    Summary {
        total: state.len(),
        active: state.len() - completed,
        completed,
    }
}

/// Empty-state message for the filtered view, or `None` when it has rows.
#[must_use]
pub fn empty_message(state: &BoardState) -> Option<String> {
    if state.is_empty() {
        return Some(EMPTY_BOARD_MESSAGE.to_owned());
    }
    let filter = state.filter();
    if state.tasks().iter().any(|task| filter.matches(task)) {
        None
    } else {
        Some(format!("No {filter} tasks"))
    }
}

/// Whether the clear-completed action should be offered.
#[must_use]
pub fn show_clear_completed(state: &BoardState) -> bool {
    state.tasks().iter().any(|task| task.completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::AddOutcome;
    use crate::id::TaskId;

    fn add(board: &mut BoardState, text: &str) -> TaskId {
        match board.add(text) {
            AddOutcome::Added(id) => id,
            AddOutcome::RejectedEmpty => panic!("{text:?} must be accepted"),
        }
    }

    fn texts<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a str> {
        tasks.into_iter().map(|task| task.text.as_str()).collect()
    }

    #[test]
    fn add_add_toggle_scenario() {
        let mut board = BoardState::default();
        let a = add(&mut board, "A");
        add(&mut board, "B");
        let _ = board.toggle_complete(a);

        let sections = sections(&board);
        assert_eq!(texts(sections.active.iter().copied()), vec!["B"]);
        assert_eq!(texts(sections.completed.iter().copied()), vec!["A"]);
        assert_eq!(summary(&board).total, 2);
        assert_eq!(texts(sections.rows()), vec!["B", "A"]);
    }

    #[test]
    fn sections_empty_only_for_empty_board() {
        let mut board = BoardState::default();
        assert!(sections(&board).is_empty());
        let id = add(&mut board, "A");
        let _ = board.toggle_complete(id);
        let sections = sections(&board);
        assert!(!sections.is_empty());
        assert!(sections.active.is_empty());
    }

    #[test]
    fn filtered_preserves_list_order() {
        let mut board = BoardState::default();
        let a = add(&mut board, "A");
        add(&mut board, "B");
        let c = add(&mut board, "C");
        add(&mut board, "D");
        let _ = board.toggle_complete(c);
        let _ = board.toggle_complete(a);

        assert_eq!(texts(filtered_by(&board, Filter::All)), vec!["A", "B", "C", "D"]);
        assert_eq!(texts(filtered_by(&board, Filter::Active)), vec!["B", "D"]);
        assert_eq!(texts(filtered_by(&board, Filter::Completed)), vec!["A", "C"]);

        board.set_filter(Filter::Active);
        assert_eq!(texts(filtered(&board)), vec!["B", "D"]);
    }

    #[test]
    fn summary_ignores_filter() {
        let mut board = BoardState::default();
        let a = add(&mut board, "A");
        add(&mut board, "B");
        let _ = board.toggle_complete(a);
        board.set_filter(Filter::Completed);

        assert_eq!(
            summary(&board),
            Summary {
                total: 2,
                active: 1,
                completed: 1,
            }
        );
    }

    #[test]
    fn empty_board_message_wins_over_filter() {
        let board = BoardState::default().with_filter(Filter::Completed);
        assert_eq!(empty_message(&board).as_deref(), Some(EMPTY_BOARD_MESSAGE));
    }

    #[test]
    fn completed_filter_without_completed_tasks() {
        let mut board = BoardState::default();
        add(&mut board, "Still open");
        board.set_filter(Filter::Completed);
        assert_eq!(empty_message(&board).as_deref(), Some("No completed tasks"));
    }

    #[test]
    fn active_filter_with_everything_done() {
        let mut board = BoardState::default();
        let id = add(&mut board, "Done");
        let _ = board.toggle_complete(id);
        board.set_filter(Filter::Active);
        assert_eq!(empty_message(&board).as_deref(), Some("No active tasks"));
    }

    #[test]
    fn no_message_when_rows_exist() {
        let mut board = BoardState::default();
        add(&mut board, "Visible");
        assert_eq!(empty_message(&board), None);
    }

    #[test]
    fn clear_completed_offered_only_with_completed_tasks() {
        let mut board = BoardState::default();
        let id = add(&mut board, "A");
        assert!(!show_clear_completed(&board));
        let _ = board.toggle_complete(id);
        assert!(show_clear_completed(&board));
    }
}
