use std::collections::HashMap;

use taskpad_core::TaskId;

/// Rows currently on screen, in display order, and the selection among them.
#[derive(Debug, Default)]
pub(super) struct TaskVisibility {
    visible: Vec<TaskId>,
    visible_index: HashMap<TaskId, usize>,
    selected: usize,
}

#[allow(clippy::missing_const_for_fn)]
impl TaskVisibility {
    /// Replace the visible rows, keeping `preferred` selected when it is
    /// still on screen and clamping the old position otherwise.
    pub(super) fn rebuild(&mut self, rows: impl IntoIterator<Item = TaskId>, preferred: Option<TaskId>) {
        self.visible.clear();
        self.visible_index.clear();

        for id in rows {
            let pos = self.visible.len();
            self.visible.push(id);
            self.visible_index.insert(id, pos);
        }

        self.selected = self.resolve_selection(preferred);
    }

    fn resolve_selection(&self, preferred: Option<TaskId>) -> usize {
        if self.visible.is_empty() {
            return 0;
        }
        if let Some(id) = preferred
            && let Some(&index) = self.visible_index.get(&id)
        {
            return index;
        }
        self.selected.min(self.visible.len() - 1)
    }

    pub(super) fn has_visible_tasks(&self) -> bool {
        !self.visible.is_empty()
    }

    #[cfg(test)]
    pub(super) fn visible_ids(&self) -> &[TaskId] {
        &self.visible
    }

    #[cfg(test)]
    pub(super) fn contains(&self, task_id: TaskId) -> bool {
        self.visible_index.contains_key(&task_id)
    }

    pub(super) fn selected_index(&self) -> usize {
        self.selected
    }

    pub(super) fn selected_task_id(&self) -> Option<TaskId> {
        self.visible.get(self.selected).copied()
    }

    pub(super) fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub(super) fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<TaskId> {
        (0..count).map(|_| TaskId::new()).collect()
    }

    #[test]
    fn rebuild_lists_rows_in_order() {
        let rows = ids(2);
        let mut visibility = TaskVisibility::default();
        visibility.rebuild(rows.clone(), None);

        assert_eq!(visibility.visible_ids(), rows.as_slice());
        assert_eq!(visibility.selected_index(), 0);
        assert_eq!(visibility.selected_task_id(), Some(rows[0]));
    }

    #[test]
    fn rebuild_keeps_preferred_selection() {
        let rows = ids(3);
        let mut visibility = TaskVisibility::default();
        visibility.rebuild(rows.clone(), None);

        // the preferred row moved to the front
        let reordered = vec![rows[2], rows[0], rows[1]];
        visibility.rebuild(reordered, Some(rows[2]));
        assert_eq!(visibility.selected_index(), 0);
        assert_eq!(visibility.selected_task_id(), Some(rows[2]));
    }

    #[test]
    fn rebuild_clamps_when_preferred_disappears() {
        let rows = ids(3);
        let mut visibility = TaskVisibility::default();
        visibility.rebuild(rows.clone(), None);
        visibility.select_next();
        visibility.select_next();

        visibility.rebuild(rows[..2].to_vec(), Some(rows[2]));
        assert_eq!(visibility.selected_task_id(), Some(rows[1]));
        assert!(!visibility.contains(rows[2]));

        visibility.rebuild(Vec::new(), Some(rows[1]));
        assert!(!visibility.has_visible_tasks());
        assert_eq!(visibility.selected_task_id(), None);
    }

    #[test]
    fn navigation_stays_within_bounds() {
        let rows = ids(2);
        let mut visibility = TaskVisibility::default();
        visibility.rebuild(rows.clone(), None);
        visibility.select_next();
        assert_eq!(visibility.selected_task_id(), Some(rows[1]));
        visibility.select_next();
        assert_eq!(visibility.selected_task_id(), Some(rows[1]));
        visibility.select_prev();
        assert_eq!(visibility.selected_task_id(), Some(rows[0]));
        visibility.select_prev();
        assert_eq!(visibility.selected_task_id(), Some(rows[0]));
    }

    #[test]
    fn navigation_on_empty_list_is_noop() {
        let mut visibility = TaskVisibility::default();
        visibility.select_next();
        visibility.select_prev();
        assert_eq!(visibility.selected_index(), 0);
        assert_eq!(visibility.selected_task_id(), None);
    }
}
