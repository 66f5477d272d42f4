//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 200;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Highlight symbol shown beside selected list entries.
pub const TASK_LIST_HIGHLIGHT_SYMBOL: &str = "▶ ";
/// Checkbox drawn for active tasks.
pub const CHECKBOX_OPEN: &str = "[ ] ";
/// Checkbox drawn for completed tasks.
pub const CHECKBOX_DONE: &str = "[x] ";
/// Placeholder shown in an empty new-task input.
pub const NEW_TASK_PLACEHOLDER: &str = "What needs to be done?";
/// Separator between task text and its age label.
pub const AGE_SEPARATOR: &str = " · ";
