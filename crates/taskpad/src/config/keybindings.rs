//! Configuration file and key bindings for the TUI.

#![allow(
    clippy::uninlined_format_args,
    clippy::map_unwrap_or,
    clippy::unused_self
)]

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use taskpad_core::{EditPolicy, Filter, Layout};

macro_rules! vec_of_strings {
    ($($s:expr),* $(,)?) => {
        vec![$($s.to_string()),*]
    };
}

/// Top-level configuration for taskpad.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TUI configuration.
    #[serde(default)]
    pub tui: TuiConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuiConfig {
    /// How the list is presented.
    #[serde(default)]
    pub layout: Layout,
    /// Which tasks may enter edit mode.
    #[serde(default)]
    pub edit_policy: EditPolicy,
    /// Filter selected at startup.
    #[serde(default)]
    pub initial_filter: Filter,
    /// Keybindings configuration.
    #[serde(default)]
    pub keybindings: KeyBindingsConfig,
}

/// Keybindings configuration for all focus modes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyBindingsConfig {
    /// Keybindings while browsing the task list.
    pub task_list: TaskListKeyBindings,
    /// Keybindings while typing a new task.
    pub new_task: NewTaskKeyBindings,
    /// Keybindings while editing a task in place.
    pub edit_task: EditTaskKeyBindings,
}

/// Keybindings for the task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListKeyBindings {
    /// Quit the application.
    pub quit: Vec<String>,
    /// Move down in the list.
    pub down: Vec<String>,
    /// Move up in the list.
    pub up: Vec<String>,
    /// Toggle completion of the selected task.
    pub toggle: Vec<String>,
    /// Edit the selected task.
    pub edit: Vec<String>,
    /// Delete the selected task.
    pub delete: Vec<String>,
    /// Focus the new task input.
    pub new_task: Vec<String>,
    /// Cycle through filters.
    pub next_filter: Vec<String>,
    /// Show every task.
    pub filter_all: Vec<String>,
    /// Show active tasks.
    pub filter_active: Vec<String>,
    /// Show completed tasks.
    pub filter_completed: Vec<String>,
    /// Remove every completed task.
    pub clear_completed: Vec<String>,
    /// Copy the selected task text to the clipboard.
    pub copy_text: Vec<String>,
}

/// Keybindings for the new task input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskKeyBindings {
    /// Add the typed task.
    pub submit: Vec<String>,
    /// Return to the list, keeping the typed text.
    pub close: Vec<String>,
}

/// Keybindings for in-place editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditTaskKeyBindings {
    /// Save the draft.
    pub save: Vec<String>,
    /// Discard the draft.
    pub cancel: Vec<String>,
    /// Edit the draft in an external editor.
    pub open_editor: Vec<String>,
}

impl Default for TaskListKeyBindings {
    fn default() -> Self {
        Self {
            quit: vec_of_strings!["q", "Q"],
            down: vec_of_strings!["j", "J", "Down"],
            up: vec_of_strings!["k", "K", "Up"],
            toggle: vec_of_strings!["Space", "x", "X"],
            edit: vec_of_strings!["e", "E", "Enter"],
            delete: vec_of_strings!["d", "D", "Delete"],
            new_task: vec_of_strings!["a", "A", "n", "N", "i"],
            next_filter: vec_of_strings!["f", "F", "Tab"],
            filter_all: vec_of_strings!["1"],
            filter_active: vec_of_strings!["2"],
            filter_completed: vec_of_strings!["3"],
            clear_completed: vec_of_strings!["c", "C"],
            copy_text: vec_of_strings!["y", "Y"],
        }
    }
}

impl Default for NewTaskKeyBindings {
    fn default() -> Self {
        Self {
            submit: vec_of_strings!["Enter"],
            close: vec_of_strings!["Esc"],
        }
    }
}

impl Default for EditTaskKeyBindings {
    fn default() -> Self {
        Self {
            save: vec_of_strings!["Enter"],
            cancel: vec_of_strings!["Esc"],
            open_editor: vec_of_strings!["Ctrl+e"],
        }
    }
}

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/taskpad/config.toml`
/// On macOS: `~/Library/Application Support/taskpad/config.toml`
/// On Windows: `%APPDATA%\taskpad\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskpad").join("config.toml"))
}

/// Generate default configuration as TOML string.
pub fn generate_default_config_toml() -> Result<String> {
    let config = Config::default();

    let toml_str =
        toml::to_string_pretty(&config).context("Failed to serialize the default configuration")?;

    let header = r#"# taskpad Configuration
#
# [tui]
# layout         = "filtered" | "sections"
# edit_policy    = "active_only" | "always"
# initial_filter = "all" | "active" | "completed"
#
# [tui.keybindings]
# Each action can have multiple key bindings.
#
# Supported key formats:
# - Single characters: "j", "k", "a", "1"
# - Special keys: "Enter", "Esc", "Tab", "Space", "Backspace", "Delete"
# - Arrow keys: "Up", "Down", "Left", "Right"
# - Navigation keys: "Home", "End", "PageUp", "PageDown"
# - Modified keys: "Ctrl+e", "Alt+k", "Shift+Up"
#
# Note: When [tui.keybindings] exists, ALL default keybindings are replaced.
# Make sure to define every action of every view.
# The new_task and edit_task views receive typed text, so their bindings
# must not be plain printable characters.

"#;

    Ok(format!("{}{}", header, toml_str))
}

/// Load configuration from a TOML file.
///
/// # Arguments
/// - `path`: Optional path to the config file. If `None`, uses the default path.
///
/// # Returns
/// - `Ok(Some(config))` if the file exists and was successfully parsed
/// - `Ok(None)` if the file does not exist
/// - `Err(_)` if there was an error reading or parsing the file
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    // a missing file means no config
    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Parse a key string into a `KeyEvent`.
///
/// # Examples
/// - "j" -> `KeyCode::Char('j')`
/// - "Space" -> `KeyCode::Char(' ')`
/// - "Ctrl+e" -> `KeyCode::Char('e')` with CONTROL modifier
pub fn parse_key(s: &str) -> Result<KeyEvent> {
    let parts: Vec<&str> = s.split('+').collect();

    let mut modifiers = KeyModifiers::NONE;
    let Some((key_part, modifier_parts)) = parts.split_last() else {
        bail!("Empty key string");
    };
    for &modifier in modifier_parts {
        match modifier {
            "Ctrl" | "Control" => modifiers |= KeyModifiers::CONTROL,
            "Alt" => modifiers |= KeyModifiers::ALT,
            "Shift" => modifiers |= KeyModifiers::SHIFT,
            other => bail!("Unknown modifier: {}", other),
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    match s {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Tab" => Ok(KeyCode::Tab),
        "Delete" => Ok(KeyCode::Delete),
        "Insert" => Ok(KeyCode::Insert),
        "Space" => Ok(KeyCode::Char(' ')),
        s if s.chars().count() == 1 => {
            let ch = s.chars().next().ok_or_else(|| anyhow!("Empty char"))?;
            Ok(KeyCode::Char(ch))
        }
        other => bail!("Unknown key: {}", other),
    }
}

/// Validate the configuration.
pub fn validate_config_struct(config: &Config) -> Result<()> {
    validate_tui_config(&config.tui)
}

/// Validate the TUI configuration.
///
/// Layout, edit policy and filter are checked by deserialization; only the
/// keybindings need a separate pass.
pub fn validate_tui_config(config: &TuiConfig) -> Result<()> {
    validate_keybindings_config(&config.keybindings)
}

/// Validate the keybindings configuration.
///
/// Checks for:
/// - Empty key bindings
/// - Invalid key expressions
/// - Key conflicts within each view
/// - Plain characters bound in views that receive typed text
pub fn validate_keybindings_config(config: &KeyBindingsConfig) -> Result<()> {
    validate_non_empty_bindings(config)?;
    validate_key_expressions(config)?;
    validate_keybindings(config)?;
    validate_text_input_bindings(config)?;
    Ok(())
}

/// Every binding of every view, as `(view, action, keys)`.
fn all_bindings(config: &KeyBindingsConfig) -> Vec<(&'static str, &'static str, &[String])> {
    let mut all = Vec::new();
    for (action, keys) in collect_task_list_bindings(config) {
        all.push(("task_list", action, keys));
    }
    for (action, keys) in collect_new_task_bindings(config) {
        all.push(("new_task", action, keys));
    }
    for (action, keys) in collect_edit_task_bindings(config) {
        all.push(("edit_task", action, keys));
    }
    all
}

/// Validate that all keybinding fields have at least one key.
fn validate_non_empty_bindings(config: &KeyBindingsConfig) -> Result<()> {
    for (view, action, keys) in all_bindings(config) {
        if keys.is_empty() {
            bail!("{}.{} must have at least one key binding", view, action);
        }
    }
    Ok(())
}

/// Validate that all key expressions can be parsed.
fn validate_key_expressions(config: &KeyBindingsConfig) -> Result<()> {
    for (view, action, keys) in all_bindings(config) {
        for key in keys {
            parse_key(key).with_context(|| format!("Invalid key '{}' in {}.{}", key, view, action))?;
        }
    }
    Ok(())
}

/// Validate that there are no key conflicts within each view.
fn validate_keybindings(config: &KeyBindingsConfig) -> Result<()> {
    validate_view_keybindings("task_list", collect_task_list_bindings(config))?;
    validate_view_keybindings("new_task", collect_new_task_bindings(config))?;
    validate_view_keybindings("edit_task", collect_edit_task_bindings(config))?;
    Ok(())
}

fn validate_view_keybindings(view_name: &str, bindings: Vec<(&'static str, &[String])>) -> Result<()> {
    let mut key_to_actions: HashMap<(KeyCode, KeyModifiers), (&str, Vec<&str>)> = HashMap::new();

    for (action, keys) in bindings {
        for key in keys {
            let event = parse_key(key)
                .with_context(|| format!("Invalid key '{}' in {}.{}", key, view_name, action))?;
            let (_, actions) = key_to_actions
                .entry(binding_identity(&event))
                .or_insert_with(|| (key.as_str(), Vec::new()));
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
    }

    let mut conflicts: Vec<_> = key_to_actions
        .into_values()
        .filter(|(_, actions)| actions.len() > 1)
        .collect();
    conflicts.sort_unstable();
    if let Some((key, actions)) = conflicts.first() {
        bail!(
            "Key '{}' is bound to multiple actions in {}: {:?}",
            key,
            view_name,
            actions
        );
    }

    Ok(())
}

/// The part of a key that [`KeyBindingsConfig::matches`] compares, so that
/// spellings like `Space` and `" "` collide.
fn binding_identity(event: &KeyEvent) -> (KeyCode, KeyModifiers) {
    match event.code {
        KeyCode::Char(_) => (event.code, event.modifiers.difference(KeyModifiers::SHIFT)),
        _ => (event.code, event.modifiers),
    }
}

/// Text views insert plain characters and move the cursor, so bindings there
/// need a key the text field does not use, or a Ctrl/Alt modifier.
fn validate_text_input_bindings(config: &KeyBindingsConfig) -> Result<()> {
    let text_views = collect_new_task_bindings(config)
        .into_iter()
        .map(|(action, keys)| ("new_task", action, keys))
        .chain(
            collect_edit_task_bindings(config)
                .into_iter()
                .map(|(action, keys)| ("edit_task", action, keys)),
        );

    for (view, action, keys) in text_views {
        for key in keys {
            let event = parse_key(key)?;
            if is_text_input(&event) || is_line_editing(&event) {
                bail!(
                    "Key '{}' in {}.{} would swallow text editing; use another key or a Ctrl/Alt combination",
                    key,
                    view,
                    action
                );
            }
        }
    }
    Ok(())
}

/// Whether a key event inserts a character into a text field.
pub fn is_text_input(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_))
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Whether a key event edits or moves within a text field.
fn is_line_editing(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End
    ) && !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn collect_task_list_bindings(config: &KeyBindingsConfig) -> Vec<(&'static str, &[String])> {
    let bindings = &config.task_list;
    vec![
        ("quit", bindings.quit.as_slice()),
        ("down", bindings.down.as_slice()),
        ("up", bindings.up.as_slice()),
        ("toggle", bindings.toggle.as_slice()),
        ("edit", bindings.edit.as_slice()),
        ("delete", bindings.delete.as_slice()),
        ("new_task", bindings.new_task.as_slice()),
        ("next_filter", bindings.next_filter.as_slice()),
        ("filter_all", bindings.filter_all.as_slice()),
        ("filter_active", bindings.filter_active.as_slice()),
        ("filter_completed", bindings.filter_completed.as_slice()),
        ("clear_completed", bindings.clear_completed.as_slice()),
        ("copy_text", bindings.copy_text.as_slice()),
    ]
}

fn collect_new_task_bindings(config: &KeyBindingsConfig) -> Vec<(&'static str, &[String])> {
    vec![
        ("submit", config.new_task.submit.as_slice()),
        ("close", config.new_task.close.as_slice()),
    ]
}

fn collect_edit_task_bindings(config: &KeyBindingsConfig) -> Vec<(&'static str, &[String])> {
    vec![
        ("save", config.edit_task.save.as_slice()),
        ("cancel", config.edit_task.cancel.as_slice()),
        ("open_editor", config.edit_task.open_editor.as_slice()),
    ]
}

/// View type for keybinding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    /// Browsing the task list.
    TaskList,
    /// Typing a new task.
    NewTask,
    /// Editing a task in place.
    EditTask,
}

/// Action that can be performed in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // TaskList
    /// Quit the application.
    Quit,
    /// Move down.
    Down,
    /// Move up.
    Up,
    /// Toggle completion.
    Toggle,
    /// Start editing.
    Edit,
    /// Delete the task.
    Delete,
    /// Focus the new task input.
    NewTask,
    /// Cycle filters.
    NextFilter,
    /// Select the "all" filter.
    FilterAll,
    /// Select the "active" filter.
    FilterActive,
    /// Select the "completed" filter.
    FilterCompleted,
    /// Remove completed tasks.
    ClearCompleted,
    /// Copy task text.
    CopyText,

    // NewTask
    /// Add the typed task.
    Submit,
    /// Leave the input.
    Close,

    // EditTask
    /// Save the draft.
    Save,
    /// Discard the draft.
    Cancel,
    /// Open an external editor on the draft.
    OpenEditor,
}

impl KeyBindingsConfig {
    /// Generate help text for a specific view.
    ///
    /// Filter and clear-completed hints are only listed for the filtered layout.
    pub fn generate_help_text(&self, view: ViewType, layout: Layout) -> String {
        match view {
            ViewType::TaskList => self.generate_task_list_help(layout),
            ViewType::NewTask => format!(
                "{}:add {}:back",
                self.format_first_key(&self.new_task.submit),
                self.format_first_key(&self.new_task.close),
            ),
            ViewType::EditTask => format!(
                "{}:save {}:cancel {}:editor",
                self.format_first_key(&self.edit_task.save),
                self.format_first_key(&self.edit_task.cancel),
                self.format_first_key(&self.edit_task.open_editor),
            ),
        }
    }

    fn generate_task_list_help(&self, layout: Layout) -> String {
        let keys = &self.task_list;
        let mut parts = vec![
            format!("{}:move", self.format_key_pair(&keys.down, &keys.up)),
            format!("{}:new", self.format_first_key(&keys.new_task)),
            format!("{}:toggle", self.format_first_key(&keys.toggle)),
            format!("{}:edit", self.format_first_key(&keys.edit)),
            format!("{}:delete", self.format_first_key(&keys.delete)),
        ];
        if layout == Layout::Filtered {
            parts.push(format!("{}:filter", self.format_first_key(&keys.next_filter)));
            parts.push(format!(
                "{}/{}/{}:all/active/completed",
                self.format_first_key(&keys.filter_all),
                self.format_first_key(&keys.filter_active),
                self.format_first_key(&keys.filter_completed),
            ));
            parts.push(format!(
                "{}:clear completed",
                self.format_first_key(&keys.clear_completed)
            ));
        }
        parts.push(format!("{}:copy", self.format_first_key(&keys.copy_text)));
        parts.push(format!("{}:quit", self.format_first_key(&keys.quit)));
        parts.join(" ")
    }

    /// Format the first key of a key binding list for display.
    fn format_first_key(&self, keys: &[String]) -> String {
        keys.first()
            .map(|k| self.format_key_display(k))
            .unwrap_or_else(|| "?".to_string())
    }

    /// Format two keys as a pair (e.g., "j/k" for down/up).
    fn format_key_pair(&self, down: &[String], up: &[String]) -> String {
        format!("{}/{}", self.format_first_key(down), self.format_first_key(up))
    }

    /// Format a key for display, converting special keys to readable symbols.
    fn format_key_display(&self, key: &str) -> String {
        match key {
            "Enter" => "↵".to_string(),
            "Backspace" => "BS".to_string(),
            "Delete" => "Del".to_string(),
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "PageUp" => "PgUp".to_string(),
            "PageDown" => "PgDn".to_string(),
            other if other.starts_with("Ctrl+") || other.starts_with("Alt+") => {
                other.replace('+', "-")
            }
            other => other.to_string(),
        }
    }

    /// Check if a key event matches a configured action in a view.
    pub fn matches(&self, view: ViewType, action: Action, key: &KeyEvent) -> bool {
        self.get_keys(view, action)
            .iter()
            .filter_map(|key_str| parse_key(key_str).ok())
            .any(|expected| Self::key_event_matches(&expected, key))
    }

    /// Terminals disagree on whether uppercase letters carry SHIFT, so
    /// character keys compare without it.
    fn key_event_matches(expected: &KeyEvent, actual: &KeyEvent) -> bool {
        if expected.code != actual.code {
            return false;
        }
        match expected.code {
            KeyCode::Char(_) => {
                expected.modifiers.difference(KeyModifiers::SHIFT)
                    == actual.modifiers.difference(KeyModifiers::SHIFT)
            }
            _ => expected.modifiers == actual.modifiers,
        }
    }

    fn get_keys(&self, view: ViewType, action: Action) -> &[String] {
        use Action as A;
        use ViewType as V;

        match (view, action) {
            (V::TaskList, A::Quit) => &self.task_list.quit,
            (V::TaskList, A::Down) => &self.task_list.down,
            (V::TaskList, A::Up) => &self.task_list.up,
            (V::TaskList, A::Toggle) => &self.task_list.toggle,
            (V::TaskList, A::Edit) => &self.task_list.edit,
            (V::TaskList, A::Delete) => &self.task_list.delete,
            (V::TaskList, A::NewTask) => &self.task_list.new_task,
            (V::TaskList, A::NextFilter) => &self.task_list.next_filter,
            (V::TaskList, A::FilterAll) => &self.task_list.filter_all,
            (V::TaskList, A::FilterActive) => &self.task_list.filter_active,
            (V::TaskList, A::FilterCompleted) => &self.task_list.filter_completed,
            (V::TaskList, A::ClearCompleted) => &self.task_list.clear_completed,
            (V::TaskList, A::CopyText) => &self.task_list.copy_text,

            (V::NewTask, A::Submit) => &self.new_task.submit,
            (V::NewTask, A::Close) => &self.new_task.close,

            (V::EditTask, A::Save) => &self.edit_task.save,
            (V::EditTask, A::Cancel) => &self.edit_task.cancel,
            (V::EditTask, A::OpenEditor) => &self.edit_task.open_editor,

            // Invalid combinations
            _ => &[],
        }
    }
}
