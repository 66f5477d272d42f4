use super::app::*;
use super::clipboard::*;
use super::view::*;
use super::widgets::truncate_with_ellipsis;
use crate::config::KeyBindingsConfig;
use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use std::result::Result as StdResult;
use taskpad_core::{AddOutcome, BoardState, Command, EditPolicy, Filter, Layout, Outcome, TaskId};
use time::{Duration, OffsetDateTime};

fn expect_ok<T, E: Display>(result: StdResult<T, E>, ctx: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{ctx}: {err}"),
    }
}

fn expect_some<T>(value: Option<T>, ctx: &str) -> T {
    value.map_or_else(|| panic!("{ctx}"), |inner| inner)
}

struct NoopClipboard;

impl ClipboardSink for NoopClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

struct RecordingClipboard {
    writes: Rc<RefCell<Vec<String>>>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.writes.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

struct FailingClipboard;

impl ClipboardSink for FailingClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(anyhow!("no clipboard here"))
    }
}

fn ui_with(layout: Layout, policy: EditPolicy) -> Ui {
    let app = App::new(layout, policy, Filter::All);
    Ui::with_clipboard(app, KeyBindingsConfig::default(), Box::new(NoopClipboard))
}

fn filtered_ui() -> Ui {
    ui_with(Layout::Filtered, EditPolicy::ActiveOnly)
}

fn add(ui: &mut Ui, text: &str) -> TaskId {
    match ui.app.dispatch(Command::Add(text.into())) {
        Outcome::Add(AddOutcome::Added(id)) => id,
        other => panic!("adding {text:?} must succeed, got {other:?}"),
    }
}

fn press(ui: &mut Ui, code: KeyCode) -> Option<UiAction> {
    ui.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(ui: &mut Ui, text: &str) {
    for ch in text.chars() {
        press(ui, KeyCode::Char(ch));
    }
}

fn texts(ui: &Ui) -> Vec<String> {
    ui.app
        .board()
        .tasks()
        .iter()
        .map(|task| task.text.clone())
        .collect()
}

fn message_text(ui: &Ui) -> Option<&str> {
    ui.message.as_ref().map(|msg| msg.text.as_str())
}

fn render(ui: &Ui) -> String {
    let backend = TestBackend::new(120, 30);
    let mut terminal = expect_ok(Terminal::new(backend), "must create test terminal");
    expect_ok(terminal.draw(|f| ui.draw(f)), "must draw frame");
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn truncate_with_ellipsis_returns_borrowed_when_short() {
    let title = "Short title";
    assert!(matches!(
        truncate_with_ellipsis(title, 20),
        Cow::Borrowed(result) if result == title
    ));
}

#[test]
fn truncate_with_ellipsis_handles_multibyte_text() {
    assert_eq!(truncate_with_ellipsis("あいうえおかきくけこ", 5), "あい...");
}

#[test]
fn truncate_with_ellipsis_keeps_grapheme_clusters_intact() {
    assert_eq!(truncate_with_ellipsis("a\u{0301}bcdef", 4), "a\u{0301}...");
}

#[test]
fn osc52_sequence_encodes_text() {
    assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
}

#[test]
fn typing_and_submitting_adds_task() {
    let mut ui = filtered_ui();
    press(&mut ui, KeyCode::Char('a'));
    assert_eq!(ui.focus, Focus::NewTask);

    type_text(&mut ui, "Buy milk");
    assert_eq!(ui.app.board().new_task_text(), "Buy milk");
    press(&mut ui, KeyCode::Enter);

    assert_eq!(texts(&ui), vec!["Buy milk"]);
    assert_eq!(ui.app.board().new_task_text(), "");
    assert!(ui.input.is_empty());
    assert_eq!(ui.focus, Focus::NewTask);
    assert_eq!(message_text(&ui), Some("Task added"));
}

#[test]
fn blank_submission_is_silent() {
    let mut ui = filtered_ui();
    press(&mut ui, KeyCode::Char('a'));
    type_text(&mut ui, "   ");
    press(&mut ui, KeyCode::Enter);

    assert!(ui.app.board().is_empty());
    assert_eq!(ui.input.text(), "   ");
    assert!(ui.message.is_none());
}

#[test]
fn typing_quit_key_in_input_does_not_quit() {
    let mut ui = filtered_ui();
    press(&mut ui, KeyCode::Char('a'));
    type_text(&mut ui, "q");

    assert!(!ui.should_quit);
    assert_eq!(ui.input.text(), "q");
}

#[test]
fn closing_input_keeps_buffer() {
    let mut ui = filtered_ui();
    press(&mut ui, KeyCode::Char('a'));
    type_text(&mut ui, "Walk dog");
    press(&mut ui, KeyCode::Esc);
    assert_eq!(ui.focus, Focus::TaskList);
    assert_eq!(ui.app.board().new_task_text(), "Walk dog");

    press(&mut ui, KeyCode::Char('a'));
    press(&mut ui, KeyCode::Enter);
    assert_eq!(texts(&ui), vec!["Walk dog"]);
}

#[test]
fn quits_on_q_key() {
    let mut ui = filtered_ui();
    assert!(press(&mut ui, KeyCode::Char('q')).is_none());
    assert!(ui.should_quit);
}

#[test]
fn key_release_is_ignored() {
    let mut ui = filtered_ui();
    let release = KeyEvent::new_with_kind(
        KeyCode::Char('q'),
        KeyModifiers::NONE,
        KeyEventKind::Release,
    );
    assert!(ui.handle_key(release).is_none());
    assert!(!ui.should_quit);
}

#[test]
fn new_task_takes_selection() {
    let mut ui = filtered_ui();
    add(&mut ui, "A");
    let b = add(&mut ui, "B");
    assert_eq!(ui.selected_task_id(), Some(b));
    press(&mut ui, KeyCode::Up);
    assert_eq!(ui.app.visibility().selected_index(), 0);
}

#[test]
fn toggle_follows_task_between_sections() {
    let mut ui = ui_with(Layout::Sections, EditPolicy::ActiveOnly);
    let a = add(&mut ui, "A");
    add(&mut ui, "B");
    press(&mut ui, KeyCode::Char('k'));
    assert_eq!(ui.selected_task_id(), Some(a));

    press(&mut ui, KeyCode::Char(' '));

    let task = expect_some(ui.app.board().task(a), "task A must exist");
    assert!(task.completed);
    // completed tasks render after active ones
    assert_eq!(ui.app.visibility().selected_index(), 1);
    assert_eq!(ui.selected_task_id(), Some(a));
    assert_eq!(message_text(&ui), Some("Marked as completed"));
}

#[test]
fn delete_removes_selected_and_clamps_selection() {
    let mut ui = filtered_ui();
    add(&mut ui, "A");
    let b = add(&mut ui, "B");
    add(&mut ui, "C");

    press(&mut ui, KeyCode::Char('d'));

    assert_eq!(texts(&ui), vec!["A", "B"]);
    assert_eq!(ui.selected_task_id(), Some(b));
}

#[test]
fn edit_save_and_blank_rejection() {
    let mut ui = filtered_ui();
    let id = add(&mut ui, "Draft");

    press(&mut ui, KeyCode::Char('e'));
    assert_eq!(ui.focus, Focus::EditTask);
    assert_eq!(ui.draft.text(), "Draft");

    for _ in 0.."Draft".len() {
        press(&mut ui, KeyCode::Backspace);
    }
    press(&mut ui, KeyCode::Enter);
    assert_eq!(ui.focus, Focus::EditTask);
    assert_eq!(ui.app.board().editing_id(), Some(id));
    assert_eq!(texts(&ui), vec!["Draft"]);

    type_text(&mut ui, "Final");
    press(&mut ui, KeyCode::Enter);
    assert_eq!(ui.focus, Focus::TaskList);
    assert_eq!(texts(&ui), vec!["Final"]);
    assert!(ui.app.board().edit_session().is_none());
}

#[test]
fn cancel_discards_draft() {
    let mut ui = filtered_ui();
    add(&mut ui, "Keep me");

    press(&mut ui, KeyCode::Enter);
    type_text(&mut ui, " changed");
    press(&mut ui, KeyCode::Esc);

    assert_eq!(ui.focus, Focus::TaskList);
    assert_eq!(texts(&ui), vec!["Keep me"]);
    assert!(ui.app.board().edit_session().is_none());
}

#[test]
fn completed_task_is_not_editable_by_default() {
    let mut ui = filtered_ui();
    let id = add(&mut ui, "Done");
    ui.app.dispatch(Command::Toggle(id));

    press(&mut ui, KeyCode::Char('e'));
    assert_eq!(ui.focus, Focus::TaskList);
    assert!(ui.app.board().edit_session().is_none());
}

#[test]
fn always_policy_allows_editing_completed_task() {
    let mut ui = ui_with(Layout::Sections, EditPolicy::Always);
    let id = add(&mut ui, "Done");
    ui.app.dispatch(Command::Toggle(id));

    press(&mut ui, KeyCode::Char('e'));
    assert_eq!(ui.focus, Focus::EditTask);
    assert_eq!(ui.app.board().editing_id(), Some(id));
}

#[test]
fn open_editor_returns_action_and_loads_first_line() {
    let mut ui = filtered_ui();
    add(&mut ui, "Call Bob");
    press(&mut ui, KeyCode::Char('e'));

    let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
    assert_eq!(ui.handle_key(ctrl_e), Some(UiAction::OpenEditor));
    assert_eq!(ui.draft.text(), "Call Bob");

    ui.apply_editor_output("Call Alice\nsecond line ignored\n");
    assert_eq!(ui.draft.text(), "Call Alice");
    let session = expect_some(ui.app.board().edit_session(), "session must stay open");
    assert_eq!(session.draft, "Call Alice");

    press(&mut ui, KeyCode::Enter);
    assert_eq!(texts(&ui), vec!["Call Alice"]);
}

#[test]
fn editor_output_without_session_reports_error() {
    let mut ui = filtered_ui();
    ui.focus = Focus::EditTask;
    ui.apply_editor_output("orphan");

    assert_eq!(ui.focus, Focus::TaskList);
    let level = ui.message.as_ref().map(|msg| msg.level);
    assert_eq!(level, Some(MessageLevel::Error));
}

#[test]
fn filter_keys_switch_filters() {
    let mut ui = filtered_ui();
    let a = add(&mut ui, "A");
    add(&mut ui, "B");
    ui.app.dispatch(Command::Toggle(a));

    press(&mut ui, KeyCode::Char('3'));
    assert_eq!(ui.app.board().filter(), Filter::Completed);
    assert_eq!(ui.app.visibility().visible_ids(), &[a]);

    press(&mut ui, KeyCode::Char('f'));
    assert_eq!(ui.app.board().filter(), Filter::All);
    press(&mut ui, KeyCode::Tab);
    assert_eq!(ui.app.board().filter(), Filter::Active);
    assert!(!ui.app.visibility().contains(a));
}

#[test]
fn filter_keys_ignored_in_sections_layout() {
    let mut ui = ui_with(Layout::Sections, EditPolicy::ActiveOnly);
    let a = add(&mut ui, "A");
    ui.app.dispatch(Command::Toggle(a));

    press(&mut ui, KeyCode::Char('2'));
    press(&mut ui, KeyCode::Char('c'));

    assert_eq!(ui.app.board().filter(), Filter::All);
    assert_eq!(texts(&ui), vec!["A"]);
}

#[test]
fn clear_completed_removes_done_tasks() {
    let mut ui = filtered_ui();
    let a = add(&mut ui, "A");
    add(&mut ui, "B");
    ui.app.dispatch(Command::Toggle(a));

    press(&mut ui, KeyCode::Char('c'));

    assert_eq!(texts(&ui), vec!["B"]);
    assert_eq!(message_text(&ui), Some("Cleared 1 completed task"));
}

#[test]
fn clear_completed_without_done_tasks_is_silent() {
    let mut ui = filtered_ui();
    add(&mut ui, "A");
    press(&mut ui, KeyCode::Char('c'));

    assert_eq!(texts(&ui), vec!["A"]);
    assert!(ui.message.is_none());
}

#[test]
fn copy_selected_text_writes_to_clipboard() {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let clipboard = RecordingClipboard {
        writes: Rc::clone(&writes),
    };
    let app = App::new(Layout::Filtered, EditPolicy::ActiveOnly, Filter::All);
    let mut ui = Ui::with_clipboard(app, KeyBindingsConfig::default(), Box::new(clipboard));
    add(&mut ui, "Buy milk");

    press(&mut ui, KeyCode::Char('y'));

    assert_eq!(*writes.borrow(), vec!["Buy milk".to_owned()]);
    assert_eq!(message_text(&ui), Some("Copied task text"));
}

#[test]
fn copy_selected_text_reports_clipboard_failure() {
    let app = App::new(Layout::Filtered, EditPolicy::ActiveOnly, Filter::All);
    let mut ui = Ui::with_clipboard(app, KeyBindingsConfig::default(), Box::new(FailingClipboard));
    add(&mut ui, "Buy milk");

    ui.copy_selected_text();

    let message = expect_some(ui.message.as_ref(), "failure must be reported");
    assert_eq!(message.level, MessageLevel::Error);
    assert!(message.text.contains("no clipboard here"));
}

#[test]
fn instructions_follow_focus() {
    let mut ui = filtered_ui();
    assert!(ui.instructions().contains("q:quit"));
    press(&mut ui, KeyCode::Char('a'));
    assert_eq!(ui.instructions(), "↵:add Esc:back");
}

#[test]
fn summary_counts_whole_list() {
    let mut ui = filtered_ui();
    let a = add(&mut ui, "A");
    add(&mut ui, "B");
    ui.app.dispatch(Command::Toggle(a));
    ui.app.dispatch(Command::SetFilter(Filter::Active));

    assert_eq!(ui.summary_text(), "2 total · 1 active · 1 completed");
}

#[test]
fn renders_empty_board_message_and_placeholder() {
    let ui = filtered_ui();
    let screen = render(&ui);

    assert!(screen.contains("No tasks yet. Add one to get started!"));
    assert!(screen.contains("What needs to be done?"));
    assert!(screen.contains("Ready"));
    assert!(!screen.contains("[Clear completed]"));
}

#[test]
fn renders_filter_specific_empty_message() {
    let mut ui = filtered_ui();
    add(&mut ui, "Open item");
    ui.app.dispatch(Command::SetFilter(Filter::Completed));

    let screen = render(&ui);
    assert!(screen.contains("No completed tasks"));
    assert!(!screen.contains("Open item"));
}

#[test]
fn renders_filter_bar_with_counters() {
    let mut ui = filtered_ui();
    let a = add(&mut ui, "A task");
    add(&mut ui, "B task");
    ui.app.dispatch(Command::Toggle(a));

    let screen = render(&ui);
    assert!(screen.contains("All | Active | Completed"));
    assert!(screen.contains("2 total · 1 active · 1 completed"));
    assert!(screen.contains("[Clear completed]"));
    assert!(screen.contains("[x] A task · Today"));
    assert!(screen.contains("[ ] B task · Today"));
}

#[test]
fn renders_sections_with_counts() {
    let mut ui = ui_with(Layout::Sections, EditPolicy::ActiveOnly);
    let a = add(&mut ui, "A");
    add(&mut ui, "B");
    ui.app.dispatch(Command::Toggle(a));

    let screen = render(&ui);
    assert!(screen.contains("Active Tasks (1)"));
    assert!(screen.contains("Completed (1)"));
    assert!(!screen.contains("All | Active | Completed"));
}

#[test]
fn renders_age_labels() {
    let now = OffsetDateTime::now_utc();
    let mut board = BoardState::default();
    board.add_at("Old errand", now - Duration::days(3) - Duration::hours(1));
    board.add_at("Yesterday errand", now - Duration::hours(30));
    let app = App::from_board(board, Layout::Filtered);
    let ui = Ui::with_clipboard(app, KeyBindingsConfig::default(), Box::new(NoopClipboard));

    let screen = render(&ui);
    assert!(screen.contains("Old errand · 3 days ago"));
    assert!(screen.contains("Yesterday errand · Yesterday"));
}

#[test]
fn renders_edit_row_with_draft() {
    let mut ui = filtered_ui();
    add(&mut ui, "Draft");
    press(&mut ui, KeyCode::Char('e'));
    type_text(&mut ui, "!");

    let screen = render(&ui);
    assert!(screen.contains("✎ Draft!"));
    assert!(screen.contains("↵:save Esc:cancel Ctrl-e:editor"));
}
