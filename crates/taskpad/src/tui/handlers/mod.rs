use std::io::Stdout;

use anyhow::Result;
use ratatui::{Terminal, backend::CrosstermBackend};

use super::view::{Ui, UiAction};

pub(super) mod edit;
pub(super) mod navigation;

pub(super) fn handle_ui_action(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ui: &mut Ui,
    action: UiAction,
) -> Result<()> {
    edit::handle_ui_action(terminal, ui, action)
}
