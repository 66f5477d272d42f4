//! Configuration module for taskpad.

use anyhow::{Context, Result, anyhow, bail};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use taskpad_core::{EditPolicy, Filter, Layout};
use tracing::info;

pub mod keybindings;

pub use keybindings::{Action, KeyBindingsConfig, TuiConfig, ViewType};

/// Display options given on the command line; each one wins over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOverrides {
    /// `--layout`
    pub layout: Option<Layout>,
    /// `--edit-policy`
    pub edit_policy: Option<EditPolicy>,
    /// `--filter`
    pub filter: Option<Filter>,
}

/// Everything the TUI needs at startup.
#[derive(Debug, Clone, Default)]
pub struct TuiSettings {
    /// How the list is presented.
    pub layout: Layout,
    /// Which tasks may enter edit mode.
    pub edit_policy: EditPolicy,
    /// Filter selected at startup.
    pub initial_filter: Filter,
    /// Validated keybindings.
    pub keybindings: KeyBindingsConfig,
}

impl TuiSettings {
    /// Merge the file configuration with command line overrides.
    pub fn resolve(config: TuiConfig, overrides: DisplayOverrides) -> Self {
        Self {
            layout: overrides.layout.unwrap_or(config.layout),
            edit_policy: overrides.edit_policy.unwrap_or(config.edit_policy),
            initial_filter: overrides.filter.unwrap_or(config.initial_filter),
            keybindings: config.keybindings,
        }
    }
}

/// Load, validate and merge the configuration for a TUI session.
///
/// A missing default file means built-in defaults; a missing file that was
/// named explicitly is an error.
pub fn load_tui_settings(path: Option<&Path>, overrides: DisplayOverrides) -> Result<TuiSettings> {
    if let Some(path) = path
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }

    let tui = match keybindings::load_config(path)? {
        Some(config) => {
            keybindings::validate_tui_config(&config.tui)?;
            config.tui
        }
        None => TuiConfig::default(),
    };

    let settings = TuiSettings::resolve(tui, overrides);
    info!(
        layout = %settings.layout,
        edit_policy = %settings.edit_policy,
        filter = %settings.initial_filter,
        "loaded tui settings"
    );
    Ok(settings)
}

/// Initialize the configuration file with defaults.
pub fn init_config(output: Option<&Path>, force: bool) -> Result<()> {
    let output_path = resolve_path(output)?;
    write_default_config(&output_path, force)
}

/// Load and validate a configuration file, printing the result.
///
/// Like [`load_tui_settings`], only a missing default file falls back to the
/// built-in defaults.
pub fn check_config(path: Option<&Path>) -> Result<()> {
    if let Some(path) = path
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    let config_path = resolve_path(path)?;
    match keybindings::load_config(Some(&config_path))? {
        Some(config) => {
            keybindings::validate_config_struct(&config)
                .with_context(|| format!("Invalid config file: {}", config_path.display()))?;
            println!("✓ Configuration is valid: {}", config_path.display());
            println!(
                "  layout = {}, edit_policy = {}, initial_filter = {}",
                config.tui.layout, config.tui.edit_policy, config.tui.initial_filter
            );
        }
        None => {
            println!(
                "No configuration file at {}; built-in defaults apply.",
                config_path.display()
            );
        }
    }
    Ok(())
}

fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => keybindings::default_config_path()
            .ok_or_else(|| anyhow!("Could not determine the configuration directory")),
    }
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force && !confirm_overwrite(path)? {
        println!("Aborted.");
        return Ok(());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = keybindings::generate_default_config_toml()?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("✓ Wrote configuration file: {}", path.display());
    println!();
    println!("Edit this file to change the layout, edit policy or key bindings.");
    println!("Restart taskpad to apply the changes.");

    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("File already exists: {}\nOverwrite? [y/N]: ", path.display());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
