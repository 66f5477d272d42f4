//! CLI entry point for taskpad.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskpad_core::{EditPolicy, Filter, Layout};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use config::DisplayOverrides;

mod config;
mod tui;

/// A single-session task list editor for the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "taskpad",
    version,
    about = "taskpad: create, complete, filter and edit tasks in the terminal (nothing is saved)"
)]
struct Cli {
    /// Path to the configuration file (defaults to the user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// List presentation: `sections` or `filtered`.
    #[arg(long)]
    layout: Option<Layout>,

    /// Which tasks may be edited: `active-only` or `always`.
    #[arg(long)]
    edit_policy: Option<EditPolicy>,

    /// Filter selected at startup: `all`, `active` or `completed`.
    #[arg(long)]
    filter: Option<Filter>,

    /// Write logs to this file while the TUI owns the terminal.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the interactive terminal UI (default).
    Tui,

    /// Manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default configuration file.
    Init {
        /// Destination path (defaults to the user config directory).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },

    /// Load and validate the configuration file.
    Check,
}

fn main() -> Result<()> {
    let Cli {
        config,
        layout,
        edit_policy,
        filter,
        log_file,
        cmd,
    } = Cli::parse();

    let cmd = cmd.unwrap_or(Command::Tui);
    let log_to_file = log_file.is_some();
    match (&cmd, log_file) {
        (Command::Tui, Some(path)) => install_file_tracing(&path)?,
        (Command::Tui, None) => {}
        (Command::Config(_), _) => install_tracing(),
    }

    let overrides = DisplayOverrides {
        layout,
        edit_policy,
        filter,
    };
    execute_command(cmd, config.as_deref(), overrides, log_to_file)
}

fn execute_command(
    command: Command,
    config_path: Option<&Path>,
    overrides: DisplayOverrides,
    log_to_file: bool,
) -> Result<()> {
    match command {
        Command::Tui => {
            let settings = config::load_tui_settings(config_path, overrides)?;
            tui::run(settings, log_to_file)
        }
        Command::Config(ConfigCommand::Init { output, force }) => {
            config::init_config(output.as_deref().or(config_path), force)
        }
        Command::Config(ConfigCommand::Check) => config::check_config(config_path),
    }
}

fn env_filter() -> EnvFilter {
    // RUST_LOG wins; INFO otherwise.
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn install_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

fn install_file_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
    Ok(())
}
