use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::Task;

/// Subset of the task list shown by the filtered layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks that are not completed yet.
    Active,
    /// Completed tasks.
    Completed,
}

impl Filter {
    /// Filters in the order they appear in the filter bar.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Lowercase name used in configuration files and empty-state messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Capitalised label for the filter bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether the task belongs to this subset.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Next filter in bar order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a filter name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter '{0}' (expected all, active or completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseFilterError(s.to_owned())),
        }
    }
}
