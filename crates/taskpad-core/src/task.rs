use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::id::TaskId;

/// A single entry in the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned at creation.
    pub id: TaskId,
    /// Text as entered. Never blank after trimming.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Whether a text is acceptable as task text.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Decides which tasks may enter edit mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPolicy {
    /// Only tasks that are not completed can be edited.
    #[default]
    ActiveOnly,
    /// Every task can be edited.
    Always,
}

impl EditPolicy {
    /// Capability check shared by the store and the UI.
    #[must_use]
    pub const fn can_edit(self, task: &Task) -> bool {
        match self {
            Self::ActiveOnly => !task.completed,
            Self::Always => true,
        }
    }

    /// Name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActiveOnly => "active_only",
            Self::Always => "always",
        }
    }
}

impl fmt::Display for EditPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an edit policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown edit policy '{0}' (expected active_only or always)")]
pub struct ParseEditPolicyError(pub String);

impl FromStr for EditPolicy {
    type Err = ParseEditPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "active_only" => Ok(Self::ActiveOnly),
            "always" => Ok(Self::Always),
            _ => Err(ParseEditPolicyError(s.to_owned())),
        }
    }
}

/// How the task list is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Separate "active" and "completed" sections, no filter bar.
    Sections,
    /// A single list projected through the current filter.
    #[default]
    Filtered,
}

impl Layout {
    /// Name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sections => "sections",
            Self::Filtered => "filtered",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a layout name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown layout '{0}' (expected sections or filtered)")]
pub struct ParseLayoutError(pub String);

impl FromStr for Layout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sections" => Ok(Self::Sections),
            "filtered" => Ok(Self::Filtered),
            _ => Err(ParseLayoutError(s.to_owned())),
        }
    }
}
