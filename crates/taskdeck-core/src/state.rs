use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a user-facing token does not name a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind}: {token}")]
pub struct ParseEnumError {
    kind: &'static str,
    token: String,
}

fn normalize(token: &str) -> String {
    token.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Priority tier of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportanceLevel {
    /// Can wait.
    LowPriority,
    /// Default tier.
    #[default]
    Regular,
    /// Needs attention first.
    Critical,
}

impl ImportanceLevel {
    /// Every tier, lowest first.
    pub const ALL: [Self; 3] = [Self::LowPriority, Self::Regular, Self::Critical];

    /// Wire representation stored in task documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowPriority => "LOW_PRIORITY",
            Self::Regular => "REGULAR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ImportanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportanceLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low_priority" | "low" => Ok(Self::LowPriority),
            "regular" | "normal" => Ok(Self::Regular),
            "critical" | "high" => Ok(Self::Critical),
            _ => Err(ParseEnumError {
                kind: "importance",
                token: s.to_owned(),
            }),
        }
    }
}

/// Lifecycle stage of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressState {
    /// Not started.
    #[default]
    Pending,
    /// Being worked on.
    Underway,
    /// Finished.
    Concluded,
}

impl ProgressState {
    /// Every stage in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Underway, Self::Concluded];

    /// Wire representation stored in task documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Underway => "UNDERWAY",
            Self::Concluded => "CONCLUDED",
        }
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" | "todo" => Ok(Self::Pending),
            "underway" | "in_progress" | "started" => Ok(Self::Underway),
            "concluded" | "done" => Ok(Self::Concluded),
            _ => Err(ParseEnumError {
                kind: "status",
                token: s.to_owned(),
            }),
        }
    }
}
