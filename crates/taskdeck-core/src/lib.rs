//! Domain types, filtering, and lifecycle rules for taskdeck.

/// Time source and epoch-millisecond helpers.
pub mod clock;
/// Identifier types.
pub mod id;
/// Status transitions and timestamp forward-filling.
pub mod lifecycle;
/// Search, filter, and sort pipeline for task lists.
pub mod organize;
/// Priority and progress enumerations.
pub mod state;
/// Per-status counts for dashboards.
pub mod summary;
/// Case-insensitive search over task text.
pub mod text_matcher;

pub use clock::{Clock, EpochMillis, FixedClock, SystemClock};
pub use id::{TaskId, UserId};
pub use organize::{FilterOptions, organize_and_filter};
pub use state::{ImportanceLevel, ParseEnumError, ProgressState};
pub use summary::TaskSummary;
pub use text_matcher::TextMatcher;

use serde::{Deserialize, Serialize};

/// A checklist item embedded in its parent task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubTask {
    /// Checklist text.
    pub title: String,
    /// Whether the item has been ticked off.
    pub is_done: bool,
}

impl SubTask {
    /// Create an unchecked item.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_done: false,
        }
    }
}

/// A user-owned unit of work.
///
/// Documents are overwritten as a whole on every update, so every field
/// round-trips through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    /// Store-assigned identifier; blank until first persisted.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Deadline in epoch milliseconds.
    pub due_date: EpochMillis,
    /// Priority tier.
    pub importance: ImportanceLevel,
    /// Ordered checklist.
    pub sub_tasks: Vec<SubTask>,
    /// Owner. Overwritten by the repository on every insert.
    pub user_id: UserId,
    /// Lifecycle stage.
    pub current_status: ProgressState,
    /// When the task was last concluded. Stored as `0` when unset.
    #[serde(with = "unset_as_zero")]
    pub completed_at: Option<EpochMillis>,
    /// When work first started.
    pub initiated_at: Option<EpochMillis>,
    /// Construction time.
    pub created_at: EpochMillis,
}

impl Default for Task {
    fn default() -> Self {
        Self::with_created_at(SystemClock.now_millis())
    }
}

impl Task {
    /// Create a pending task titled `title`, stamped with the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Create an empty pending task with an explicit creation time.
    #[must_use]
    pub fn with_created_at(created_at: EpochMillis) -> Self {
        Self {
            id: TaskId::default(),
            title: String::new(),
            description: String::new(),
            due_date: 0,
            importance: ImportanceLevel::default(),
            sub_tasks: Vec::new(),
            user_id: UserId::default(),
            current_status: ProgressState::default(),
            completed_at: None,
            initiated_at: None,
            created_at,
        }
    }

    /// True once the store has assigned an identifier.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.id.is_blank()
    }
}

mod unset_as_zero {
    use super::EpochMillis;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &Option<EpochMillis>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_i64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<EpochMillis>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<EpochMillis>::deserialize(d)?;
        Ok(raw.filter(|&millis| millis != 0))
    }
}
