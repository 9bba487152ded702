use serde::Serialize;

use crate::{ProgressState, Task};

/// Number of tasks in each lifecycle stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// Tasks not yet started.
    pub pending: usize,
    /// Tasks in progress.
    pub underway: usize,
    /// Finished tasks.
    pub concluded: usize,
}

impl TaskSummary {
    /// Count `tasks` by status.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, task| {
            match task.current_status {
                ProgressState::Pending => acc.pending += 1,
                ProgressState::Underway => acc.underway += 1,
                ProgressState::Concluded => acc.concluded += 1,
            }
            acc
        })
    }

    /// Total number of counted tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.underway + self.concluded
    }
}
