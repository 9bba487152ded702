use crate::{EpochMillis, ProgressState, Task};

impl Task {
    /// Move the task to `target`, forward-filling lifecycle timestamps.
    ///
    /// Entering `Underway` stamps `initiated_at` if the task never started.
    /// Entering `Concluded` stamps `completed_at` and, when missing,
    /// `initiated_at` with the same instant. No transition clears a timestamp.
    #[must_use]
    pub fn transition_to(mut self, target: ProgressState, now: EpochMillis) -> Self {
        self.current_status = target;
        match target {
            ProgressState::Underway => {
                self.initiated_at.get_or_insert(now);
            }
            ProgressState::Concluded => {
                self.initiated_at.get_or_insert(now);
                self.completed_at = Some(now);
            }
            ProgressState::Pending => {}
        }
        self
    }

    /// Conclude the task at `now`.
    #[must_use]
    pub fn mark_done(self, now: EpochMillis) -> Self {
        self.transition_to(ProgressState::Concluded, now)
    }

    /// Milliseconds spent since work started.
    ///
    /// Concluded tasks report the span between start and completion, tasks in
    /// progress report the span up to `now`. Pending tasks and tasks that never
    /// started report `None`.
    #[must_use]
    pub fn elapsed_since_start(&self, now: EpochMillis) -> Option<EpochMillis> {
        let started = self.initiated_at?;
        match self.current_status {
            ProgressState::Concluded => self.completed_at.map(|done| done.saturating_sub(started)),
            ProgressState::Underway => Some(now.saturating_sub(started)),
            ProgressState::Pending => None,
        }
    }
}
