//! Task lifecycle use cases.

use taskdeck_core::{Clock, ProgressState, SystemClock, Task, TaskId};
use thiserror::Error;
use tracing::debug;

use crate::repository::{RepositoryError, TaskRepository};

/// Errors raised by [`TaskService`] operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// New tasks need a non-blank title.
    #[error("task title must not be blank")]
    BlankTitle,
    /// The repository call failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service façade that applies lifecycle rules before touching the repository.
pub struct TaskService<R, C = SystemClock> {
    repository: R,
    clock: C,
}

impl<R> TaskService<R> {
    /// Build a service stamping times from the system clock.
    pub const fn new(repository: R) -> Self {
        Self {
            repository,
            clock: SystemClock,
        }
    }
}

impl<R, C> TaskService<R, C> {
    /// Build a service with an explicit clock.
    pub const fn with_clock(repository: R, clock: C) -> Self {
        Self { repository, clock }
    }

    /// Borrow the underlying repository.
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Borrow the clock used for lifecycle stamps.
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock,
{
    /// Persist a caller-assembled task. The owner is set by the repository.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::BlankTitle`] for whitespace-only titles, or the repository failure.
    pub async fn add_new_task(&self, task: Task) -> Result<(), TaskServiceError> {
        if task.title.trim().is_empty() {
            return Err(TaskServiceError::BlankTitle);
        }
        self.repository.store(task).await?;
        Ok(())
    }

    /// Conclude `task` now and persist it. Returns the value that was written.
    ///
    /// # Errors
    /// Returns the repository failure.
    pub async fn mark_as_done(&self, task: Task) -> Result<Task, TaskServiceError> {
        self.update_status(task, ProgressState::Concluded).await
    }

    /// Move `task` to `status`, forward-filling timestamps, and persist it.
    ///
    /// # Errors
    /// Returns the repository failure.
    pub async fn update_status(&self, task: Task, status: ProgressState) -> Result<Task, TaskServiceError> {
        let from = task.current_status;
        let updated = task.transition_to(status, self.clock.now_millis());
        debug!(task = %updated.id, %from, to = %status, "Status transition");
        self.repository.modify(updated.clone()).await?;
        Ok(updated)
    }

    /// Overwrite `task` as edited by the caller.
    ///
    /// # Errors
    /// Returns the repository failure.
    pub async fn update_existing(&self, task: Task) -> Result<(), TaskServiceError> {
        self.repository.modify(task).await?;
        Ok(())
    }

    /// Delete the task with `task_id`.
    ///
    /// # Errors
    /// Returns the repository failure.
    pub async fn remove(&self, task_id: &TaskId) -> Result<(), TaskServiceError> {
        self.repository.erase(task_id).await?;
        Ok(())
    }
}
