//! Persistence boundary between the task core and the document store.

use std::sync::Arc;

use taskdeck_core::{Task, TaskId};
use thiserror::Error;

/// Failure reported by a [`TaskRepository`] implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached or failed to complete the call.
    #[error("task store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation for the current identity.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other failure, with its underlying cause.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Task persistence scoped to the authenticated identity.
///
/// Implementations stamp the owner on every write, read and change only the
/// caller's tasks, and treat a missing identity or blank id as "nothing to do".
/// Failures are returned as-is; callers decide whether to retry.
#[allow(async_fn_in_trait)]
pub trait TaskRepository {
    /// Persist a new task owned by the current identity.
    ///
    /// # Errors
    /// Returns [`RepositoryError`] when the store write fails.
    async fn store(&self, task: Task) -> Result<(), RepositoryError>;

    /// Every task owned by the current identity, in no particular order.
    ///
    /// # Errors
    /// Returns [`RepositoryError`] when the store read fails.
    async fn fetch_all(&self) -> Result<Vec<Task>, RepositoryError>;

    /// Overwrite the stored task with the same id.
    ///
    /// # Errors
    /// Returns [`RepositoryError`] when the store write fails.
    async fn modify(&self, task: Task) -> Result<(), RepositoryError>;

    /// Delete the task with `task_id`.
    ///
    /// # Errors
    /// Returns [`RepositoryError`] when the store delete fails.
    async fn erase(&self, task_id: &TaskId) -> Result<(), RepositoryError>;
}

impl<R> TaskRepository for &R
where
    R: TaskRepository + ?Sized,
{
    async fn store(&self, task: Task) -> Result<(), RepositoryError> {
        (**self).store(task).await
    }

    async fn fetch_all(&self) -> Result<Vec<Task>, RepositoryError> {
        (**self).fetch_all().await
    }

    async fn modify(&self, task: Task) -> Result<(), RepositoryError> {
        (**self).modify(task).await
    }

    async fn erase(&self, task_id: &TaskId) -> Result<(), RepositoryError> {
        (**self).erase(task_id).await
    }
}

impl<R> TaskRepository for Arc<R>
where
    R: TaskRepository + ?Sized,
{
    async fn store(&self, task: Task) -> Result<(), RepositoryError> {
        (**self).store(task).await
    }

    async fn fetch_all(&self) -> Result<Vec<Task>, RepositoryError> {
        (**self).fetch_all().await
    }

    async fn modify(&self, task: Task) -> Result<(), RepositoryError> {
        (**self).modify(task).await
    }

    async fn erase(&self, task_id: &TaskId) -> Result<(), RepositoryError> {
        (**self).erase(task_id).await
    }
}
