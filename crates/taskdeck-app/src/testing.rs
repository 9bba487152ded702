//! In-memory doubles for the repository and authentication ports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use taskdeck_core::{Task, TaskId, UserId};
use tokio::sync::oneshot;

use crate::auth::{AuthError, AuthProvider, Identity};
use crate::repository::{RepositoryError, TaskRepository};

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    Store(Task),
    FetchAll,
    Modify(Task),
    Erase(TaskId),
}

#[derive(Default)]
struct RepoInner {
    tasks: Vec<Task>,
    calls: Vec<RepoCall>,
    failure: Option<String>,
    held_fetches: VecDeque<oneshot::Receiver<Vec<Task>>>,
    next_id: u32,
}

/// Repository double that records every call.
#[derive(Clone, Default)]
pub struct MockRepository {
    inner: Arc<Mutex<RepoInner>>,
}

impl MockRepository {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let repo = Self::default();
        guard(&repo.inner).tasks = tasks;
        repo
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        guard(&self.inner).calls.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        guard(&self.inner).tasks.clone()
    }

    pub fn fail_with(&self, message: &str) {
        guard(&self.inner).failure = Some(message.to_owned());
    }

    pub fn recover(&self) {
        guard(&self.inner).failure = None;
    }

    /// The next `fetch_all` waits for the returned sender instead of reading stored tasks.
    pub fn hold_next_fetch(&self) -> oneshot::Sender<Vec<Task>> {
        let (tx, rx) = oneshot::channel();
        guard(&self.inner).held_fetches.push_back(rx);
        tx
    }

    fn record(&self, call: RepoCall) -> Result<(), RepositoryError> {
        let mut inner = guard(&self.inner);
        inner.calls.push(call);
        inner
            .failure
            .clone()
            .map_or(Ok(()), |message| Err(RepositoryError::Unavailable(message)))
    }
}

impl TaskRepository for MockRepository {
    async fn store(&self, task: Task) -> Result<(), RepositoryError> {
        self.record(RepoCall::Store(task.clone()))?;
        let mut inner = guard(&self.inner);
        inner.next_id += 1;
        let id = format!("mock-{}", inner.next_id);
        inner.tasks.push(Task {
            id: id.into(),
            ..task
        });
        drop(inner);
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Task>, RepositoryError> {
        self.record(RepoCall::FetchAll)?;
        let held = guard(&self.inner).held_fetches.pop_front();
        if let Some(rx) = held {
            return rx
                .await
                .map_err(|_| RepositoryError::Unavailable("held fetch dropped".into()));
        }
        Ok(self.tasks())
    }

    async fn modify(&self, task: Task) -> Result<(), RepositoryError> {
        self.record(RepoCall::Modify(task.clone()))?;
        let mut inner = guard(&self.inner);
        if let Some(slot) = inner.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
        drop(inner);
        Ok(())
    }

    async fn erase(&self, task_id: &TaskId) -> Result<(), RepositoryError> {
        self.record(RepoCall::Erase(task_id.clone()))?;
        guard(&self.inner).tasks.retain(|t| &t.id != task_id);
        Ok(())
    }
}

#[derive(Default)]
struct AuthInner {
    identity: Option<Identity>,
    refusal: Option<String>,
    sign_outs: usize,
}

/// Authentication double with a switchable identity.
#[derive(Clone, Default)]
pub struct MockAuth {
    inner: Arc<Mutex<AuthInner>>,
}

impl MockAuth {
    pub fn signed_in(uid: &str, email: &str) -> Self {
        let auth = Self::default();
        guard(&auth.inner).identity = Some(identity(uid, email));
        auth
    }

    pub fn refuse_with(&self, message: &str) {
        guard(&self.inner).refusal = Some(message.to_owned());
    }

    pub fn sign_outs(&self) -> usize {
        guard(&self.inner).sign_outs
    }

    fn attempt(&self, email: &str) -> Result<(), AuthError> {
        let mut inner = guard(&self.inner);
        if let Some(message) = inner.refusal.clone() {
            return Err(AuthError::new(message));
        }
        inner.identity = Some(identity("uid-signed-in", email));
        drop(inner);
        Ok(())
    }
}

fn identity(uid: &str, email: &str) -> Identity {
    Identity {
        id: UserId::from(uid),
        email: Some(email.to_owned()),
        display_name: None,
    }
}

impl AuthProvider for MockAuth {
    fn current_identity(&self) -> Option<Identity> {
        guard(&self.inner).identity.clone()
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<(), AuthError> {
        self.attempt(email)
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<(), AuthError> {
        self.attempt(email)
    }

    fn sign_out(&self) {
        let mut inner = guard(&self.inner);
        inner.identity = None;
        inner.sign_outs += 1;
    }
}
