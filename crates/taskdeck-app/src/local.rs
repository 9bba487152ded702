//! Port adapters over the JSON document store.

use std::sync::Arc;

use taskdeck_core::{Task, TaskId};
use taskdeck_store_local::{Account, LocalStore, LocalStoreError};
use tokio::task::JoinError;
use tracing::{debug, warn};

use crate::auth::{AuthError, AuthProvider, Identity};
use crate::repository::{RepositoryError, TaskRepository};

fn store_failure(err: LocalStoreError) -> RepositoryError {
    match err {
        LocalStoreError::Io(_) | LocalStoreError::Json(_) => RepositoryError::Unavailable(err.to_string()),
        LocalStoreError::NotOwner(_) => RepositoryError::PermissionDenied(err.to_string()),
        other => RepositoryError::Other(other.into()),
    }
}

fn join_failure(err: JoinError) -> RepositoryError {
    RepositoryError::Unavailable(format!("task join error: {err}"))
}

/// [`TaskRepository`] backed by a [`LocalStore`], scoped to the identity of `auth`.
pub struct LocalTaskRepository<A> {
    store: Arc<LocalStore>,
    auth: A,
}

impl<A> LocalTaskRepository<A> {
    /// Bind the store to an authentication provider.
    pub const fn new(store: Arc<LocalStore>, auth: A) -> Self {
        Self { store, auth }
    }

    /// Borrow the authentication provider.
    pub const fn auth(&self) -> &A {
        &self.auth
    }
}

impl<A> TaskRepository for LocalTaskRepository<A>
where
    A: AuthProvider,
{
    async fn store(&self, task: Task) -> Result<(), RepositoryError> {
        let Some(identity) = self.auth.current_identity() else {
            debug!("No identity; skipping task insert");
            return Ok(());
        };
        let task = Task {
            user_id: identity.id,
            ..task
        };
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.insert_task(&task))
            .await
            .map_err(join_failure)?
            .map_err(store_failure)?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Task>, RepositoryError> {
        let Some(identity) = self.auth.current_identity() else {
            return Ok(Vec::new());
        };
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.tasks_owned_by(&identity.id))
            .await
            .map_err(join_failure)?
            .map_err(store_failure)
    }

    async fn modify(&self, task: Task) -> Result<(), RepositoryError> {
        let identity = match self.auth.current_identity() {
            Some(identity) if !task.id.is_blank() => identity,
            _ => {
                debug!(task = %task.id, "Skipping task overwrite");
                return Ok(());
            }
        };
        let task = Task {
            user_id: identity.id.clone(),
            ..task
        };
        let store = Arc::clone(&self.store);
        let replaced = tokio::task::spawn_blocking(move || store.overwrite_owned_task(&identity.id, &task))
            .await
            .map_err(join_failure)?
            .map_err(store_failure)?;
        if !replaced {
            debug!("No stored task to overwrite");
        }
        Ok(())
    }

    async fn erase(&self, task_id: &TaskId) -> Result<(), RepositoryError> {
        let identity = match self.auth.current_identity() {
            Some(identity) if !task_id.is_blank() => identity,
            _ => {
                debug!(task = %task_id, "Skipping task removal");
                return Ok(());
            }
        };
        let store = Arc::clone(&self.store);
        let task_id = task_id.clone();
        tokio::task::spawn_blocking(move || store.remove_owned_task(&identity.id, &task_id))
            .await
            .map_err(join_failure)?
            .map_err(store_failure)?;
        Ok(())
    }
}

/// [`AuthProvider`] over the accounts and session kept in a [`LocalStore`].
#[derive(Clone)]
pub struct LocalAuthProvider {
    store: Arc<LocalStore>,
}

impl LocalAuthProvider {
    /// Authenticate against `store`.
    pub const fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    async fn run<F>(&self, op: F) -> Result<(), AuthError>
    where
        F: FnOnce(&LocalStore) -> taskdeck_store_local::Result<Account> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|err| AuthError::new(format!("task join error: {err}")))?
            .map(|_| ())
            .map_err(|err| AuthError::new(err.to_string()))
    }
}

fn identity_of(account: Account) -> Identity {
    Identity {
        id: account.uid,
        email: Some(account.email),
        display_name: Some(account.display_name).filter(|name| !name.is_empty()),
    }
}

impl AuthProvider for LocalAuthProvider {
    fn current_identity(&self) -> Option<Identity> {
        self.store.session_account().map(identity_of)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let (email, password) = (email.to_owned(), password.to_owned());
        self.run(move |store| store.sign_in(&email, &password)).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let (email, password) = (email.to_owned(), password.to_owned());
        self.run(move |store| store.create_account(&email, &password, None)).await
    }

    fn sign_out(&self) {
        if let Err(err) = self.store.sign_out() {
            warn!(error = %err, "Failed to persist sign-out");
        }
    }
}
