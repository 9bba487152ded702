//! JSON-file document store for taskdeck.
//!
//! Holds three collections: task documents keyed by store-assigned id,
//! accounts keyed by email, and the currently signed-in account.

mod accounts;
mod error;

pub use accounts::{Account, MIN_PASSWORD_LEN};
pub use error::{LocalStoreError, Result};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use taskdeck_core::{Task, TaskId, UserId};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Documents {
    tasks: BTreeMap<TaskId, Task>,
    accounts: BTreeMap<String, Account>,
    session: Option<UserId>,
}

/// Document store persisted as a single JSON file (or kept purely in memory).
pub struct LocalStore {
    path: Option<PathBuf>,
    docs: Mutex<Documents>,
}

impl LocalStore {
    /// Open the store at `path`, starting empty when the file does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let docs = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Documents::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Documents::default()
        };
        debug!(path = %path.display(), tasks = docs.tasks.len(), "Opened local store");
        Ok(Self {
            path: Some(path),
            docs: Mutex::new(docs),
        })
    }

    /// A store that never touches the filesystem.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            docs: Mutex::new(Documents::default()),
        }
    }

    /// Location of the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn docs(&self) -> MutexGuard<'_, Documents> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, docs: &Documents) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(docs)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Apply `mutate` to a copy of the documents and swap it in once it is on disk.
    ///
    /// Returning `Ok(None)` from `mutate` means nothing changed and skips the write.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Documents) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        let mut docs = self.docs();
        let mut next = docs.clone();
        let Some(outcome) = mutate(&mut next)? else {
            return Ok(None);
        };
        self.flush(&next)?;
        *docs = next;
        Ok(Some(outcome))
    }

    /// Insert a new task document under a freshly generated id.
    ///
    /// # Errors
    /// Returns an error if the store file cannot be written.
    pub fn insert_task(&self, task: &Task) -> Result<TaskId> {
        let id = TaskId::generate();
        let mut doc = task.clone();
        doc.id = id.clone();

        self.commit(|docs| {
            docs.tasks.insert(id.clone(), doc);
            Ok(Some(()))
        })?;

        info!(task = %id, owner = %task.user_id, "Inserted task document");
        Ok(id)
    }

    /// Every task document owned by `owner`, in id order.
    ///
    /// # Errors
    /// Currently infallible for the local backend; kept fallible for parity with remote stores.
    pub fn tasks_owned_by(&self, owner: &UserId) -> Result<Vec<Task>> {
        let docs = self.docs();
        Ok(docs
            .tasks
            .values()
            .filter(|task| &task.user_id == owner)
            .cloned()
            .collect())
    }

    /// Replace the document stored under `task.id` on behalf of `owner`.
    ///
    /// The stored copy keeps `owner` as its owner. Unknown ids are left alone and
    /// report `false`.
    ///
    /// # Errors
    /// Returns [`LocalStoreError::NotOwner`] if another account owns the document,
    /// or an error if the store file cannot be written.
    pub fn overwrite_owned_task(&self, owner: &UserId, task: &Task) -> Result<bool> {
        let replaced = self
            .commit(|docs| {
                let Some(slot) = docs.tasks.get_mut(&task.id) else {
                    return Ok(None);
                };
                if &slot.user_id != owner {
                    return Err(LocalStoreError::NotOwner(task.id.clone()));
                }
                *slot = Task {
                    user_id: owner.clone(),
                    ..task.clone()
                };
                Ok(Some(()))
            })?
            .is_some();

        debug!(task = %task.id, replaced, "Overwrote task document");
        Ok(replaced)
    }

    /// Delete the document stored under `id` on behalf of `owner`. Returns whether it existed.
    ///
    /// # Errors
    /// Returns [`LocalStoreError::NotOwner`] if another account owns the document,
    /// or an error if the store file cannot be written.
    pub fn remove_owned_task(&self, owner: &UserId, id: &TaskId) -> Result<bool> {
        let removed = self
            .commit(|docs| {
                let Some(task) = docs.tasks.get(id) else {
                    return Ok(None);
                };
                if &task.user_id != owner {
                    return Err(LocalStoreError::NotOwner(id.clone()));
                }
                Ok(docs.tasks.remove(id).map(drop))
            })?
            .is_some();

        debug!(task = %id, removed, "Removed task document");
        Ok(removed)
    }

    /// Register an account and sign it in.
    ///
    /// # Errors
    /// Returns an error for malformed emails, short passwords, duplicates, or write failures.
    pub fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<Account> {
        let account = Account::register(email, password, display_name)?;
        self.commit(|docs| {
            if docs.accounts.contains_key(&account.email) {
                return Err(LocalStoreError::AccountExists(account.email.clone()));
            }
            docs.accounts.insert(account.email.clone(), account.clone());
            docs.session = Some(account.uid.clone());
            Ok(Some(()))
        })?;

        info!(uid = %account.uid, "Created account");
        Ok(account)
    }

    /// Check credentials and sign the matching account in.
    ///
    /// # Errors
    /// Returns an error for unknown emails, wrong passwords, or write failures.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Account> {
        let email = accounts::normalize_email(email)?;
        let account = self
            .commit(|docs| {
                let account = docs
                    .accounts
                    .get(&email)
                    .cloned()
                    .ok_or_else(|| LocalStoreError::UnknownAccount(email.clone()))?;
                account.verify(password)?;
                docs.session = Some(account.uid.clone());
                Ok(Some(account))
            })?
            .ok_or_else(|| LocalStoreError::UnknownAccount(email.clone()))?;

        info!(uid = %account.uid, "Signed in");
        Ok(account)
    }

    /// Forget the signed-in account.
    ///
    /// # Errors
    /// Returns an error if the store file cannot be written.
    pub fn sign_out(&self) -> Result<()> {
        self.commit(|docs| Ok(docs.session.take().map(drop)))?;
        Ok(())
    }

    /// The signed-in account, if any.
    #[must_use]
    pub fn session_account(&self) -> Option<Account> {
        let docs = self.docs();
        let uid = docs.session.as_ref()?;
        docs.accounts.values().find(|account| &account.uid == uid).cloned()
    }
}
