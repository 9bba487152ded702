//! Email/password accounts kept next to the task documents.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use taskdeck_core::UserId;

use crate::error::{LocalStoreError, Result};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable account id; owner of the account's tasks.
    pub uid: UserId,
    /// Sign-in email, stored lowercase.
    pub email: String,
    /// Optional human-readable name.
    #[serde(default)]
    pub display_name: String,
    password_sha256: String,
}

impl Account {
    pub(crate) fn register(email: &str, password: &str, display_name: Option<String>) -> Result<Self> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(LocalStoreError::WeakPassword(MIN_PASSWORD_LEN));
        }
        let uid = UserId::generate();
        let password_sha256 = digest(&uid, password);
        Ok(Self {
            uid,
            email,
            display_name: display_name.unwrap_or_default(),
            password_sha256,
        })
    }

    pub(crate) fn verify(&self, password: &str) -> Result<()> {
        if digest(&self.uid, password) == self.password_sha256 {
            Ok(())
        } else {
            Err(LocalStoreError::WrongPassword)
        }
    }
}

/// Trim and lowercase an email, rejecting anything without a local part and a dotted domain.
pub(crate) fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.split('.').count() >= 2
            && domain.split('.').all(|part| !part.is_empty())
    });
    if valid {
        Ok(email)
    } else {
        Err(LocalStoreError::InvalidEmail(raw.trim().to_owned()))
    }
}

fn digest(uid: &UserId, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uid.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
