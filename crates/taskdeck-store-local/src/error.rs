//! Error types for local store operations.

use taskdeck_core::TaskId;
use thiserror::Error;

/// Errors that can occur during `LocalStore` operations.
#[derive(Error, Debug)]
pub enum LocalStoreError {
    /// Reading or writing the document file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document file could not be parsed or written as JSON.
    #[error("Malformed store document: {0}")]
    Json(#[from] serde_json::Error),

    /// An account already uses this email.
    #[error("The email address is already in use by another account: {0}")]
    AccountExists(String),

    /// No account is registered for this email.
    #[error("There is no account registered for {0}")]
    UnknownAccount(String),

    /// Email is not of the form `local@domain`.
    #[error("The email address is badly formatted: {0}")]
    InvalidEmail(String),

    /// Password is shorter than the accepted minimum.
    #[error("Password should be at least {0} characters")]
    WeakPassword(usize),

    /// Password did not match the stored digest.
    #[error("The password is invalid")]
    WrongPassword,

    /// The task document belongs to another account.
    #[error("Task {0} is owned by another account")]
    NotOwner(TaskId),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, LocalStoreError>;
