//! Application layer for taskdeck.
//!
//! This crate provides the persistence and authentication ports, the task
//! lifecycle use cases, and the controllers that keep view-state in sync for
//! the command-line front end.

pub mod auth;
pub mod config;
pub mod date_util;
pub mod local;
pub mod repository;
pub mod service;
pub mod session;
pub mod task_list;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use auth::{AuthError, AuthProvider, Identity};
pub use config::{AppConfig, FiltersConfig, StoreConfig};
pub use date_util::{format_day, format_elapsed, parse_day};
pub use local::{LocalAuthProvider, LocalTaskRepository};
pub use repository::{RepositoryError, TaskRepository};
pub use service::{TaskService, TaskServiceError};
pub use session::{SessionController, SessionStatus};
pub use task_list::{TaskListController, TaskListViewState};
