use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use taskdeck_app::{
    AppConfig, LocalAuthProvider, LocalTaskRepository, SessionController, SessionStatus,
    TaskListController, TaskListViewState,
};
use taskdeck_store_local::LocalStore;
use tracing::debug;

use crate::Command;

mod handlers;
mod render;

type TaskList = TaskListController<LocalTaskRepository<LocalAuthProvider>>;

/// Open the configured store, then route `command` to the session or task handlers.
pub async fn run(workdir: &Path, command: Command) -> Result<()> {
    let config = AppConfig::from_workdir(workdir)?;
    let store_path = config.store_path(workdir);
    debug!(path = %store_path.display(), "Opening store");
    let store = Arc::new(
        LocalStore::open(&store_path).with_context(|| format!("failed to open {}", store_path.display()))?,
    );
    let auth = LocalAuthProvider::new(Arc::clone(&store));
    let session = SessionController::new(auth.clone());

    match command {
        Command::Register { email, password } => {
            session.create_account(&email, &password).await;
            settle_session(&session)
        }
        Command::Login { email, password } => {
            session.login(&email, &password).await;
            settle_session(&session)
        }
        Command::Logout => {
            session.end_session();
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            if session.status() != SessionStatus::Active {
                println!("Not signed in");
                return Ok(());
            }
            let name = session.current_user_name().unwrap_or_default();
            let email = session.current_user_email().unwrap_or_default();
            println!("{name} <{email}>");
            Ok(())
        }
        other => {
            if session.status() != SessionStatus::Active {
                bail!("not signed in; run `taskdeck login` first");
            }
            let list: TaskList = TaskListController::new(LocalTaskRepository::new(store, auth));
            list.set_filter_options(config.filter_options()?);
            list.refresh().await;
            ensure_loaded(&list.view_state())?;
            handlers::run(other, &list).await
        }
    }
}

fn settle_session(session: &SessionController<LocalAuthProvider>) -> Result<()> {
    match session.status() {
        SessionStatus::Active => {
            let email = session.current_user_email().unwrap_or_default();
            println!("Signed in as {email}");
            Ok(())
        }
        SessionStatus::AuthError(message) => bail!("{message}"),
        other => bail!("unexpected session status: {other:?}"),
    }
}

/// Turn an error view-state into a command failure.
fn ensure_loaded(view: &TaskListViewState) -> Result<()> {
    match view {
        TaskListViewState::Error(message) => bail!("{message}"),
        TaskListViewState::Loading => bail!("task list is still loading"),
        TaskListViewState::Success { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::{ProgressState, UserId};
    use tempfile::TempDir;

    fn ok(result: Result<()>, context: &str) {
        result.unwrap_or_else(|err| panic!("{context}: {err:#}"));
    }

    fn stored_tasks(workdir: &Path) -> Vec<taskdeck_core::Task> {
        let store = LocalStore::open(workdir.join(".taskdeck/store.json"))
            .unwrap_or_else(|err| panic!("open store: {err}"));
        let owner: UserId = store
            .session_account()
            .map(|account| account.uid)
            .unwrap_or_else(|| panic!("signed in"));
        store.tasks_owned_by(&owner).unwrap_or_else(|err| panic!("list: {err}"))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn task_commands_require_a_session() {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let err = run(dir.path(), Command::Summary).await.err().map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("not signed in; run `taskdeck login` first"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn register_add_and_finish_a_task() {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let workdir = dir.path();
        ok(
            run(
                workdir,
                Command::Register {
                    email: "ana@example.com".into(),
                    password: "secret1".into(),
                },
            )
            .await,
            "register",
        );
        ok(
            run(
                workdir,
                Command::Add {
                    title: "Write report".into(),
                    description: None,
                    due: Some("2024-03-15".into()),
                    importance: None,
                    subtasks: vec!["outline".into()],
                },
            )
            .await,
            "add",
        );

        let tasks = stored_tasks(workdir);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].due_date, 1_710_460_800_000);
        let id = tasks[0].id.as_str()[..6].to_owned();

        ok(run(workdir, Command::Done { task: id.clone() }).await, "done");
        ok(
            run(
                workdir,
                Command::Edit {
                    task: id,
                    title: None,
                    description: Some("final".into()),
                    due: None,
                    importance: None,
                    subtasks: Vec::new(),
                    toggles: vec![1],
                },
            )
            .await,
            "edit",
        );

        let task = &stored_tasks(workdir)[0];
        assert_eq!(task.current_status, ProgressState::Concluded);
        assert!(task.completed_at.is_some());
        assert_eq!(task.description, "final");
        assert!(task.sub_tasks[0].is_done);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn wrong_password_is_reported() {
        let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let register = Command::Register {
            email: "ana@example.com".into(),
            password: "secret1".into(),
        };
        ok(run(dir.path(), register).await, "register");
        ok(run(dir.path(), Command::Logout).await, "logout");

        let login = Command::Login {
            email: "ana@example.com".into(),
            password: "nope".into(),
        };
        let err = run(dir.path(), login).await.err().map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("The password is invalid"));
    }
}
