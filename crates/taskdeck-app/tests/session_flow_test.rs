//! End-to-end flows over the file-backed store.
//!
//! These tests drive the session and task list controllers through the local
//! adapters and re-open the store to confirm what was persisted.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::redundant_clone)]

use std::sync::Arc;

use taskdeck_app::{
    LocalAuthProvider, LocalTaskRepository, SessionController, SessionStatus, TaskListController,
    TaskListViewState,
};
use taskdeck_core::{ImportanceLevel, ProgressState, SubTask, Task, UserId};
use taskdeck_store_local::LocalStore;
use tempfile::TempDir;

type Controller = TaskListController<LocalTaskRepository<LocalAuthProvider>>;

fn setup() -> (TempDir, Arc<LocalStore>, SessionController<LocalAuthProvider>) {
    let dir = TempDir::with_prefix("taskdeck-flow-").expect("create temp dir");
    let store = Arc::new(LocalStore::open(dir.path().join("store.json")).expect("open store"));
    let session = SessionController::new(LocalAuthProvider::new(Arc::clone(&store)));
    (dir, store, session)
}

fn task_list(store: &Arc<LocalStore>) -> Controller {
    let auth = LocalAuthProvider::new(Arc::clone(store));
    TaskListController::new(LocalTaskRepository::new(Arc::clone(store), auth))
}

fn titles(view: &TaskListViewState) -> Vec<&str> {
    view.tasks().iter().map(|task| task.title.as_str()).collect()
}

#[tokio::test]
async fn register_add_progress_and_reopen() {
    let (dir, store, session) = setup();
    assert_eq!(session.status(), SessionStatus::Inactive);

    session.create_account("ana@example.com", "secret1").await;
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.current_user_name().as_deref(), Some("ana"));

    let list = task_list(&store);
    list.refresh().await;
    assert!(list.view_state().tasks().is_empty());

    let report = Task {
        title: "Write report".into(),
        importance: ImportanceLevel::Critical,
        sub_tasks: vec![SubTask::new("outline"), SubTask::new("draft")],
        ..Task::with_created_at(1_000)
    };
    list.submit_new_task(report).await;
    list.submit_new_task(Task {
        title: "Buy milk".into(),
        ..Task::with_created_at(2_000)
    })
    .await;

    let view = list.view_state();
    assert_eq!(titles(&view), vec!["Write report", "Buy milk"]);
    let owner = view.tasks()[0].user_id.clone();
    assert!(view.tasks().iter().all(|task| task.user_id == owner && task.is_persisted()));

    let milk = view.tasks()[1].clone();
    list.mark_task_done(milk.clone()).await;
    let done = list.task_by_id(&milk.id).expect("cached");
    assert_eq!(done.current_status, ProgressState::Concluded);
    assert!(done.completed_at.is_some());
    assert_eq!(done.initiated_at, done.completed_at);

    list.set_sort_by_completion_date(true);
    assert_eq!(titles(&list.view_state()), vec!["Buy milk", "Write report"]);

    drop(list);
    drop(session);
    drop(store);

    let reopened = Arc::new(LocalStore::open(dir.path().join("store.json")).expect("reopen store"));
    let persisted = reopened.tasks_owned_by(&owner).expect("list tasks");
    assert_eq!(persisted.len(), 2);
    let report = persisted.iter().find(|task| task.title == "Write report").expect("report");
    assert_eq!(report.sub_tasks.len(), 2);
    assert_eq!(report.importance, ImportanceLevel::Critical);

    let session = SessionController::new(LocalAuthProvider::new(Arc::clone(&reopened)));
    assert_eq!(session.status(), SessionStatus::Active);
}

#[tokio::test]
async fn tasks_are_isolated_between_accounts() {
    let (_dir, store, session) = setup();
    session.create_account("ana@example.com", "secret1").await;
    let list = task_list(&store);
    list.submit_new_task(Task::new("ana's task")).await;

    session.end_session();
    assert_eq!(session.status(), SessionStatus::Inactive);
    list.refresh().await;
    assert!(list.view_state().tasks().is_empty());

    session.create_account("bob@example.com", "secret2").await;
    list.refresh().await;
    assert!(list.view_state().tasks().is_empty());
    list.submit_new_task(Task::new("bob's task")).await;
    assert_eq!(titles(&list.view_state()), vec!["bob's task"]);

    session.end_session();
    session.login("ana@example.com", "secret1").await;
    list.refresh().await;
    assert_eq!(titles(&list.view_state()), vec!["ana's task"]);
    assert_ne!(list.view_state().tasks()[0].user_id, UserId::default());
}

#[tokio::test]
async fn refused_credentials_surface_store_messages() {
    let (_dir, _store, session) = setup();
    session.create_account("not-an-email", "secret1").await;
    assert!(matches!(session.status(), SessionStatus::AuthError(msg) if msg.contains("badly formatted")));

    session.create_account("ana@example.com", "123").await;
    assert_eq!(
        session.status(),
        SessionStatus::AuthError("Password should be at least 6 characters".into())
    );

    session.login("nobody@example.com", "secret1").await;
    assert!(matches!(session.status(), SessionStatus::AuthError(msg) if msg.contains("no account")));
}

#[tokio::test]
async fn edit_and_remove_round_trip() {
    let (_dir, store, session) = setup();
    session.create_account("ana@example.com", "secret1").await;
    let list = task_list(&store);
    list.submit_new_task(Task::new("Draft")).await;

    let mut task = list.view_state().tasks()[0].clone();
    task.title = "Final".into();
    task.description = "edited".into();
    list.update_existing_task(task.clone()).await;
    let edited = list.task_by_id(&task.id).expect("cached");
    assert_eq!(edited.title, "Final");
    assert_eq!(edited.description, "edited");

    list.update_task_status(edited.clone(), ProgressState::Underway).await;
    let summary = list.view_state().summary().expect("summary");
    assert_eq!((summary.pending, summary.underway, summary.concluded), (0, 1, 0));

    list.remove_task(&task.id).await;
    assert!(list.view_state().tasks().is_empty());
    assert!(list.task_by_id(&task.id).is_none());
}
