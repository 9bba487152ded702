//! Task list synchronization: cached tasks, filters, and the derived view-state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use taskdeck_core::{
    Clock, FilterOptions, ImportanceLevel, ProgressState, SystemClock, Task, TaskId, TaskSummary,
    organize_and_filter,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::repository::TaskRepository;
use crate::service::TaskService;

/// What the task list screen should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListViewState {
    /// A fetch is in flight.
    Loading,
    /// The last operation failed with this message.
    Error(String),
    /// Organized tasks plus the filters that produced them.
    Success {
        /// Tasks after search, filter, and sort.
        tasks: Vec<Task>,
        /// Filters in effect.
        filters: FilterOptions,
    },
}

impl TaskListViewState {
    /// Per-status counts over the displayed tasks; `None` unless loaded.
    #[must_use]
    pub fn summary(&self) -> Option<TaskSummary> {
        match self {
            Self::Success { tasks, .. } => Some(TaskSummary::from_tasks(tasks)),
            Self::Loading | Self::Error(_) => None,
        }
    }

    /// Displayed tasks; empty unless loaded.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        match self {
            Self::Success { tasks, .. } => tasks,
            Self::Loading | Self::Error(_) => &[],
        }
    }
}

#[derive(Debug)]
struct ListState {
    tasks: Vec<Task>,
    is_loading: bool,
    error: Option<String>,
    filters: FilterOptions,
    issued_refreshes: u64,
}

impl ListState {
    fn view(&self) -> TaskListViewState {
        if self.is_loading {
            TaskListViewState::Loading
        } else if let Some(message) = &self.error {
            TaskListViewState::Error(message.clone())
        } else {
            TaskListViewState::Success {
                tasks: organize_and_filter(&self.tasks, &self.filters),
                filters: self.filters.clone(),
            }
        }
    }
}

/// Owns the task cache and filter state for one session.
///
/// Every mutation recomputes the whole view-state from
/// `(tasks, is_loading, error, filters)` and publishes it on a watch channel.
/// Failures never escape: they become [`TaskListViewState::Error`], and a
/// later [`refresh`](Self::refresh) is the retry path.
pub struct TaskListController<R, C = SystemClock> {
    service: TaskService<R, C>,
    state: Mutex<ListState>,
    view: watch::Sender<TaskListViewState>,
}

impl<R> TaskListController<R> {
    /// Controller over `repository`, stamping times from the system clock.
    pub fn new(repository: R) -> Self {
        Self::with_service(TaskService::new(repository))
    }
}

impl<R, C> TaskListController<R, C> {
    /// Controller over an existing service. Starts in the loading state.
    pub fn with_service(service: TaskService<R, C>) -> Self {
        let state = ListState {
            tasks: Vec::new(),
            is_loading: true,
            error: None,
            filters: FilterOptions::default(),
            issued_refreshes: 0,
        };
        let (view, _) = watch::channel(state.view());
        Self {
            service,
            state: Mutex::new(state),
            view,
        }
    }

    /// Borrow the lifecycle service.
    pub const fn service(&self) -> &TaskService<R, C> {
        &self.service
    }

    /// Current view-state.
    pub fn view_state(&self) -> TaskListViewState {
        self.view.borrow().clone()
    }

    /// Observe every future view-state.
    pub fn subscribe(&self) -> watch::Receiver<TaskListViewState> {
        self.view.subscribe()
    }

    /// Filters currently in effect.
    pub fn filter_options(&self) -> FilterOptions {
        self.lock().filters.clone()
    }

    /// Look a task up in the cache. The cache may lag behind the store.
    pub fn task_by_id(&self, task_id: &TaskId) -> Option<Task> {
        self.lock().tasks.iter().find(|task| &task.id == task_id).cloned()
    }

    /// Every cached task, unfiltered and in fetch order.
    pub fn cached_tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Replace all filters at once.
    pub fn set_filter_options(&self, filters: FilterOptions) {
        self.update(|state| state.filters = filters);
    }

    /// Change the search text.
    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|state| state.filters.search_query = query);
    }

    /// Change or clear the importance filter.
    pub fn set_importance_filter(&self, importance: Option<ImportanceLevel>) {
        self.update(|state| state.filters.importance_filter = importance);
    }

    /// Change or clear the status filter.
    pub fn set_status_filter(&self, status: Option<ProgressState>) {
        self.update(|state| state.filters.status_filter = status);
    }

    /// Toggle completion-date ordering.
    pub fn set_sort_by_completion_date(&self, enabled: bool) {
        self.update(|state| state.filters.sort_by_completion_date = enabled);
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<T>(&self, mutate: impl FnOnce(&mut ListState) -> T) -> T {
        let mut state = self.lock();
        let out = mutate(&mut state);
        self.view.send_replace(state.view());
        drop(state);
        out
    }

    fn report(&self, message: String) {
        warn!(%message, "Task list operation failed");
        self.update(|state| state.error = Some(message));
    }
}

impl<R, C> TaskListController<R, C>
where
    R: TaskRepository,
    C: Clock,
{
    /// Reload the cache from the repository.
    ///
    /// Overlapping refreshes all reach the store, but only the most recently
    /// issued one may replace the cache or clear the loading flag.
    pub async fn refresh(&self) {
        let ticket = self.update(|state| {
            state.issued_refreshes += 1;
            state.is_loading = true;
            state.error = None;
            state.issued_refreshes
        });

        let result = self.service.repository().fetch_all().await;

        self.update(|state| {
            if ticket != state.issued_refreshes {
                debug!(ticket, latest = state.issued_refreshes, "Discarding superseded refresh");
                return;
            }
            match result {
                Ok(tasks) => {
                    debug!(count = tasks.len(), "Task cache refreshed");
                    state.tasks = tasks;
                }
                Err(err) => {
                    warn!(error = %err, "Task refresh failed");
                    state.error = Some(format!("Failed to load tasks: {err}"));
                }
            }
            state.is_loading = false;
        });
    }

    /// Persist a new task, then reload.
    pub async fn submit_new_task(&self, task: Task) {
        match self.service.add_new_task(task).await {
            Ok(()) => self.refresh().await,
            Err(err) => self.report(format!("Failed to add task: {err}")),
        }
    }

    /// Move a task to `status` with forward-filled timestamps, then reload.
    pub async fn update_task_status(&self, task: Task, status: ProgressState) {
        match self.service.update_status(task, status).await {
            Ok(_) => self.refresh().await,
            Err(err) => self.report(format!("Failed to update task: {err}")),
        }
    }

    /// Conclude a task now, then reload.
    pub async fn mark_task_done(&self, task: Task) {
        self.update_task_status(task, ProgressState::Concluded).await;
    }

    /// Delete a task, then reload.
    pub async fn remove_task(&self, task_id: &TaskId) {
        match self.service.remove(task_id).await {
            Ok(()) => self.refresh().await,
            Err(err) => self.report(format!("Failed to delete task: {err}")),
        }
    }

    /// Overwrite a fully edited task, then reload.
    pub async fn update_existing_task(&self, task: Task) {
        match self.service.update_existing(task).await {
            Ok(()) => self.refresh().await,
            Err(err) => self.report(format!("Failed to update task: {err}")),
        }
    }
}
