use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{ImportanceLevel, ProgressState, Task, TextMatcher};

/// Search, filter, and sort settings for one session's task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Text matched against title and description; blank means no search.
    pub search_query: String,
    /// Keep only tasks of this importance.
    pub importance_filter: Option<ImportanceLevel>,
    /// Keep only tasks in this stage.
    pub status_filter: Option<ProgressState>,
    /// Most recently concluded first instead of creation order.
    pub sort_by_completion_date: bool,
}

impl FilterOptions {
    /// Whether `task` passes the importance and status filters.
    #[must_use]
    pub fn admits(&self, task: &Task) -> bool {
        self.importance_filter.is_none_or(|level| task.importance == level)
            && self.status_filter.is_none_or(|status| task.current_status == status)
    }

    /// Whether any setting narrows the list.
    #[must_use]
    pub fn is_narrowing(&self) -> bool {
        !self.search_query.trim().is_empty()
            || self.importance_filter.is_some()
            || self.status_filter.is_some()
    }
}

/// Produce the display-ready task list.
///
/// Searches title/description, applies the importance and status filters, and
/// sorts either by creation time (oldest first) or by completion time (newest
/// first, never-concluded tasks last). The sort is stable and the input is left
/// untouched.
#[must_use]
pub fn organize_and_filter(tasks: &[Task], options: &FilterOptions) -> Vec<Task> {
    let matcher = TextMatcher::new(&options.search_query);
    let mut kept: Vec<Task> = tasks
        .iter()
        .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
        .filter(|task| options.admits(task))
        .cloned()
        .collect();

    if options.sort_by_completion_date {
        kept.sort_by(compare_by_completion);
    } else {
        kept.sort_by_key(|task| task.created_at);
    }
    kept
}

fn compare_by_completion(a: &Task, b: &Task) -> Ordering {
    match (a.completed_at, b.completed_at) {
        (Some(a_ts), Some(b_ts)) => b_ts.cmp(&a_ts),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, created_at: i64) -> Task {
        Task {
            id: title.into(),
            title: title.into(),
            ..Task::with_created_at(created_at)
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(organize_and_filter(&[], &FilterOptions::default()).is_empty());
    }

    #[test]
    fn default_options_sort_by_creation_ascending() {
        let tasks = vec![task("late", 200), task("early", 100), task("middle", 150)];
        let out = organize_and_filter(&tasks, &FilterOptions::default());
        assert_eq!(titles(&out), vec!["early", "middle", "late"]);
        assert_eq!(titles(&tasks), vec!["late", "early", "middle"]);
    }

    #[test]
    fn search_matches_title_or_description_ignoring_case() {
        let mut described = task("Groceries", 2);
        described.description = "remember the MILK".into();
        let tasks = vec![task("Buy milk", 1), described, task("Call mom", 3)];
        let options = FilterOptions {
            search_query: "Milk".into(),
            ..FilterOptions::default()
        };
        let out = organize_and_filter(&tasks, &options);
        assert_eq!(titles(&out), vec!["Buy milk", "Groceries"]);
    }

    #[test]
    fn blank_search_keeps_everything() {
        let tasks = vec![task("a", 1), task("b", 2)];
        let options = FilterOptions {
            search_query: "   ".into(),
            ..FilterOptions::default()
        };
        assert_eq!(organize_and_filter(&tasks, &options).len(), 2);
    }

    #[test]
    fn importance_and_status_filters_combine() {
        let mut critical_pending = task("critical-pending", 1);
        critical_pending.importance = ImportanceLevel::Critical;
        let mut critical_done = task("critical-done", 2);
        critical_done.importance = ImportanceLevel::Critical;
        critical_done.current_status = ProgressState::Concluded;
        let regular_pending = task("regular-pending", 3);

        let tasks = vec![critical_pending, critical_done, regular_pending];
        let options = FilterOptions {
            importance_filter: Some(ImportanceLevel::Critical),
            status_filter: Some(ProgressState::Pending),
            ..FilterOptions::default()
        };
        let out = organize_and_filter(&tasks, &options);
        assert_eq!(titles(&out), vec!["critical-pending"]);
        assert!(options.is_narrowing());
    }

    #[test]
    fn completion_sort_puts_recent_first_and_unset_last() {
        let mut old = task("old", 1);
        old.completed_at = Some(100);
        let mut recent = task("recent", 2);
        recent.completed_at = Some(300);
        let never = task("never", 0);

        let tasks = vec![never, old, recent];
        let options = FilterOptions {
            sort_by_completion_date: true,
            ..FilterOptions::default()
        };
        let out = organize_and_filter(&tasks, &options);
        assert_eq!(titles(&out), vec!["recent", "old", "never"]);
    }

    #[test]
    fn completed_task_precedes_unset_regardless_of_input_order() {
        let mut a = task("a", 50);
        a.completed_at = Some(100);
        let b = task("b", 10);

        let by_completion = FilterOptions {
            sort_by_completion_date: true,
            ..FilterOptions::default()
        };
        let out = organize_and_filter(&[b.clone(), a.clone()], &by_completion);
        assert_eq!(titles(&out), vec!["a", "b"]);
        let out = organize_and_filter(&[a, b], &by_completion);
        assert_eq!(titles(&out), vec!["a", "b"]);
    }

    #[test]
    fn organizing_twice_is_stable() {
        let mut tied_one = task("tied-one", 5);
        tied_one.completed_at = Some(10);
        let mut tied_two = task("tied-two", 5);
        tied_two.completed_at = Some(10);
        let tasks = vec![tied_two, task("x", 5), tied_one, task("y", 1)];

        for sort_by_completion_date in [false, true] {
            let options = FilterOptions {
                sort_by_completion_date,
                ..FilterOptions::default()
            };
            let once = organize_and_filter(&tasks, &options);
            let twice = organize_and_filter(&once, &options);
            assert_eq!(once, twice);
            assert_eq!(once.len(), tasks.len());
        }
    }
}
