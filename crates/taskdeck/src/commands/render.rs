use std::fmt::Write as _;

use taskdeck_app::{format_day, format_elapsed};
use taskdeck_core::{EpochMillis, Task, TaskId, TaskSummary};

const SHORT_ID_LEN: usize = 8;

/// Leading characters of `id`, enough to address it from the command line.
pub fn short_id(id: &TaskId) -> &str {
    id.as_str().get(..SHORT_ID_LEN).unwrap_or(id.as_str())
}

fn day_or_dash(millis: EpochMillis) -> String {
    if millis == 0 { "-".to_owned() } else { format_day(millis) }
}

fn checklist_progress(task: &Task) -> String {
    if task.sub_tasks.is_empty() {
        return "-".to_owned();
    }
    let done = task.sub_tasks.iter().filter(|item| item.is_done).count();
    format!("{done}/{}", task.sub_tasks.len())
}

pub fn task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks\n".to_owned();
    }
    let mut out = format!(
        "{:<8}  {:<9}  {:<12}  {:<10}  {:<9}  {}\n",
        "ID", "STATUS", "IMPORTANCE", "DUE", "CHECKLIST", "TITLE"
    );
    for task in tasks {
        let _ = writeln!(
            out,
            "{:<8}  {:<9}  {:<12}  {:<10}  {:<9}  {}",
            short_id(&task.id),
            task.current_status.as_str(),
            task.importance.as_str(),
            day_or_dash(task.due_date),
            checklist_progress(task),
            task.title
        );
    }
    out
}

pub fn task_detail(task: &Task, now: EpochMillis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id:          {}", task.id);
    let _ = writeln!(out, "title:       {}", task.title);
    let _ = writeln!(out, "status:      {}", task.current_status);
    let _ = writeln!(out, "importance:  {}", task.importance);
    let _ = writeln!(out, "due:         {}", day_or_dash(task.due_date));
    let _ = writeln!(out, "created:     {}", day_or_dash(task.created_at));
    if let Some(started) = task.initiated_at {
        let _ = writeln!(out, "started:     {}", format_day(started));
    }
    if let Some(completed) = task.completed_at {
        let _ = writeln!(out, "completed:   {}", format_day(completed));
    }
    if let Some(elapsed) = task.elapsed_since_start(now) {
        let _ = writeln!(out, "elapsed:     {}", format_elapsed(elapsed));
    }
    if !task.description.is_empty() {
        let _ = writeln!(out, "\n{}", task.description);
    }
    if !task.sub_tasks.is_empty() {
        let _ = writeln!(out, "\nchecklist:");
        for (position, item) in task.sub_tasks.iter().enumerate() {
            let mark = if item.is_done { 'x' } else { ' ' };
            let _ = writeln!(out, "  {}. [{mark}] {}", position + 1, item.title);
        }
    }
    out
}

pub fn summary(counts: &TaskSummary) -> String {
    format!(
        "pending:    {}\nunderway:   {}\nconcluded:  {}\ntotal:      {}\n",
        counts.pending,
        counts.underway,
        counts.concluded,
        counts.total()
    )
}
