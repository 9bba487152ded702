use anyhow::{Context, Result, bail};
use taskdeck_app::{TaskListController, TaskRepository, parse_day};
use taskdeck_core::{Clock, ProgressState, SubTask, Task};

use super::{ensure_loaded, render};
use crate::{Command, LsFormat};

pub async fn run<R, C>(command: Command, list: &TaskListController<R, C>) -> Result<()>
where
    R: TaskRepository,
    C: Clock,
{
    match command {
        Command::Add {
            title,
            description,
            due,
            importance,
            subtasks,
        } => {
            let task = Task {
                description: description.unwrap_or_default(),
                due_date: due.as_deref().map(parse_day).transpose()?.unwrap_or_default(),
                importance: importance.unwrap_or_default(),
                sub_tasks: subtasks.into_iter().map(SubTask::new).collect(),
                ..Task::new(title.clone())
            };
            list.submit_new_task(task).await;
            ensure_loaded(&list.view_state())?;
            println!("Added '{title}'");
            Ok(())
        }
        Command::Ls {
            search,
            importance,
            status,
            sort_by_completion,
            format,
        } => {
            let mut filters = list.filter_options();
            if let Some(query) = search {
                filters.search_query = query;
            }
            if importance.is_some() {
                filters.importance_filter = importance;
            }
            if status.is_some() {
                filters.status_filter = status;
            }
            filters.sort_by_completion_date |= sort_by_completion;
            let narrowing = filters.is_narrowing();
            list.set_filter_options(filters);

            let view = list.view_state();
            match format {
                LsFormat::Table if narrowing && view.tasks().is_empty() => {
                    println!("No tasks match the current filters");
                }
                LsFormat::Table => print!("{}", render::task_table(view.tasks())),
                LsFormat::Json => println!("{}", serde_json::to_string_pretty(view.tasks())?),
            }
            Ok(())
        }
        Command::Show { task } => {
            let task = resolve_task(&list.cached_tasks(), &task)?;
            print!("{}", render::task_detail(&task, list.service().clock().now_millis()));
            Ok(())
        }
        Command::Start { task } => transition(list, &task, ProgressState::Underway).await,
        Command::Status { task, to } => transition(list, &task, to).await,
        Command::Done { task } => transition(list, &task, ProgressState::Concluded).await,
        Command::Edit {
            task,
            title,
            description,
            due,
            importance,
            subtasks,
            toggles,
        } => {
            let mut task = resolve_task(&list.cached_tasks(), &task)?;
            let untouched = task.clone();
            if let Some(title) = title {
                if title.trim().is_empty() {
                    bail!("title must not be blank");
                }
                task.title = title;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(due) = due {
                task.due_date = parse_day(&due)?;
            }
            if let Some(importance) = importance {
                task.importance = importance;
            }
            task.sub_tasks.extend(subtasks.into_iter().map(SubTask::new));
            for position in toggles {
                let item = position
                    .checked_sub(1)
                    .and_then(|index| task.sub_tasks.get_mut(index))
                    .with_context(|| format!("no checklist item at position {position}"))?;
                item.is_done = !item.is_done;
            }
            if task == untouched {
                bail!("nothing to edit");
            }

            let id = task.id.clone();
            list.update_existing_task(task).await;
            ensure_loaded(&list.view_state())?;
            println!("Updated {}", render::short_id(&id));
            Ok(())
        }
        Command::Rm { task } => {
            let task = resolve_task(&list.cached_tasks(), &task)?;
            list.remove_task(&task.id).await;
            ensure_loaded(&list.view_state())?;
            println!("Removed '{}'", task.title);
            Ok(())
        }
        Command::Summary => {
            let summary = list.view_state().summary().unwrap_or_default();
            print!("{}", render::summary(&summary));
            Ok(())
        }
        Command::Register { .. } | Command::Login { .. } | Command::Logout | Command::Whoami => {
            unreachable!("Session commands are handled before the task list loads")
        }
    }
}

async fn transition<R, C>(list: &TaskListController<R, C>, token: &str, to: ProgressState) -> Result<()>
where
    R: TaskRepository,
    C: Clock,
{
    let task = resolve_task(&list.cached_tasks(), token)?;
    let id = task.id.clone();
    list.update_task_status(task, to).await;
    ensure_loaded(&list.view_state())?;
    println!("{} -> {to}", render::short_id(&id));
    Ok(())
}

/// Find a cached task by full id or unique id prefix.
fn resolve_task(tasks: &[Task], token: &str) -> Result<Task> {
    let token = token.trim();
    if token.is_empty() {
        bail!("task id must not be empty");
    }
    if let Some(task) = tasks.iter().find(|task| task.id.as_str() == token) {
        return Ok(task.clone());
    }
    let mut candidates = tasks.iter().filter(|task| task.id.as_str().starts_with(token));
    match (candidates.next(), candidates.next()) {
        (Some(task), None) => Ok(task.clone()),
        (None, _) => bail!("no task matches '{token}'"),
        (Some(_), Some(_)) => bail!("task id prefix '{token}' is ambiguous"),
    }
}
