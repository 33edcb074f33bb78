//! Conversion between the backend representation of a todo and the one the
//! views work with.

use crate::todo::{DurationError, Todo, human_to_seconds, seconds_to_human};

use super::models::{NamedEntry, WireTodo};

/// Converts a view todo into the backend structure.
///
/// Fails when one of the durations does not follow the `2d3h4m5s` grammar;
/// callers are expected to have validated the todo before.
pub fn to_backend(todo: &Todo) -> Result<WireTodo, DurationError> {
    Ok(WireTodo {
        id: todo.id,
        created: todo.created,
        changed: todo.changed,
        title: todo.title.clone(),
        description: todo.description.clone(),
        priority: todo.priority,
        complexity: todo.complexity,
        completed: todo.completed,
        tags: todo.tags.iter().map(NamedEntry::new).collect(),
        projects: todo.projects.iter().map(NamedEntry::new).collect(),
        working_time: human_to_seconds(&todo.working_time)?,
        estimated_working_time: human_to_seconds(&todo.estimated_working_time)?,
        tasks: todo.tasks.clone(),
    })
}

/// Like [`to_backend`], but a duration still showing what `last` rendered to
/// keeps the exact seconds of `last`. Those may lie beyond what the duration
/// grammar can express.
pub fn to_backend_over(todo: &Todo, last: &WireTodo) -> Result<WireTodo, DurationError> {
    Ok(WireTodo {
        working_time: seconds_keeping(&todo.working_time, last.working_time)?,
        estimated_working_time: seconds_keeping(
            &todo.estimated_working_time,
            last.estimated_working_time,
        )?,
        ..to_backend(&Todo {
            working_time: String::new(),
            estimated_working_time: String::new(),
            ..todo.clone()
        })?
    })
}

fn seconds_keeping(text: &str, last: u64) -> Result<u64, DurationError> {
    if text == seconds_to_human(last) {
        Ok(last)
    } else {
        human_to_seconds(text)
    }
}

/// Converts a backend todo (usually from a REST response) into the view structure.
pub fn to_frontend(todo: &WireTodo) -> Todo {
    Todo {
        id: todo.id,
        created: todo.created,
        changed: todo.changed,
        title: todo.title.clone(),
        description: todo.description.clone(),
        priority: todo.priority,
        complexity: todo.complexity,
        completed: todo.completed,
        tags: todo.tags.iter().map(|entry| entry.name.clone()).collect(),
        projects: todo.projects.iter().map(|entry| entry.name.clone()).collect(),
        working_time: seconds_to_human(todo.working_time),
        estimated_working_time: seconds_to_human(todo.estimated_working_time),
        tasks: todo.tasks.clone(),
    }
}
