use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::complexity::Complexity;
use super::priority::Priority;

/// Sub item of a todo.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// A todo the way the views work with it: tags and projects as plain names,
/// durations as human readable strings (`1h 30m`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Todo {
    pub id: Option<i64>,
    pub created: Option<DateTime<Utc>>,
    pub changed: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub complexity: Complexity,
    pub completed: bool,
    pub tags: Vec<String>,
    pub projects: Vec<String>,
    pub working_time: String,
    pub estimated_working_time: String,
    pub tasks: Vec<Task>,
}

impl Todo {
    /// A blank todo as the create dialog starts with it.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag == name)
    }

    pub fn has_project(&self, name: &str) -> bool {
        self.projects.iter().any(|project| project == name)
    }

    pub fn has_estimation(&self) -> bool {
        !self.estimated_working_time.trim().is_empty()
    }

    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Case insensitive substring match of `search` against the title.
    pub fn title_contains(&self, search: &str) -> bool {
        self.title.to_lowercase().contains(&search.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_dialog_defaults() {
        let todo = Todo::new("Write report");
        assert_eq!(todo.title, "Write report");
        assert_eq!(todo.id, None);
        assert_eq!(todo.priority, Priority::Unset);
        assert_eq!(todo.complexity, Complexity::M);
        assert!(!todo.completed);
        assert!(todo.tags.is_empty());
    }

    #[test]
    fn test_has_tag_and_project() {
        let mut todo = Todo::new("x");
        todo.tags = vec!["work".to_string(), "home".to_string()];
        todo.projects = vec!["p1".to_string()];

        assert!(todo.has_tag("work"));
        assert!(!todo.has_tag("Work"));
        assert!(todo.has_project("p1"));
        assert!(!todo.has_project("p2"));
    }

    #[test]
    fn test_title_contains_ignores_case() {
        let todo = Todo::new("Buy Milk");
        assert!(todo.title_contains("milk"));
        assert!(todo.title_contains("BUY"));
        assert!(todo.title_contains(""));
        assert!(!todo.title_contains("bread"));
    }

    #[test]
    fn test_has_estimation() {
        let mut todo = Todo::new("x");
        assert!(!todo.has_estimation());
        todo.estimated_working_time = "2h".to_string();
        assert!(todo.has_estimation());
    }

    #[test]
    fn test_completed_tasks() {
        let mut todo = Todo::new("x");
        todo.tasks = vec![
            Task {
                description: "one".to_string(),
                completed: true,
            },
            Task {
                description: "two".to_string(),
                completed: false,
            },
        ];
        assert_eq!(todo.completed_tasks(), 1);
    }
}
