use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::todo::Todo;
use crate::utils::unicode::locale_compare;

/// Orderings for the visible todo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriteria {
    /// Open before completed, then by priority (A first, unset last), then by title.
    #[default]
    Default,
    /// Most recently changed first, ties as `Default`.
    RecentChanges,
    /// Open before completed, then smallest complexity first, then by title.
    Complexity,
}

impl SortCriteria {
    pub fn compare(self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            SortCriteria::Default => default_order(a, b),
            SortCriteria::RecentChanges => b
                .changed
                .cmp(&a.changed)
                .then_with(|| default_order(a, b)),
            SortCriteria::Complexity => a
                .completed
                .cmp(&b.completed)
                .then_with(|| a.complexity.cmp(&b.complexity))
                .then_with(|| locale_compare(&a.title, &b.title)),
        }
    }

    pub fn sort(self, todos: &mut [Todo]) {
        todos.sort_by(|a, b| self.compare(a, b));
    }
}

fn default_order(a: &Todo, b: &Todo) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.priority.cmp(&b.priority))
        .then_with(|| locale_compare(&a.title, &b.title))
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortCriteria::Default => write!(f, "default"),
            SortCriteria::RecentChanges => write!(f, "recent-changes"),
            SortCriteria::Complexity => write!(f, "complexity"),
        }
    }
}

impl FromStr for SortCriteria {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(SortCriteria::Default),
            "recent-changes" => Ok(SortCriteria::RecentChanges),
            "complexity" => Ok(SortCriteria::Complexity),
            _ => Err(format!("Invalid sorting: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::{Complexity, Priority};
    use chrono::{TimeZone, Utc};

    fn todo(title: &str, priority: Priority, completed: bool) -> Todo {
        Todo {
            title: title.to_string(),
            priority,
            completed,
            ..Default::default()
        }
    }

    fn titles(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|todo| todo.title.as_str()).collect()
    }

    #[test]
    fn test_default_order() {
        let mut todos = vec![
            todo("B", Priority::B, false),
            todo("A", Priority::A, false),
            todo("Z", Priority::A, true),
        ];
        SortCriteria::Default.sort(&mut todos);
        assert_eq!(titles(&todos), vec!["A", "B", "Z"]);
    }

    #[test]
    fn test_default_order_unset_priority_last() {
        let mut todos = vec![
            todo("unset", Priority::Unset, false),
            todo("low", Priority::F, false),
            todo("high", Priority::A, false),
        ];
        SortCriteria::Default.sort(&mut todos);
        assert_eq!(titles(&todos), vec!["high", "low", "unset"]);
    }

    #[test]
    fn test_default_order_falls_back_to_title() {
        let mut todos = vec![
            todo("cherry", Priority::B, false),
            todo("Apple", Priority::B, false),
            todo("banana", Priority::B, false),
        ];
        SortCriteria::Default.sort(&mut todos);
        assert_eq!(titles(&todos), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_recent_changes_first() {
        let mut old = todo("old", Priority::A, false);
        old.changed = Some(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
        let mut new = todo("new", Priority::C, false);
        new.changed = Some(Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap());
        let mut tie = todo("tie", Priority::B, false);
        tie.changed = new.changed;

        let mut todos = vec![old, new, tie];
        SortCriteria::RecentChanges.sort(&mut todos);
        assert_eq!(titles(&todos), vec!["tie", "new", "old"]);
    }

    #[test]
    fn test_complexity_order() {
        let mut large = todo("large", Priority::A, false);
        large.complexity = Complexity::L;
        let mut small = todo("small", Priority::C, false);
        small.complexity = Complexity::XS;
        let mut done = todo("done", Priority::A, true);
        done.complexity = Complexity::XS;

        let mut todos = vec![done, large, small];
        SortCriteria::Complexity.sort(&mut todos);
        assert_eq!(titles(&todos), vec!["small", "large", "done"]);
    }

    #[test]
    fn test_names_round_trip() {
        for criteria in [
            SortCriteria::Default,
            SortCriteria::RecentChanges,
            SortCriteria::Complexity,
        ] {
            assert_eq!(criteria.to_string().parse::<SortCriteria>().unwrap(), criteria);
        }
        assert!("newest".parse::<SortCriteria>().is_err());
    }
}
