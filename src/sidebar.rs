//! Sidebar navigation: fixed common filters plus one entry per tag and per
//! project found in the todos.

use std::collections::{BTreeMap, BTreeSet};

use crate::criteria::Criteria;
use crate::todo::Todo;
use crate::utils::unicode::locale_compare;

pub const COMMON_FILTERS_GROUP: &str = "Common Filters";
pub const TAGS_GROUP: &str = "@Tags";
pub const PROJECTS_GROUP: &str = ":Projects";

/// One sidebar entry: a label with a filter for the not completed todos
/// (absent when that count makes no sense) and one for all todos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildModel {
    pub name: String,
    pub not_completed_criteria: Option<Criteria>,
    pub not_completed_title: String,
    pub all_criteria: Criteria,
    pub all_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupModel {
    pub name: String,
    pub children: Vec<ChildModel>,
    pub expanded: bool,
}

impl GroupModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            expanded: false,
        }
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        not_completed: Option<(Criteria, &str)>,
        all_criteria: Criteria,
        all_title: impl Into<String>,
    ) -> &mut Self {
        let (not_completed_criteria, not_completed_title) = match not_completed {
            Some((criteria, title)) => (Some(criteria), title.to_string()),
            None => (None, String::new()),
        };
        self.children.push(ChildModel {
            name: name.into(),
            not_completed_criteria,
            not_completed_title,
            all_criteria,
            all_title: all_title.into(),
        });
        self
    }
}

/// Unique tag names over all todos, sorted.
pub fn distinct_tags(todos: &[Todo]) -> Vec<String> {
    distinct(todos.iter().flat_map(|todo| todo.tags.iter()))
}

/// Unique project names over all todos, sorted.
pub fn distinct_projects(todos: &[Todo]) -> Vec<String> {
    distinct(todos.iter().flat_map(|todo| todo.projects.iter()))
}

fn distinct<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    let unique: BTreeSet<&String> = names.collect();
    let mut names: Vec<String> = unique.into_iter().cloned().collect();
    names.sort_by(|a, b| locale_compare(a, b));
    names
}

/// Occurrences per tag. A tag listed twice on one todo counts twice.
pub fn tag_counts(todos: &[Todo]) -> BTreeMap<String, usize> {
    count(todos.iter().flat_map(|todo| todo.tags.iter()))
}

/// Occurrences per project.
pub fn project_counts(todos: &[Todo]) -> BTreeMap<String, usize> {
    count(todos.iter().flat_map(|todo| todo.projects.iter()))
}

fn count<'a>(names: impl Iterator<Item = &'a String>) -> BTreeMap<String, usize> {
    let mut statistic = BTreeMap::new();
    for name in names {
        *statistic.entry(name.clone()).or_insert(0) += 1;
    }
    statistic
}

/// Holds the sidebar groups. The tag and project groups are rebuilt from
/// scratch on every [`GroupingIndex::build_sidebar`]; expansion state stays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingIndex {
    groups: Vec<GroupModel>,
}

impl Default for GroupingIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupingIndex {
    pub fn new() -> Self {
        let mut common = GroupModel::new(COMMON_FILTERS_GROUP);
        common
            .add(
                "All",
                Some((Criteria::NotCompleted, "Displaying all not completed todos")),
                Criteria::All,
                "Display all todos",
            )
            .add(
                "Completed",
                None,
                Criteria::Completed,
                "Displaying all completed todos",
            )
            .add(
                "High Priority",
                Some((
                    Criteria::HighPriorityAndNotCompleted,
                    "Displaying all not completed todos with priority A",
                )),
                Criteria::HighPriority,
                "Displaying all todos with priority A",
            )
            .add(
                "Today",
                None,
                Criteria::Today,
                "Displaying all todos of today",
            )
            .add(
                "No Estimation",
                Some((
                    Criteria::has_no_estimation(Some(Criteria::NotCompleted)),
                    "Displaying all not completed todos with no estimation",
                )),
                Criteria::has_no_estimation(None),
                "Displaying all todos with no estimation",
            );

        Self {
            groups: vec![
                common,
                GroupModel::new(TAGS_GROUP),
                GroupModel::new(PROJECTS_GROUP),
            ],
        }
    }

    pub fn groups(&self) -> &[GroupModel] {
        &self.groups
    }

    /// Regenerate the tag and project groups for `todos` and return all groups.
    pub fn build_sidebar(&mut self, todos: &[Todo]) -> &[GroupModel] {
        if let Some(group) = self.group_mut(TAGS_GROUP) {
            group.clear();
            for tag in distinct_tags(todos) {
                group.add(
                    tag.clone(),
                    Some((
                        Criteria::has_tag(tag.clone(), Some(Criteria::NotCompleted)),
                        &format!("All not completed todos tagged with {}", tag),
                    )),
                    Criteria::has_tag(tag.clone(), None),
                    format!("All todos tagged with {}", tag),
                );
            }
        }

        if let Some(group) = self.group_mut(PROJECTS_GROUP) {
            group.clear();
            for project in distinct_projects(todos) {
                group.add(
                    project.clone(),
                    Some((
                        Criteria::has_project(project.clone(), Some(Criteria::NotCompleted)),
                        &format!("All not completed todos assigned to project {}", project),
                    )),
                    Criteria::has_project(project.clone(), None),
                    format!("All todos assigned to project {}", project),
                );
            }
        }

        &self.groups
    }

    /// Flip the expanded flag of a group; returns false for unknown names.
    pub fn toggle_group(&mut self, name: &str) -> bool {
        match self.group_mut(name) {
            Some(group) => {
                group.expanded = !group.expanded;
                true
            }
            None => false,
        }
    }

    fn group_mut(&mut self, name: &str) -> Option<&mut GroupModel> {
        self.groups.iter_mut().find(|group| group.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn todo_with(tags: &[&str], projects: &[&str]) -> Todo {
        Todo {
            title: "t".to_string(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            projects: projects.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_distinct_tags_sorted_and_unique() {
        let todos = vec![
            todo_with(&["work", "Alpha"], &[]),
            todo_with(&["work", "beta"], &[]),
        ];
        assert_eq!(distinct_tags(&todos), vec!["Alpha", "beta", "work"]);
    }

    #[test]
    fn test_distinct_projects() {
        let todos = vec![todo_with(&[], &["p2", "p1"]), todo_with(&[], &["p1"])];
        assert_eq!(distinct_projects(&todos), vec!["p1", "p2"]);
    }

    #[test]
    fn test_tag_counts_count_duplicates() {
        let todos = vec![todo_with(&["a", "a"], &[]), todo_with(&["a"], &[])];
        let counts = tag_counts(&todos);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["a"], 3);
    }

    #[test]
    fn test_project_counts() {
        let todos = vec![todo_with(&[], &["p1"]), todo_with(&[], &["p1", "p2"])];
        let counts = project_counts(&todos);
        assert_eq!(counts["p1"], 2);
        assert_eq!(counts["p2"], 1);
    }

    #[test]
    fn test_common_filters_group() {
        let index = GroupingIndex::new();
        let common = &index.groups()[0];
        let names: Vec<&str> = common.children.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(common.name, COMMON_FILTERS_GROUP);
        assert_eq!(
            names,
            vec!["All", "Completed", "High Priority", "Today", "No Estimation"]
        );
        assert_eq!(common.children[1].not_completed_criteria, None);
        assert_eq!(common.children[1].not_completed_title, "");
        assert_eq!(
            common.children[0].not_completed_criteria,
            Some(Criteria::NotCompleted)
        );
    }

    #[test]
    fn test_build_sidebar_creates_tag_and_project_entries() {
        let todos = vec![todo_with(&["work", "home"], &["garden"])];
        let mut index = GroupingIndex::new();
        let groups = index.build_sidebar(&todos);

        assert_eq!(groups.len(), 3);
        let tags = &groups[1];
        assert_eq!(tags.name, TAGS_GROUP);
        assert_eq!(tags.children.len(), 2);
        assert_eq!(tags.children[0].name, "home");
        assert_eq!(
            tags.children[0].not_completed_criteria,
            Some(Criteria::has_tag("home", Some(Criteria::NotCompleted)))
        );
        assert_eq!(tags.children[0].all_criteria, Criteria::has_tag("home", None));
        assert_eq!(tags.children[0].all_title, "All todos tagged with home");

        let projects = &groups[2];
        assert_eq!(projects.name, PROJECTS_GROUP);
        assert_eq!(projects.children.len(), 1);
        assert_eq!(
            projects.children[0].all_criteria,
            Criteria::has_project("garden", None)
        );
    }

    #[test]
    fn test_build_sidebar_is_idempotent() {
        let todos = vec![
            todo_with(&["b", "a"], &["x"]),
            todo_with(&["a"], &["y", "x"]),
        ];
        let mut index = GroupingIndex::new();
        let first = index.build_sidebar(&todos).to_vec();
        let second = index.build_sidebar(&todos).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_sidebar_drops_vanished_tags() {
        let mut index = GroupingIndex::new();
        index.build_sidebar(&[todo_with(&["old"], &[])]);
        let groups = index.build_sidebar(&[todo_with(&["new"], &[])]);
        let names: Vec<&str> = groups[1].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["new"]);
    }

    #[test]
    fn test_toggle_group_survives_rebuild() {
        let mut index = GroupingIndex::new();
        assert!(index.toggle_group(TAGS_GROUP));
        assert!(!index.toggle_group("unknown"));

        let groups = index.build_sidebar(&[todo_with(&["a"], &[])]);
        assert!(groups[1].expanded);
        assert!(!groups[0].expanded);
    }
}
