//! Filter criteria selecting the visible todos.
//!
//! A criteria is a plain value; composed criteria are built with
//! [`Criteria::and`] and the `has_*` constructors, so they can be stored,
//! compared and passed around without capturing any view state.

use chrono::{Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::todo::Todo;

/// What a criteria is evaluated against besides the todo itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterContext {
    pub search: String,
    pub today: NaiveDate,
}

impl FilterContext {
    pub fn new(search: impl Into<String>) -> Self {
        Self::with_today(search, Local::now().date_naive())
    }

    pub fn with_today(search: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            search: search.into(),
            today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    All,
    Completed,
    NotCompleted,
    HighPriority,
    HighPriorityAndNotCompleted,
    /// Last change happened today (local calendar date).
    Today,
    Yesterday,
    HasTag(String),
    HasProject(String),
    HasNoEstimation,
    And(Box<Criteria>, Box<Criteria>),
}

impl Criteria {
    pub fn and(self, other: Criteria) -> Criteria {
        Criteria::And(Box::new(self), Box::new(other))
    }

    /// Todos tagged with `name`, optionally restricted further by `inner`.
    pub fn has_tag(name: impl Into<String>, inner: Option<Criteria>) -> Criteria {
        Self::restricted(Criteria::HasTag(name.into()), inner)
    }

    /// Todos assigned to project `name`, optionally restricted further by `inner`.
    pub fn has_project(name: impl Into<String>, inner: Option<Criteria>) -> Criteria {
        Self::restricted(Criteria::HasProject(name.into()), inner)
    }

    pub fn has_no_estimation(inner: Option<Criteria>) -> Criteria {
        Self::restricted(Criteria::HasNoEstimation, inner)
    }

    fn restricted(base: Criteria, inner: Option<Criteria>) -> Criteria {
        match inner {
            Some(inner) => base.and(inner),
            None => base,
        }
    }

    /// Evaluate the criteria. With `recognize_search_text` the plain state
    /// criteria also require the title to contain the search text; tag,
    /// project and estimation checks never look at it themselves.
    pub fn matches(&self, todo: &Todo, ctx: &FilterContext, recognize_search_text: bool) -> bool {
        let search_matches = || !recognize_search_text || todo.title_contains(&ctx.search);

        match self {
            Criteria::All => search_matches(),
            Criteria::Completed => todo.completed && search_matches(),
            Criteria::NotCompleted => !todo.completed && search_matches(),
            Criteria::HighPriority => todo.priority.is_high() && search_matches(),
            Criteria::HighPriorityAndNotCompleted => {
                todo.priority.is_high() && !todo.completed && search_matches()
            }
            Criteria::Today => changed_on(todo, Some(ctx.today)) && search_matches(),
            Criteria::Yesterday => changed_on(todo, ctx.today.pred_opt()) && search_matches(),
            Criteria::HasTag(name) => todo.has_tag(name),
            Criteria::HasProject(name) => todo.has_project(name),
            Criteria::HasNoEstimation => !todo.has_estimation(),
            Criteria::And(left, right) => {
                left.matches(todo, ctx, recognize_search_text)
                    && right.matches(todo, ctx, recognize_search_text)
            }
        }
    }
}

fn changed_on(todo: &Todo, date: Option<NaiveDate>) -> bool {
    match (todo.changed, date) {
        (Some(changed), Some(date)) => changed.with_timezone(&Local).date_naive() == date,
        _ => false,
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criteria::All => write!(f, "all"),
            Criteria::Completed => write!(f, "completed"),
            Criteria::NotCompleted => write!(f, "not-completed"),
            Criteria::HighPriority => write!(f, "high-priority"),
            Criteria::HighPriorityAndNotCompleted => write!(f, "high-priority-open"),
            Criteria::Today => write!(f, "today"),
            Criteria::Yesterday => write!(f, "yesterday"),
            Criteria::HasTag(name) => write!(f, "tag:{}", name),
            Criteria::HasProject(name) => write!(f, "project:{}", name),
            Criteria::HasNoEstimation => write!(f, "no-estimation"),
            Criteria::And(left, right) => write!(f, "{}+{}", left, right),
        }
    }
}

impl FromStr for Criteria {
    type Err = String;

    /// Parses the names produced by `Display`, e.g. `tag:work+not-completed`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('+').map(parse_single);
        let first = parts
            .next()
            .ok_or_else(|| format!("Invalid filter: {}", s))??;
        parts.try_fold(first, |combined, next| -> Result<Criteria, String> {
            Ok(combined.and(next?))
        })
    }
}

fn parse_single(s: &str) -> Result<Criteria, String> {
    let s = s.trim();
    if let Some(name) = s.strip_prefix("tag:") {
        return Ok(Criteria::HasTag(name.to_string()));
    }
    if let Some(name) = s.strip_prefix("project:") {
        return Ok(Criteria::HasProject(name.to_string()));
    }

    match s.to_lowercase().as_str() {
        "all" => Ok(Criteria::All),
        "completed" => Ok(Criteria::Completed),
        "not-completed" | "open" => Ok(Criteria::NotCompleted),
        "high-priority" => Ok(Criteria::HighPriority),
        "high-priority-open" => Ok(Criteria::HighPriorityAndNotCompleted),
        "today" => Ok(Criteria::Today),
        "yesterday" => Ok(Criteria::Yesterday),
        "no-estimation" => Ok(Criteria::HasNoEstimation),
        _ => Err(format!("Invalid filter: {}", s)),
    }
}
