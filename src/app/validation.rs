use std::collections::BTreeMap;
use thiserror::Error;

use crate::todo::{Todo, duration};

pub const TITLE_FIELD: &str = "title";
pub const WORKING_TIME_FIELD: &str = "workingTime";
pub const ESTIMATED_WORKING_TIME_FIELD: &str = "estimatedWorkingTime";

const FORMAT_HINTS: &str = concat!(
    " * Expected format is like _2d3h4m5s_.\n",
    " * Every part is optional but the order has to be kept.\n",
    " * Each number has to be in range (a minute is between 0 and 59).\n",
);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid todo fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<String>,
}

/// Markdown error messages per todo field, updated whenever a field changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    messages: BTreeMap<&'static str, String>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_title(&mut self, value: &str) {
        if value.trim().is_empty() {
            self.messages
                .insert(TITLE_FIELD, "**Invalid title**: must not be empty!".to_string());
        } else {
            self.messages.remove(TITLE_FIELD);
        }
    }

    pub fn validate_working_time(&mut self, value: &str) {
        self.validate_duration(
            WORKING_TIME_FIELD,
            value,
            "**Invalid working time:**",
            "no working time",
        );
    }

    pub fn validate_estimated_working_time(&mut self, value: &str) {
        self.validate_duration(
            ESTIMATED_WORKING_TIME_FIELD,
            value,
            "**Invalid estimation:**",
            "no estimation",
        );
    }

    fn validate_duration(&mut self, field: &'static str, value: &str, heading: &str, empty: &str) {
        if duration::is_valid_human_duration(value) {
            self.messages.remove(field);
        } else {
            let message = format!(
                "{}\n\n{} * Leaving the field empty means {}",
                heading, FORMAT_HINTS, empty
            );
            self.messages.insert(field, message);
        }
    }

    /// Validate every field of `todo`; fails listing the invalid fields.
    pub fn validate_todo(&mut self, todo: &Todo) -> Result<(), ValidationError> {
        self.validate_changes(todo, None)
    }

    /// Validate an edited copy of `last`. Durations left as the service
    /// delivered them are accepted even beyond the input grammar.
    pub fn validate_changes(
        &mut self,
        todo: &Todo,
        last: Option<&Todo>,
    ) -> Result<(), ValidationError> {
        self.validate_title(&todo.title);

        if last.is_some_and(|last| last.working_time == todo.working_time) {
            self.messages.remove(WORKING_TIME_FIELD);
        } else {
            self.validate_working_time(&todo.working_time);
        }
        if last.is_some_and(|last| last.estimated_working_time == todo.estimated_working_time) {
            self.messages.remove(ESTIMATED_WORKING_TIME_FIELD);
        } else {
            self.validate_estimated_working_time(&todo.estimated_working_time);
        }

        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError {
                fields: self.messages.keys().map(|field| field.to_string()).collect(),
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    pub fn messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
