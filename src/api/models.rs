use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::todo::timestamp;
use crate::todo::{Complexity, Priority, Task};

/// Tags and projects travel as `{"name": "..."}` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

impl NamedEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A todo as the backend sends and receives it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTodo {
    pub id: Option<i64>,
    #[serde(default, with = "timestamp::optional")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::optional")]
    pub changed: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tags: Vec<NamedEntry>,
    #[serde(default)]
    pub projects: Vec<NamedEntry>,
    /// Seconds worked so far.
    #[serde(default, deserialize_with = "seconds_or_null")]
    pub working_time: u64,
    /// Estimated seconds.
    #[serde(default, deserialize_with = "seconds_or_null")]
    pub estimated_working_time: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn seconds_or_null<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}
