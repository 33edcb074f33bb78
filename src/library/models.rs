use serde::{Deserialize, Serialize};

use crate::api::models::NamedEntry;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub full_name: String,
    /// Number of books, filled in from the author count endpoint.
    #[serde(default, skip_serializing)]
    pub count: Option<u64>,
}

impl Author {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            count: None,
        }
    }
}

/// One entry of `GET /books/authors/count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCount {
    pub full_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publisher: Publisher,
    #[serde(default)]
    pub year_of_publication: i32,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<NamedEntry>,
    #[serde(default)]
    pub rating: Option<String>,
}
