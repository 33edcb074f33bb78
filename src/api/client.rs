use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::library::models::{Author, AuthorCount, Book};

use super::models::WireTodo;

/// The todo endpoints of the REST service.
pub trait TodoBackend {
    /// `GET /todos`
    fn list_todos(&self) -> Result<Vec<WireTodo>>;

    /// `POST /todos`; creates when the todo has no id, updates otherwise.
    fn save_todo(&self, todo: &WireTodo) -> Result<WireTodo>;

    /// `DELETE /todos/{id}`
    fn delete_todo(&self, id: i64) -> Result<()>;
}

/// The library catalog endpoints of the REST service.
pub trait LibraryBackend {
    fn list_books(&self) -> Result<Vec<Book>>;
    fn list_authors(&self) -> Result<Vec<Author>>;
    fn author_counts(&self) -> Result<Vec<AuthorCount>>;
    fn create_author(&self, author: &Author) -> Result<()>;
}

/// Blocking HTTP implementation of both backends.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("todo-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The service renders HTML for the same paths, so always ask for JSON.
    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("Request failed: {}", what))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            bail!("{} failed with status {}: {}", what, status, body.trim());
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let what = format!("GET {}", path);
        debug!("{}", what);
        let response = self.send(self.client.get(self.url(path)), &what)?;
        response
            .json()
            .with_context(|| format!("Invalid response body for {}", what))
    }
}

impl TodoBackend for HttpBackend {
    fn list_todos(&self) -> Result<Vec<WireTodo>> {
        self.get_json("/todos")
    }

    fn save_todo(&self, todo: &WireTodo) -> Result<WireTodo> {
        info!("saving todo \"{}\"", todo.title);
        let response = self.send(
            self.client.post(self.url("/todos")).json(todo),
            "POST /todos",
        )?;
        response
            .json()
            .context("Invalid response body for POST /todos")
    }

    fn delete_todo(&self, id: i64) -> Result<()> {
        let path = format!("/todos/{}", id);
        info!("deleting todo {}", id);
        self.send(
            self.client.delete(self.url(&path)),
            &format!("DELETE {}", path),
        )?;
        Ok(())
    }
}

impl LibraryBackend for HttpBackend {
    fn list_books(&self) -> Result<Vec<Book>> {
        self.get_json("/books")
    }

    fn list_authors(&self) -> Result<Vec<Author>> {
        self.get_json("/books/authors")
    }

    fn author_counts(&self) -> Result<Vec<AuthorCount>> {
        self.get_json("/books/authors/count")
    }

    fn create_author(&self, author: &Author) -> Result<()> {
        info!("creating author \"{}\"", author.full_name);
        self.send(
            self.client.post(self.url("/books/authors")).json(author),
            "POST /books/authors",
        )?;
        Ok(())
    }
}
