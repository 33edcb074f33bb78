use anyhow::{Context, Result};
use tracing::info;

use super::catalog::{self, BookSortKey};
use super::models::{Author, Book};
use crate::api::LibraryBackend;
use crate::storage::local_state::{AUTHOR_SEARCH_KEY, BOOK_SEARCH_KEY, KeyValueStore};

/// Authors and books fetched from the service plus the persisted search texts.
pub struct LibraryView<S: KeyValueStore> {
    authors: Vec<Author>,
    books: Vec<Book>,
    author_search: String,
    book_search: String,
    store: S,
}

impl<S: KeyValueStore> LibraryView<S> {
    pub fn load(store: S) -> Self {
        Self {
            authors: Vec::new(),
            books: Vec::new(),
            author_search: store.get(AUTHOR_SEARCH_KEY).unwrap_or_default(),
            book_search: store.get(BOOK_SEARCH_KEY).unwrap_or_default(),
            store,
        }
    }

    pub fn author_search(&self) -> &str {
        &self.author_search
    }

    pub fn book_search(&self) -> &str {
        &self.book_search
    }

    pub fn set_author_search(&mut self, search: impl Into<String>) -> Result<()> {
        self.author_search = search.into();
        self.store.set(AUTHOR_SEARCH_KEY, &self.author_search)
    }

    pub fn set_book_search(&mut self, search: impl Into<String>) -> Result<()> {
        self.book_search = search.into();
        self.store.set(BOOK_SEARCH_KEY, &self.book_search)
    }

    /// Fetch the authors together with their book counts.
    pub fn read_authors(&mut self, backend: &impl LibraryBackend) -> Result<()> {
        let mut authors = backend.list_authors().context("Failed to read authors")?;
        let counts = backend
            .author_counts()
            .context("Failed to read author counts")?;
        catalog::merge_author_counts(&mut authors, &counts);
        info!("read {} authors", authors.len());
        self.authors = authors;
        Ok(())
    }

    pub fn read_books(&mut self, backend: &impl LibraryBackend) -> Result<()> {
        self.books = backend.list_books().context("Failed to read books")?;
        info!("read {} books", self.books.len());
        Ok(())
    }

    /// Create an author and reload the list.
    pub fn add_author(&mut self, backend: &impl LibraryBackend, author: &Author) -> Result<()> {
        catalog::validate_new_author(author)?;
        backend
            .create_author(author)
            .with_context(|| format!("Failed to create author \"{}\"", author.full_name))?;
        self.read_authors(backend)
    }

    pub fn visible_authors(&self) -> Vec<&Author> {
        catalog::filter_authors(&self.authors, &self.author_search)
    }

    pub fn visible_books(&self, key: BookSortKey, descending: bool) -> Vec<&Book> {
        catalog::visible_books(&self.books, &self.book_search, key, descending)
    }
}
