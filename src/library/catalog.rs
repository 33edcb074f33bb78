use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::utils::unicode::locale_compare;

use super::models::{Author, AuthorCount, Book};

/// Columns the book table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSortKey {
    #[default]
    Title,
    Authors,
    Publisher,
    Pages,
    Rating,
    Tags,
}

impl fmt::Display for BookSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookSortKey::Title => "title",
            BookSortKey::Authors => "authors",
            BookSortKey::Publisher => "publisher",
            BookSortKey::Pages => "pages",
            BookSortKey::Rating => "rating",
            BookSortKey::Tags => "tags",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for BookSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(BookSortKey::Title),
            "authors" => Ok(BookSortKey::Authors),
            "publisher" => Ok(BookSortKey::Publisher),
            "pages" => Ok(BookSortKey::Pages),
            "rating" => Ok(BookSortKey::Rating),
            "tags" => Ok(BookSortKey::Tags),
            _ => Err(format!("Invalid book sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorError {
    #[error("**Invalid full name**: must not be empty!")]
    EmptyName,
}

pub fn filter_authors<'a>(authors: &'a [Author], search: &str) -> Vec<&'a Author> {
    let search = search.to_lowercase();
    authors
        .iter()
        .filter(|author| author.full_name.to_lowercase().contains(&search))
        .collect()
}

/// Copy the book counts onto the authors with the same full name.
pub fn merge_author_counts(authors: &mut [Author], counts: &[AuthorCount]) {
    for count in counts {
        if let Some(author) = authors
            .iter_mut()
            .find(|author| author.full_name == count.full_name)
        {
            author.count = Some(count.count);
        }
    }
}

/// A new author needs a non-blank full name.
pub fn validate_new_author(author: &Author) -> Result<(), AuthorError> {
    if author.full_name.trim().is_empty() {
        return Err(AuthorError::EmptyName);
    }
    Ok(())
}

/// True when the book matches the search text in its title, one of its
/// authors, the publisher, the rating or one of its tags.
pub fn filter_book(book: &Book, search: &str) -> bool {
    let search = search.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&search);

    contains(&book.title)
        || book.authors.iter().any(|author| contains(&author.full_name))
        || contains(&book.publisher.full_name)
        || book.rating.as_deref().is_some_and(contains)
        || book.tags.iter().any(|tag| contains(&tag.name))
}

/// Compare two books by the given column.
pub fn compare_books(a: &Book, b: &Book, key: BookSortKey) -> Ordering {
    match key {
        BookSortKey::Title => locale_compare(&a.title, &b.title),
        BookSortKey::Authors => compare_lists(
            a.authors.iter().map(|author| author.full_name.as_str()),
            b.authors.iter().map(|author| author.full_name.as_str()),
            a.authors.len(),
            b.authors.len(),
        ),
        BookSortKey::Publisher => {
            locale_compare(&a.publisher.full_name, &b.publisher.full_name)
        }
        // more pages first
        BookSortKey::Pages => b.pages.cmp(&a.pages),
        BookSortKey::Rating => locale_compare(
            a.rating.as_deref().unwrap_or(""),
            b.rating.as_deref().unwrap_or(""),
        ),
        BookSortKey::Tags => compare_lists(
            a.tags.iter().map(|tag| tag.name.as_str()),
            b.tags.iter().map(|tag| tag.name.as_str()),
            a.tags.len(),
            b.tags.len(),
        ),
    }
}

/// Element wise comparison over the common prefix; on a tie the longer list
/// comes first.
fn compare_lists<'a>(
    a: impl Iterator<Item = &'a str>,
    b: impl Iterator<Item = &'a str>,
    len_a: usize,
    len_b: usize,
) -> Ordering {
    a.zip(b)
        .map(|(left, right)| locale_compare(left, right))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| len_b.cmp(&len_a))
}

/// Filter and sort books the way the book table shows them.
pub fn visible_books<'a>(
    books: &'a [Book],
    search: &str,
    key: BookSortKey,
    descending: bool,
) -> Vec<&'a Book> {
    let mut visible: Vec<&Book> = books.iter().filter(|book| filter_book(book, search)).collect();
    visible.sort_by(|a, b| {
        let ordering = compare_books(a, b, key);
        if descending { ordering.reverse() } else { ordering }
    });
    visible
}
