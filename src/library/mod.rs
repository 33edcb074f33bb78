pub mod catalog;
pub mod models;
pub mod view;

pub use catalog::{AuthorError, BookSortKey};
pub use models::{Author, AuthorCount, Book, Publisher};
pub use view::LibraryView;
