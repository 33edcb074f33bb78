pub mod client;
pub mod mapper;
pub mod models;

pub use client::{HttpBackend, LibraryBackend, TodoBackend};
pub use mapper::{to_backend, to_backend_over, to_frontend};
pub use models::{NamedEntry, WireTodo};
