pub mod api;
pub mod app;
pub mod config;
pub mod criteria;
pub mod library;
pub mod sidebar;
pub mod storage;
pub mod todo;
pub mod utils;
