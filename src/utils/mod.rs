pub mod markdown;
pub mod paths;
pub mod unicode;
