pub mod complexity;
pub mod duration;
pub mod item;
pub mod priority;
pub mod timestamp;

pub use complexity::Complexity;
pub use duration::{DurationError, human_to_seconds, seconds_to_human};
pub use item::{Task, Todo};
pub use priority::Priority;
