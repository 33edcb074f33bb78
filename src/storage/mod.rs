pub mod local_state;

pub use local_state::{JsonFileStore, KeyValueStore, MemoryStore};
