pub mod state;
pub mod validation;
pub mod working;

pub use state::{RequestTicket, TodoListController};
pub use validation::{Validation, ValidationError};
pub use working::{WorkingSession, WorkingTicker};
