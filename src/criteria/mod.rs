pub mod filter;
pub mod sorting;

pub use filter::{Criteria, FilterContext};
pub use sorting::SortCriteria;
