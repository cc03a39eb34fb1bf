//! Domain models with validation at construction
//!
//! All caller input is validated when creating these types.
//! Invalid input returns ValidationError before any database work.

pub mod validation;
pub mod request;
pub mod table;

pub use validation::ValidationError;
pub use request::{ListFilter, NewRequest, Request, SearchQuery, Status, StatusCounts};
pub use table::TableName;
