//! Student directory: the system of record behind the cache.

mod error;
mod memory;
pub mod student;
mod traits;

pub use error::DirectoryError;
pub use memory::InMemoryDirectory;
pub use student::{Page, Student};
pub use traits::StudentDirectory;
