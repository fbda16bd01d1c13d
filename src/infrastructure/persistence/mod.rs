pub mod memory;
pub mod sqlite;

pub use memory::{InMemoryApplicationRepository, InMemoryUserRepository};
pub use sqlite::{SqliteApplicationRepository, SqliteUserRepository};
