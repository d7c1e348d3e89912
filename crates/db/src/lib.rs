//! `db` crate: pure persistence layer.
//!
//! Opens SQLite databases, runs the ordered migration loop, and provides
//! repository functions for the `words` table.  No task logic lives here.

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repository;

pub use error::DbError;
pub use migrations::{Migration, MigrationManager};
pub use pool::DbPool;
