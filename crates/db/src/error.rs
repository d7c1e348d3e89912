//! Typed error type for the db crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("failed to open database '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("migration '{version}' failed: {source}")]
    Migration {
        version: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration '{version}' contains BEGIN or COMMIT; every migration already runs in its own transaction")]
    NestedTransaction { version: String },
}
