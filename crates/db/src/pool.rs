//! SQLite connection pool.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, SqlitePool};
use tracing::{debug, info};

use crate::DbError;

/// Type alias for the SQLite pool handed to repository functions.
pub type DbPool = SqlitePool;

/// Open the database file at `path`, creating it if it does not exist.
///
/// Tasks are strictly sequential, so the pool holds a single connection.
/// The parent directory must already exist.
pub async fn open(path: &Path) -> Result<DbPool, DbError> {
    connect(path, true).await
}

/// Open the database file at `path`, failing if it does not exist.
pub async fn open_existing(path: &Path) -> Result<DbPool, DbError> {
    connect(path, false).await
}

async fn connect(path: &Path, create: bool) -> Result<DbPool, DbError> {
    info!("Opening database {}", path.display());
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Open a private in-memory database (for testing).
pub async fn in_memory() -> Result<DbPool, DbError> {
    let options = SqliteConnectOptions::new().in_memory(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Execute a multi-statement SQL script verbatim.
pub async fn execute_script(pool: &DbPool, sql: &str) -> Result<(), DbError> {
    debug!("Executing script ({} bytes)", sql.len());
    pool.execute(sql).await?;
    Ok(())
}
