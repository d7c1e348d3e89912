//! Ordered schema migrations.
//!
//! A migration is a `*.sql` file in the migrations directory.  Files are
//! applied in file-name order, each at most once; applied versions are
//! recorded in the `schema_migrations` table.
//!
//! Every migration already runs inside a transaction of its own, so a file
//! must not contain `BEGIN` or `COMMIT` statements.  Such files are rejected
//! before anything is executed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sqlx::Executor;
use tracing::{debug, info};

use crate::models::MigrationRow;
use crate::{DbError, DbPool};

/// A migration script loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// File stem, used as the recorded version.
    pub version: String,
    pub path: PathBuf,
    pub sql: String,
}

/// Applies migrations against a single database.
pub struct MigrationManager<'a> {
    pool: &'a DbPool,
}

impl<'a> MigrationManager<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create the `schema_migrations` tracking table if it does not exist.
    pub async fn initialize(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version    TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Read every `*.sql` file directly inside `dir`, ordered by file name.
    ///
    /// Sub-directories and files with any other extension are ignored.
    pub fn load(dir: &Path) -> Result<Vec<Migration>, DbError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|source| io_error(dir, source))? {
            let entry = entry.map_err(|source| io_error(dir, source))?;
            let path = entry.path();
            let is_sql = path.extension().is_some_and(|ext| ext == "sql");
            if is_sql && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut migrations = Vec::with_capacity(paths.len());
        for path in paths {
            let sql = std::fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
            let version = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("Loaded migration {version}");
            migrations.push(Migration { version, path, sql });
        }

        Ok(migrations)
    }

    /// Apply every migration that has not been recorded yet, in order.
    ///
    /// Each migration runs in its own transaction together with the insert
    /// into `schema_migrations`.  The first failure rolls that migration back
    /// and stops the loop.  Returns the versions applied by this call.
    pub async fn apply(&self, migrations: &[Migration]) -> Result<Vec<String>, DbError> {
        let already: HashSet<String> = self
            .applied()
            .await?
            .into_iter()
            .map(|row| row.version)
            .collect();

        let mut applied = Vec::new();
        for migration in migrations {
            if already.contains(&migration.version) {
                debug!("Skipping migration {} (already applied)", migration.version);
                continue;
            }
            if controls_transaction(&migration.sql) {
                return Err(DbError::NestedTransaction {
                    version: migration.version.clone(),
                });
            }

            info!("Applying migration {}", migration.version);
            let mut tx = self.pool.begin().await?;

            Executor::execute(&mut *tx, migration.sql.as_str())
                .await
                .map_err(|source| DbError::Migration {
                    version: migration.version.clone(),
                    source,
                })?;

            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
                .bind(&migration.version)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            applied.push(migration.version.clone());
        }

        Ok(applied)
    }

    /// All recorded migrations, ordered by version.
    pub async fn applied(&self) -> Result<Vec<MigrationRow>, DbError> {
        let rows = sqlx::query_as::<_, MigrationRow>(
            "SELECT version, applied_at FROM schema_migrations ORDER BY version",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> DbError {
    DbError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Whether any statement in `sql` is a `BEGIN` or `COMMIT`.
///
/// Only the first keyword of each statement counts, so the `BEGIN ... END`
/// body of a `CREATE TRIGGER` is not mistaken for a transaction.
fn controls_transaction(sql: &str) -> bool {
    sql.split(';').any(|statement| {
        let keyword = statement
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("--"))
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or_default();
        keyword.eq_ignore_ascii_case("BEGIN") || keyword.eq_ignore_ascii_case("COMMIT")
    })
}
