//! Database tasks: migrate, seed, reset, and build the test database.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use db::models::NewWord;
use db::repository::words;
use db::{pool, MigrationManager};
use tracing::{info, warn};

use super::{INIT_DB, RESET, RESET_AND_SEED, SEED, TEST_DB};
use crate::{ExecutableTask, TaskContext, TaskDefinition, TaskError};

/// Sample rows inserted by `seed`.
pub const SEED_WORDS: [NewWord<'static>; 3] = [
    NewWord { japanese: "こんにちは", romaji: "konnichiwa", english: "hello" },
    NewWord { japanese: "さようなら", romaji: "sayounara", english: "goodbye" },
    NewWord { japanese: "ありがとう", romaji: "arigatou", english: "thank you" },
];

/// Suffixes of the files SQLite may keep next to a database.
const SIDE_FILE_SUFFIXES: [&str; 2] = ["-wal", "-shm"];

// ---------------------------------------------------------------------------
// init-db
// ---------------------------------------------------------------------------

/// Creates the database if needed and applies pending migrations.
pub struct InitDb;

#[async_trait]
impl ExecutableTask for InitDb {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(INIT_DB, "Create the database and apply pending migrations")
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!("Initializing database...");
        let migrations = MigrationManager::load(&ctx.resolve(&ctx.config.migrations_dir))?;
        let pool = pool::open(&ctx.resolve(&ctx.config.database)).await?;

        let result = async {
            let manager = MigrationManager::new(&pool);
            manager.initialize().await?;
            manager.apply(&migrations).await
        }
        .await;
        pool.close().await;

        let applied = result?;
        if applied.is_empty() {
            info!("Database is up to date");
        } else {
            info!("Applied {} migration(s): {}", applied.len(), applied.join(", "));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// seed
// ---------------------------------------------------------------------------

/// Inserts the sample words into an existing, initialized database.
pub struct Seed;

#[async_trait]
impl ExecutableTask for Seed {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(SEED, "Insert sample words into the database")
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!("Seeding database...");
        let pool = pool::open_existing(&ctx.resolve(&ctx.config.database)).await?;
        let result = words::insert_words(&pool, &SEED_WORDS).await;
        pool.close().await;

        info!("Inserted {} word(s)", result?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// reset
// ---------------------------------------------------------------------------

/// Deletes the database file.
pub struct Reset;

#[async_trait]
impl ExecutableTask for Reset {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(RESET, "Delete the database file")
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!("Resetting database...");
        let removed = remove_database(&ctx.resolve(&ctx.config.database)).await?;
        if removed {
            info!("Database removed");
        } else {
            info!("No database to remove");
        }
        Ok(())
    }
}

/// Runs `reset`, `init-db` and `seed`; has no body of its own.
pub struct ResetAndSeed;

#[async_trait]
impl ExecutableTask for ResetAndSeed {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(RESET_AND_SEED, "Recreate the database and seed it")
            .with_deps(&[RESET, INIT_DB, SEED])
    }

    async fn execute(&self, _ctx: &TaskContext) -> Result<(), TaskError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// test-db
// ---------------------------------------------------------------------------

/// Rebuilds the test database from the schema and fixture files.
pub struct TestDb;

#[async_trait]
impl ExecutableTask for TestDb {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(TEST_DB, "Rebuild the test database from schema and fixtures")
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!("Initializing test database...");
        let path = ctx.resolve(&ctx.config.test_database);
        if let Err(e) = remove_database(&path).await {
            warn!("Could not remove old test database: {e}");
        }

        let pool = pool::open(&path).await?;
        let result = async {
            let schema = read_sql("failed to read schema", ctx.resolve(&ctx.config.test_schema)).await?;
            pool::execute_script(&pool, &schema).await?;

            let fixtures =
                read_sql("failed to read test data", ctx.resolve(&ctx.config.test_fixtures)).await?;
            pool::execute_script(&pool, &fixtures).await?;
            Ok::<_, TaskError>(())
        }
        .await;
        pool.close().await;

        result?;
        info!("Test database ready at {}", path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Delete a database file and its SQLite side files.
///
/// Returns whether the main file existed.  Missing files are not an error.
async fn remove_database(path: &Path) -> Result<bool, TaskError> {
    let existed = remove_if_exists(path.to_path_buf()).await?;
    for suffix in SIDE_FILE_SUFFIXES {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        remove_if_exists(PathBuf::from(side)).await?;
    }
    Ok(existed)
}

async fn remove_if_exists(path: PathBuf) -> Result<bool, TaskError> {
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(TaskError::Io {
            context: "failed to remove database",
            path,
            source,
        }),
    }
}

async fn read_sql(context: &'static str, path: PathBuf) -> Result<String, TaskError> {
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| TaskError::Io { context, path, source })
}
