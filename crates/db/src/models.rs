//! Row structs that map 1-to-1 onto database tables.
//!
//! Both tables are defined by SQL files on disk (`words`) or by the
//! migration manager (`schema_migrations`); these structs only read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// words
// ---------------------------------------------------------------------------

/// A persisted vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WordRow {
    pub id: i64,
    /// Source-language text.
    pub japanese: String,
    /// Transliteration of `japanese`.
    pub romaji: String,
    /// Translation.
    pub english: String,
}

/// A word that has not been inserted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewWord<'a> {
    pub japanese: &'a str,
    pub romaji: &'a str,
    pub english: &'a str,
}

// ---------------------------------------------------------------------------
// schema_migrations
// ---------------------------------------------------------------------------

/// A migration that has been recorded as applied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MigrationRow {
    /// File stem of the migration script, e.g. `001_initial_schema`.
    pub version: String,
    pub applied_at: DateTime<Utc>,
}
