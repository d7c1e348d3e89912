//! Task-level error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by a task's `execute` method.
///
/// None of these are retried: the engine aborts the run on the first one.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("database error: {0}")]
    Database(#[from] db::DbError),

    /// A file-system operation failed; `context` says which one.
    #[error("{context} '{}': {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {}", describe_exit(.code))]
    CommandFailed { program: String, code: Option<i32> },

    #[error("invalid config '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("{0}")]
    Failed(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
