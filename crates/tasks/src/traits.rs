//! The `ExecutableTask` trait: the contract every task must fulfil.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::{CommandRunner, TaskConfig, TaskError};

/// Static description of a task: its name and what must run before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDefinition {
    /// Unique name, used on the command line and in `deps`.
    pub name: String,
    pub description: String,
    /// Tasks that run before this one, in this order.
    pub deps: Vec<String>,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            deps: Vec::new(),
        }
    }

    pub fn with_deps(mut self, deps: &[&str]) -> Self {
        self.deps = deps.iter().map(|d| d.to_string()).collect();
        self
    }
}

/// Shared context passed to every task of a run.
#[derive(Clone)]
pub struct TaskContext {
    /// Identifies this invocation in logs.
    pub run_id: Uuid,
    /// Project root; every configured path is resolved against it.
    pub root: PathBuf,
    pub config: TaskConfig,
    /// Spawns external commands (install, run, build).
    pub runner: Arc<dyn CommandRunner>,
}

impl TaskContext {
    pub fn new(root: impl Into<PathBuf>, config: TaskConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            root: root.into(),
            config,
            runner,
        }
    }

    /// Resolve a configured path against the project root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// The core task trait.
#[async_trait]
pub trait ExecutableTask: Send + Sync {
    fn definition(&self) -> TaskDefinition;

    /// Run the task body.  Dependencies have already run when this is called.
    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError>;
}
