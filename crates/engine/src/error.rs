//! Engine-level error types.

use thiserror::Error;

/// Errors produced by the task engine (graph validation + execution).
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Graph errors ------

    /// Two or more tasks share the same name.
    #[error("duplicate task name: '{0}'")]
    DuplicateTask(String),

    /// A task depends on a name that isn't registered.
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    /// The dependency graph is not acyclic.
    #[error("task dependencies contain a cycle through: {}", .tasks.join(", "))]
    CycleDetected { tasks: Vec<String> },

    /// The requested task isn't registered.
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    // ------ Execution errors ------

    /// A task failed; the run was aborted.
    #[error("task '{task}' failed")]
    TaskFailed {
        task: String,
        #[source]
        source: tasks::TaskError,
    },
}
