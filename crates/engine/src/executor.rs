//! Task execution engine.
//!
//! `TaskExecutor` is the central orchestrator:
//! 1. Validates the dependency graph and plans the run for a target.
//! 2. Executes the planned tasks one at a time, sharing one `TaskContext`.
//! 3. Aborts on the first failure.  Nothing is retried.

use std::time::Instant;

use tracing::{error, info, instrument};

use tasks::TaskContext;

use crate::models::{RunReport, TaskOutcome};
use crate::{dag, EngineError, TaskRegistry};

/// Runs targets from a registry against one project context.
pub struct TaskExecutor {
    registry: TaskRegistry,
    ctx: TaskContext,
}

impl TaskExecutor {
    pub fn new(registry: TaskRegistry, ctx: TaskContext) -> Self {
        Self { registry, ctx }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// The tasks `run(target)` would execute, in order.  Executes nothing.
    pub fn plan(&self, target: &str) -> Result<Vec<String>, EngineError> {
        dag::plan(&self.registry.definitions(), target)
    }

    /// Run `target` after its dependencies.
    ///
    /// # Errors
    /// Returns `EngineError` for graph problems, an unknown target, or the
    /// first task failure.
    #[instrument(skip(self), fields(run_id = %self.ctx.run_id))]
    pub async fn run(&self, target: &str) -> Result<RunReport, EngineError> {
        let order = self.plan(target)?;
        info!("Running {} task(s): {}", order.len(), order.join(" → "));

        let mut completed = Vec::with_capacity(order.len());
        for name in order {
            let task = self
                .registry
                .get(&name)
                .ok_or_else(|| EngineError::UnknownTask(name.clone()))?;

            info!("▶ {name}");
            let started = Instant::now();

            if let Err(source) = task.execute(&self.ctx).await {
                error!("task '{}' failed: {}", name, source);
                return Err(EngineError::TaskFailed { task: name, source });
            }

            let elapsed = started.elapsed();
            info!("✔ {name} ({elapsed:.2?})");
            completed.push(TaskOutcome { name, elapsed });
        }

        Ok(RunReport {
            run_id: self.ctx.run_id,
            completed,
        })
    }
}
