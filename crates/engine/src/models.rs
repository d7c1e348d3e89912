//! Results of an engine run.

use std::time::Duration;

use uuid::Uuid;

/// A task that finished successfully.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub name: String,
    pub elapsed: Duration,
}

/// The result of running a target and its dependencies.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Completed tasks in execution order; the target is last.
    pub completed: Vec<TaskOutcome>,
}

impl RunReport {
    pub fn task_names(&self) -> Vec<&str> {
        self.completed.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.completed.iter().map(|t| t.elapsed).sum()
    }
}
