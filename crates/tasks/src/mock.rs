//! Test doubles for `ExecutableTask` and `CommandRunner`.
//!
//! Useful in unit and integration tests where spawning real processes or
//! running the real built-in tasks is either unavailable or irrelevant.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    CommandRunner, CommandSpec, ExecutableTask, TaskConfig, TaskContext, TaskDefinition, TaskError,
};

/// Shared, ordered record of task names, appended to by every `MockTask`
/// that holds a clone of it.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Behaviour injected into `MockTask` at construction time.
pub enum MockBehaviour {
    Succeed,
    Fail(String),
}

/// A mock task that counts its executions and succeeds or fails on demand.
pub struct MockTask {
    pub definition: TaskDefinition,
    pub behaviour: MockBehaviour,
    calls: Mutex<usize>,
    journal: Option<Journal>,
}

impl MockTask {
    /// Create a mock that always succeeds.
    pub fn succeeding(name: &str, deps: &[&str]) -> Self {
        Self::with_behaviour(name, deps, MockBehaviour::Succeed)
    }

    /// Create a mock that always fails with `msg`.
    pub fn failing(name: &str, deps: &[&str], msg: impl Into<String>) -> Self {
        Self::with_behaviour(name, deps, MockBehaviour::Fail(msg.into()))
    }

    fn with_behaviour(name: &str, deps: &[&str], behaviour: MockBehaviour) -> Self {
        Self {
            definition: TaskDefinition::new(name, format!("mock task {name}")).with_deps(deps),
            behaviour,
            calls: Mutex::new(0),
            journal: None,
        }
    }

    /// Append this task's name to `journal` every time it executes.
    pub fn recording(mut self, journal: &Journal) -> Self {
        self.journal = Some(Arc::clone(journal));
        self
    }

    /// Number of times this task has been executed.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ExecutableTask for MockTask {
    fn definition(&self) -> TaskDefinition {
        self.definition.clone()
    }

    async fn execute(&self, _ctx: &TaskContext) -> Result<(), TaskError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push(self.definition.name.clone());
        }

        match &self.behaviour {
            MockBehaviour::Succeed => Ok(()),
            MockBehaviour::Fail(msg) => Err(TaskError::Failed(msg.clone())),
        }
    }
}

/// A command runner that records every command instead of spawning it.
#[derive(Default)]
pub struct MockRunner {
    /// Commands seen by this runner, in call order, with their `cwd`.
    pub calls: Mutex<Vec<(CommandSpec, PathBuf)>>,
    /// Programs that "exit" with status 1.
    failing: Vec<String>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `program` fail.
    pub fn failing_on(program: impl Into<String>) -> Self {
        Self {
            failing: vec![program.into()],
            ..Self::default()
        }
    }

    /// Rendered command lines, in call order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.to_string())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<(), TaskError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.clone(), cwd.to_path_buf()));

        if self.failing.contains(&command.program) {
            return Err(TaskError::CommandFailed {
                program: command.program.clone(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

/// A context rooted at `root` with default config and the given mock runner.
pub fn mock_context(root: &Path, runner: Arc<MockRunner>) -> TaskContext {
    TaskContext::new(root, TaskConfig::default(), runner)
}
