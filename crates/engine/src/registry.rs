//! Name → task lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tasks::{ExecutableTask, TaskDefinition};

use crate::EngineError;

/// Maps task names to boxed `ExecutableTask` implementations.
#[derive(Default, Clone)]
pub struct TaskRegistry {
    tasks: HashMap<String, Arc<dyn ExecutableTask>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in task.
    pub fn with_builtins() -> Result<Self, EngineError> {
        let mut registry = Self::new();
        for task in tasks::builtin::all() {
            registry.register(task)?;
        }
        Ok(registry)
    }

    /// Register `task` under its definition's name.
    ///
    /// # Errors
    /// [`EngineError::DuplicateTask`] if the name is already taken.
    pub fn register(&mut self, task: Arc<dyn ExecutableTask>) -> Result<(), EngineError> {
        let name = task.definition().name;
        if self.tasks.contains_key(&name) {
            return Err(EngineError::DuplicateTask(name));
        }
        self.tasks.insert(name, task);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ExecutableTask>> {
        self.tasks.get(name)
    }

    /// Definitions of every registered task, sorted by name.
    pub fn definitions(&self) -> Vec<TaskDefinition> {
        let mut definitions: Vec<_> = self.tasks.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}
