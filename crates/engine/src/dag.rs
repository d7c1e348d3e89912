//! Dependency-graph validation and execution planning.
//!
//! Rules enforced:
//! 1. Task names must be unique.
//! 2. Every dependency must name a known task.
//! 3. The dependency graph must be acyclic (topological sort must succeed).
//!
//! A plan lists the tasks to run for one target: dependencies first, in the
//! order they are declared, each task at most once, the target last.

use std::collections::{HashMap, HashSet, VecDeque};

use tasks::TaskDefinition;

use crate::EngineError;

/// Validate the dependency graph formed by `definitions`.
///
/// # Errors
/// - [`EngineError::DuplicateTask`] if two tasks share a name.
/// - [`EngineError::UnknownDependency`] if a dependency is missing.
/// - [`EngineError::CycleDetected`] if the graph is not acyclic.
pub fn validate_graph(definitions: &[TaskDefinition]) -> Result<(), EngineError> {
    // -----------------------------------------------------------------------
    // 1. Ensure task names are unique
    // -----------------------------------------------------------------------
    let mut names: HashSet<&str> = HashSet::new();
    for def in definitions {
        if !names.insert(def.name.as_str()) {
            return Err(EngineError::DuplicateTask(def.name.clone()));
        }
    }

    // -----------------------------------------------------------------------
    // 2. Validate dependency references
    // -----------------------------------------------------------------------
    for def in definitions {
        for dep in &def.deps {
            if !names.contains(dep.as_str()) {
                return Err(EngineError::UnknownDependency {
                    task: def.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    // -----------------------------------------------------------------------
    // 3. Topological sort (Kahn's algorithm), edges point dep → dependent
    // -----------------------------------------------------------------------
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for def in definitions {
        in_degree.entry(def.name.as_str()).or_insert(0);
        for dep in &def.deps {
            dependents
                .entry(dep.as_str())
                .or_default()
                .push(def.name.as_str());
            *in_degree.entry(def.name.as_str()).or_insert(0) += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &d)| d == 0)
        .map(|(&name, _)| name)
        .collect();

    let mut visited = 0usize;
    while let Some(name) = queue.pop_front() {
        visited += 1;
        for &dependent in dependents.get(name).into_iter().flatten() {
            let deg = in_degree.entry(dependent).or_insert(0);
            *deg -= 1;
            if *deg == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if visited != definitions.len() {
        let mut tasks: Vec<String> = in_degree
            .into_iter()
            .filter(|&(_, d)| d > 0)
            .map(|(name, _)| name.to_owned())
            .collect();
        tasks.sort();
        return Err(EngineError::CycleDetected { tasks });
    }

    Ok(())
}

/// Return the tasks to execute for `target`, in execution order.
///
/// # Errors
/// Any error from [`validate_graph`], or [`EngineError::UnknownTask`] if
/// `target` is not defined.
pub fn plan(definitions: &[TaskDefinition], target: &str) -> Result<Vec<String>, EngineError> {
    validate_graph(definitions)?;

    let by_name: HashMap<&str, &TaskDefinition> =
        definitions.iter().map(|d| (d.name.as_str(), d)).collect();
    let root = *by_name
        .get(target)
        .ok_or_else(|| EngineError::UnknownTask(target.to_owned()))?;

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    visit(root, &by_name, &mut seen, &mut order);
    Ok(order)
}

/// Depth-first post-order walk; the graph is known to be acyclic here.
fn visit<'a>(
    def: &'a TaskDefinition,
    by_name: &HashMap<&str, &'a TaskDefinition>,
    seen: &mut HashSet<&'a str>,
    order: &mut Vec<String>,
) {
    if !seen.insert(def.name.as_str()) {
        return;
    }
    for dep in &def.deps {
        if let Some(&dep_def) = by_name.get(dep.as_str()) {
            visit(dep_def, by_name, seen, order);
        }
    }
    order.push(def.name.clone());
}
