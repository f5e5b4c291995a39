//! Dependency-graph validation for a stage table.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use super::stage::{StageName, StageSpec};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("stage table is empty")]
    Empty,

    #[error("stage '{0}' is declared more than once")]
    DuplicateStage(StageName),

    #[error("stage '{stage}' depends on undeclared stage '{dependency}'")]
    UnknownDependency {
        stage: StageName,
        dependency: StageName,
    },

    #[error("dependency cycle among stages: {}", join_names(.0))]
    Cycle(Vec<StageName>),
}

fn join_names(stages: &[StageName]) -> String {
    stages
        .iter()
        .map(StageName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the indices of `stages` in execution order.
///
/// Kahn's algorithm; among ready stages the earliest declared runs first, so a
/// table already in topological order executes as written.
pub fn execution_order(stages: &[StageSpec]) -> Result<Vec<usize>, GraphError> {
    if stages.is_empty() {
        return Err(GraphError::Empty);
    }

    let mut index_of = HashMap::with_capacity(stages.len());
    for (i, stage) in stages.iter().enumerate() {
        if index_of.insert(stage.name, i).is_some() {
            return Err(GraphError::DuplicateStage(stage.name));
        }
    }

    let mut in_degree = vec![0usize; stages.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); stages.len()];
    for (i, stage) in stages.iter().enumerate() {
        for dep in &stage.dependencies {
            let &d = index_of
                .get(dep)
                .ok_or(GraphError::UnknownDependency {
                    stage: stage.name,
                    dependency: *dep,
                })?;
            in_degree[i] += 1;
            dependents[d].push(i);
        }
    }

    let mut ready: BTreeSet<usize> = (0..stages.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(stages.len());

    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &dependent in &dependents[next] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < stages.len() {
        let stuck = (0..stages.len())
            .filter(|i| in_degree[*i] > 0)
            .map(|i| stages[i].name)
            .collect();
        return Err(GraphError::Cycle(stuck));
    }

    Ok(order)
}
