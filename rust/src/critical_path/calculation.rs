//! Critical path orchestration: cycle gate, timing passes, leveling, paths.

use rustc_hash::FxHashMap;

use crate::config::SchedulerConfig;
use crate::cycles::find_cycle;
use crate::graph::{GraphNode, NodeId, TaskGraph};
use crate::log_changes;

use super::solver::CriticalPathSolver;
use super::types::{CriticalPathError, CriticalPathResult};

/// Compute the critical paths of a task graph.
///
/// Steps:
/// 1. Reject cyclic dependency relations
/// 2. Forward pass
/// 3. Resource leveling, each round followed by another forward pass
///    (`config.leveling_rounds` rounds at most, stopping early once a round
///    injects nothing)
/// 4. Backward pass
/// 5. Zero-slack path collection
///
/// `durations` overrides node weights where present. Edges injected by
/// leveling are appended to the nodes' additional dependencies, so the caller
/// sees the serialization that was applied.
///
/// # Returns
/// * `Ok(CriticalPathResult)` with paths, timings and injected edges
/// * `Err(CriticalPathError::CycleDetected)` if the dependency relation has a cycle;
///   nothing is computed in that case
/// * `Err(..)` for duplicate IDs, dangling dependencies or invalid weights
pub fn find_critical_path<G: TaskGraph + ?Sized>(
    graph: &mut G,
    durations: &FxHashMap<NodeId, f64>,
    config: &SchedulerConfig,
) -> Result<CriticalPathResult, CriticalPathError> {
    if let Some(cycle) = find_cycle(&*graph) {
        return Err(CriticalPathError::CycleDetected { cycle });
    }

    let mut solver = CriticalPathSolver::new(&*graph, durations, config)?;
    solver.forward_pass()?;

    let mut injected_edges: Vec<(NodeId, NodeId)> = Vec::new();
    let mut leveling_rounds_run = 0;
    for round in 1..=config.leveling_rounds {
        let edges = solver.level_resources();
        if edges.is_empty() {
            break;
        }
        log_changes!(
            config.verbosity,
            round,
            "injected {} ordering edges",
            edges.len()
        );

        let nodes = graph.nodes_mut();
        for &(from, to) in &edges {
            if let Some(pos) = solver.position(from) {
                nodes[pos].add_additional_dependencies(&[to]);
            }
        }
        injected_edges.extend(edges);
        leveling_rounds_run += 1;

        solver.forward_pass()?;
    }

    solver.backward_pass()?;
    let paths = solver.collect_paths(config.max_paths);

    log_changes!(
        config.verbosity,
        "makespan {} with {} critical paths",
        solver.makespan(),
        paths.len()
    );

    Ok(CriticalPathResult {
        paths,
        makespan: solver.makespan(),
        timings: solver.timings(),
        injected_edges,
        leveling_rounds_run,
    })
}
