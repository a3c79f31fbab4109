//! Rust implementation of the task graph critical path scheduler.
//!
//! This module provides the scheduling core of the graphs service: cycle
//! checks, forward/backward timing passes, single-worker resource leveling
//! and zero-slack path extraction, plus Python bindings for the service.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::HashMap;

pub mod components;
mod config;
pub mod critical_path;
pub mod cycles;
pub mod graph;
pub mod interner;
pub mod logging;
mod models;

pub use components::{count_connected_components, GraphError};
pub use config::SchedulerConfig;
pub use critical_path::{
    find_critical_path, CriticalPathError, CriticalPathResult, CriticalPathSolver, NodeTiming,
    Vertex,
};
pub use cycles::{find_cycle, has_cycle};
pub use graph::{GraphNode, NodeId, TaskGraph, WorkerId};
pub use models::{Node, PredictedNode};

create_exception!(
    rust,
    CycleDetectedError,
    PyValueError,
    "The dependency graph contains a cycle."
);

fn to_py_err(err: CriticalPathError) -> PyErr {
    match err {
        CriticalPathError::CycleDetected { .. } => CycleDetectedError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Compute critical paths for a list of `Node`s.
///
/// Edges injected by resource leveling are written back to the passed nodes'
/// `additional_dependencies`.
///
/// # Arguments
/// * `nodes` - Graph nodes; dependencies must reference nodes in the list
/// * `durations` - Node ID -> duration; overrides the node's own weight
/// * `config` - Scheduler configuration (defaults if omitted)
///
/// # Returns
/// * CriticalPathResult with paths, makespan, timings and injected edges
///
/// # Raises
/// * CycleDetectedError if the dependency relation has a cycle
/// * ValueError on duplicate IDs, dangling dependencies or invalid weights
#[pyfunction]
#[pyo3(name = "find_critical_path", signature = (nodes, durations=None, config=None))]
fn py_find_critical_path<'py>(
    nodes: Vec<Bound<'py, Node>>,
    durations: Option<HashMap<NodeId, f64>>,
    config: Option<SchedulerConfig>,
) -> PyResult<CriticalPathResult> {
    let mut graph: Vec<Node> = nodes.iter().map(|n| n.borrow().clone()).collect();
    let durations: FxHashMap<NodeId, f64> = durations.unwrap_or_default().into_iter().collect();
    let config = config.unwrap_or_default();

    let result = find_critical_path(&mut graph, &durations, &config).map_err(to_py_err)?;

    for (bound, solved) in nodes.iter().zip(graph) {
        bound.borrow_mut().additional_dependencies = solved.additional_dependencies;
    }
    Ok(result)
}

/// Compute critical paths for a list of `PredictedNode`s.
///
/// Same contract as `find_critical_path`; weights default to each node's
/// predicted time, falling back to its planned time.
#[pyfunction]
#[pyo3(name = "find_predicted_critical_path", signature = (nodes, durations=None, config=None))]
fn py_find_predicted_critical_path<'py>(
    nodes: Vec<Bound<'py, PredictedNode>>,
    durations: Option<HashMap<NodeId, f64>>,
    config: Option<SchedulerConfig>,
) -> PyResult<CriticalPathResult> {
    let mut graph: Vec<PredictedNode> = nodes.iter().map(|n| n.borrow().clone()).collect();
    let durations: FxHashMap<NodeId, f64> = durations.unwrap_or_default().into_iter().collect();
    let config = config.unwrap_or_default();

    let result = find_critical_path(&mut graph, &durations, &config).map_err(to_py_err)?;

    for (bound, solved) in nodes.iter().zip(graph) {
        bound.borrow_mut().additional_dependencies = solved.additional_dependencies;
    }
    Ok(result)
}

/// Whether the nodes' dependency relation contains a cycle.
#[pyfunction]
#[pyo3(name = "has_cycle")]
fn py_has_cycle(nodes: Vec<Node>) -> bool {
    has_cycle(&nodes)
}

/// Count weakly connected components of the nodes' dependency relation.
///
/// # Raises
/// * ValueError if a dependency references a node not in the list
#[pyfunction]
#[pyo3(name = "count_connected_components")]
fn py_count_connected_components(nodes: Vec<Node>) -> PyResult<usize> {
    count_connected_components(&nodes).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// The graph_tools Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Node>()?;
    m.add_class::<PredictedNode>()?;
    m.add_class::<NodeTiming>()?;
    m.add_class::<CriticalPathResult>()?;

    // Config types
    m.add_class::<SchedulerConfig>()?;

    // Errors
    m.add("CycleDetectedError", m.py().get_type_bound::<CycleDetectedError>())?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_find_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_find_predicted_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_has_cycle, m)?)?;
    m.add_function(wrap_pyfunction!(py_count_connected_components, m)?)?;

    Ok(())
}
