//! Types for critical path computation.

use pyo3::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use crate::graph::NodeId;

// Note: We use std HashMap here for PyO3 interface compatibility

/// A vertex of the scheduling graph: a caller node or the synthetic sink
/// that every terminal node feeds into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vertex {
    Node(NodeId),
    Sink,
}

/// Error types for critical path calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriticalPathError {
    #[error("Cycle detected in dependency graph: {cycle:?}")]
    CycleDetected { cycle: Vec<NodeId> },
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
    #[error("Node {node} depends on {dependency}, which is not in the graph")]
    UnknownDependency { node: NodeId, dependency: NodeId },
    #[error("Node {node} has invalid weight {weight}")]
    InvalidWeight { node: NodeId, weight: f64 },
    #[error("Topological sweep stalled with unfinished nodes: {remaining:?}")]
    Unschedulable { remaining: Vec<NodeId> },
}

/// Per-node timing computed by the forward and backward passes.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeTiming {
    /// Earliest possible start (forward pass).
    #[pyo3(get)]
    pub earliest_start: f64,
    /// Latest start that does not delay the makespan (backward pass).
    #[pyo3(get)]
    pub latest_start: f64,
    /// Effective duration used for this node.
    #[pyo3(get)]
    pub weight: f64,
}

impl NodeTiming {
    pub fn earliest_finish(&self) -> f64 {
        self.earliest_start + self.weight
    }

    pub fn latest_finish(&self) -> f64 {
        self.latest_start + self.weight
    }

    pub fn slack(&self) -> f64 {
        self.latest_start - self.earliest_start
    }

    pub fn is_critical(&self, epsilon: f64) -> bool {
        self.slack().abs() <= epsilon
    }
}

#[pymethods]
impl NodeTiming {
    #[getter(earliest_finish)]
    fn py_earliest_finish(&self) -> f64 {
        self.earliest_finish()
    }

    #[getter(latest_finish)]
    fn py_latest_finish(&self) -> f64 {
        self.latest_finish()
    }

    #[getter(slack)]
    fn py_slack(&self) -> f64 {
        self.slack()
    }

    fn __repr__(&self) -> String {
        format!(
            "NodeTiming(es={}, ls={}, weight={})",
            self.earliest_start, self.latest_start, self.weight
        )
    }
}

/// Result of a full critical path run.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct CriticalPathResult {
    /// Zero-slack chains, each read from a source towards the sink
    /// (sink excluded), in discovery order.
    #[pyo3(get)]
    pub paths: Vec<Vec<NodeId>>,
    /// Completion time of the whole graph.
    #[pyo3(get)]
    pub makespan: f64,
    /// Final timing of every caller node.
    #[pyo3(get)]
    pub timings: HashMap<NodeId, NodeTiming>,
    /// Ordering edges added by resource leveling, as (earlier, later).
    #[pyo3(get)]
    pub injected_edges: Vec<(NodeId, NodeId)>,
    /// Leveling rounds that injected at least one edge.
    #[pyo3(get)]
    pub leveling_rounds_run: usize,
}

#[pymethods]
impl CriticalPathResult {
    fn __repr__(&self) -> String {
        format!(
            "CriticalPathResult(paths={}, makespan={}, injected_edges={})",
            self.paths.len(),
            self.makespan,
            self.injected_edges.len()
        )
    }
}
