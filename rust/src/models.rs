//! Concrete node shapes accepted by the scheduler.

use pyo3::prelude::*;

use crate::graph::{GraphNode, NodeId, WorkerId};

/// A graph node with an explicit duration and optional worker.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    #[pyo3(get, set)]
    pub id: NodeId,
    #[pyo3(get, set)]
    pub dependencies: Vec<NodeId>,
    #[pyo3(get, set)]
    pub weight: f64,
    #[pyo3(get, set)]
    pub assigned_to: Option<WorkerId>,
    #[pyo3(get, set)]
    pub additional_dependencies: Vec<NodeId>,
}

impl Node {
    pub fn new(
        id: NodeId,
        dependencies: Vec<NodeId>,
        weight: f64,
        assigned_to: Option<WorkerId>,
    ) -> Self {
        Self {
            id,
            dependencies,
            weight,
            assigned_to,
            additional_dependencies: Vec::new(),
        }
    }
}

#[pymethods]
impl Node {
    #[new]
    #[pyo3(signature = (
        id,
        dependencies=Vec::new(),
        weight=0.0,
        assigned_to=None,
        additional_dependencies=Vec::new()
    ))]
    fn py_new(
        id: NodeId,
        dependencies: Vec<NodeId>,
        weight: f64,
        assigned_to: Option<WorkerId>,
        additional_dependencies: Vec<NodeId>,
    ) -> Self {
        Self {
            id,
            dependencies,
            weight,
            assigned_to,
            additional_dependencies,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Node(id={}, weight={}, assigned_to={:?}, deps={:?}, additional={:?})",
            self.id, self.weight, self.assigned_to, self.dependencies, self.additional_dependencies
        )
    }
}

impl GraphNode for Node {
    fn id(&self) -> NodeId {
        self.id
    }

    fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn assigned_to(&self) -> Option<WorkerId> {
        self.assigned_to
    }

    fn additional_dependencies(&self) -> &[NodeId] {
        &self.additional_dependencies
    }

    fn add_additional_dependencies(&mut self, ids: &[NodeId]) {
        self.additional_dependencies.extend_from_slice(ids);
    }
}

/// A node as shipped between services: the task's planned time plus the
/// prediction service's estimate.
///
/// `assigned_to == 0` means unassigned. The weight is the predicted time,
/// falling back to the planned time while no prediction exists.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct PredictedNode {
    #[pyo3(get, set)]
    pub id: NodeId,
    #[pyo3(get, set)]
    pub dependencies: Vec<NodeId>,
    #[pyo3(get, set)]
    pub assigned_to: WorkerId,
    #[pyo3(get, set)]
    pub planned_time: f64,
    #[pyo3(get, set)]
    pub predicted_time: f64,
    #[pyo3(get, set)]
    pub additional_dependencies: Vec<NodeId>,
}

#[pymethods]
impl PredictedNode {
    #[new]
    #[pyo3(signature = (
        id,
        dependencies=Vec::new(),
        assigned_to=0,
        planned_time=0.0,
        predicted_time=0.0,
        additional_dependencies=Vec::new()
    ))]
    pub fn new(
        id: NodeId,
        dependencies: Vec<NodeId>,
        assigned_to: WorkerId,
        planned_time: f64,
        predicted_time: f64,
        additional_dependencies: Vec<NodeId>,
    ) -> Self {
        Self {
            id,
            dependencies,
            assigned_to,
            planned_time,
            predicted_time,
            additional_dependencies,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PredictedNode(id={}, planned={}, predicted={}, assigned_to={})",
            self.id, self.planned_time, self.predicted_time, self.assigned_to
        )
    }
}

impl GraphNode for PredictedNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    fn weight(&self) -> f64 {
        if self.predicted_time == 0.0 {
            self.planned_time
        } else {
            self.predicted_time
        }
    }

    fn assigned_to(&self) -> Option<WorkerId> {
        (self.assigned_to != 0).then_some(self.assigned_to)
    }

    fn additional_dependencies(&self) -> &[NodeId] {
        &self.additional_dependencies
    }

    fn add_additional_dependencies(&mut self, ids: &[NodeId]) {
        self.additional_dependencies.extend_from_slice(ids);
    }
}
