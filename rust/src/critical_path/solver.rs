//! Per-run solver state and the forward/backward timing passes.

use rustc_hash::FxHashMap;
use std::collections::{HashMap, VecDeque};

use crate::config::SchedulerConfig;
use crate::graph::{GraphNode, NodeId, TaskGraph, WorkerId};
use crate::interner::{NodeIndex, NodeInterner};
use crate::{log_checks, log_debug};

use super::types::{CriticalPathError, NodeTiming, Vertex};

/// Timing state and adjacency for one critical path run.
///
/// Edges run from a node to each of its dependencies, and time flows along
/// edges: a node's dependencies start once it has finished. Every node without
/// outgoing edges feeds a synthetic sink, which occupies the slot right after
/// the last caller node in every per-vertex vector.
///
/// Node indices follow the graph's node order, so `NodeIndex` is also the
/// node's position in the caller's graph.
pub struct CriticalPathSolver {
    pub(super) index: NodeInterner,
    /// Effective durations; the sink's is zero.
    pub(super) weights: Vec<f64>,
    pub(super) workers: Vec<Option<WorkerId>>,
    /// Original, additional and injected dependencies per caller node.
    pub(super) dependencies: Vec<Vec<NodeIndex>>,
    /// Forward adjacency including sink wiring.
    pub(super) successors: Vec<Vec<NodeIndex>>,
    /// Inverted adjacency including sink wiring.
    pub(super) predecessors: Vec<Vec<NodeIndex>>,
    pub(super) earliest_start: Vec<f64>,
    pub(super) latest_start: Vec<f64>,
    pub(super) epsilon: f64,
    pub(super) verbosity: u8,
}

impl CriticalPathSolver {
    /// Build solver state from a graph and externally supplied durations.
    ///
    /// A duration in `durations` overrides the node's own weight. Fails on
    /// duplicate IDs, dangling dependencies and negative or non-finite weights.
    /// Cycles are not checked here.
    pub fn new<G: TaskGraph + ?Sized>(
        graph: &G,
        durations: &FxHashMap<NodeId, f64>,
        config: &SchedulerConfig,
    ) -> Result<Self, CriticalPathError> {
        let nodes = graph.nodes();
        let n = nodes.len();

        let mut index = NodeInterner::with_capacity(n);
        for node in nodes {
            index
                .insert_new(node.id())
                .ok_or(CriticalPathError::DuplicateNode(node.id()))?;
        }

        let mut weights = Vec::with_capacity(n + 1);
        let mut workers = Vec::with_capacity(n);
        let mut dependencies = Vec::with_capacity(n);

        for node in nodes {
            let weight = durations
                .get(&node.id())
                .copied()
                .unwrap_or_else(|| node.weight());
            if !weight.is_finite() || weight < 0.0 {
                return Err(CriticalPathError::InvalidWeight {
                    node: node.id(),
                    weight,
                });
            }
            weights.push(weight);
            workers.push(node.assigned_to());

            let deps = node
                .all_dependencies()
                .map(|dep| {
                    index
                        .get(dep)
                        .ok_or(CriticalPathError::UnknownDependency {
                            node: node.id(),
                            dependency: dep,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            dependencies.push(deps);
        }
        weights.push(0.0);

        log_checks!(config.verbosity, nodes = n, "validated scheduling input");

        let mut solver = Self {
            index,
            weights,
            workers,
            dependencies,
            successors: Vec::new(),
            predecessors: Vec::new(),
            earliest_start: vec![f64::NEG_INFINITY; n + 1],
            latest_start: vec![f64::INFINITY; n + 1],
            epsilon: config.epsilon,
            verbosity: config.verbosity,
        };
        solver.rebuild_adjacency();
        Ok(solver)
    }

    /// Number of caller nodes (the sink is not counted).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub(super) fn sink(&self) -> NodeIndex {
        self.index.len() as NodeIndex
    }

    /// Position of a node in the graph the solver was built from.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(id).map(|i| i as usize)
    }

    /// Derive forward and inverted adjacency from the current dependency
    /// lists, wiring every terminal node to the sink.
    fn rebuild_adjacency(&mut self) {
        let total = self.weights.len();
        let sink = self.sink();

        let mut successors: Vec<Vec<NodeIndex>> = Vec::with_capacity(total);
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); total];

        for (idx, deps) in self.dependencies.iter().enumerate() {
            let mut next = deps.clone();
            if next.is_empty() {
                next.push(sink);
            }
            for &succ in &next {
                predecessors[succ as usize].push(idx as NodeIndex);
            }
            successors.push(next);
        }
        successors.push(Vec::new());

        self.successors = successors;
        self.predecessors = predecessors;
    }

    /// Forward pass: earliest start of every vertex.
    ///
    /// Re-derives adjacency first so edges injected since the last pass are
    /// honoured. Sources start at 0; every other vertex starts at the latest
    /// finish among its predecessors. Each vertex is finalized exactly once,
    /// after all of its predecessors.
    pub fn forward_pass(&mut self) -> Result<(), CriticalPathError> {
        self.rebuild_adjacency();

        let total = self.weights.len();
        self.earliest_start = vec![f64::NEG_INFINITY; total];
        self.latest_start = vec![f64::INFINITY; total];

        let mut remaining: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();
        let mut queue: VecDeque<NodeIndex> = (0..total)
            .filter(|&v| remaining[v] == 0)
            .map(|v| v as NodeIndex)
            .collect();
        for &source in &queue {
            self.earliest_start[source as usize] = 0.0;
        }

        let mut finalized = 0;
        while let Some(current) = queue.pop_front() {
            finalized += 1;
            let idx = current as usize;
            let finish = self.earliest_start[idx] + self.weights[idx];
            log_debug!(
                self.verbosity,
                "forward: {:?} es={} ef={}",
                self.vertex(current),
                self.earliest_start[idx],
                finish
            );

            for &next in &self.successors[idx] {
                let next_idx = next as usize;
                if finish > self.earliest_start[next_idx] {
                    self.earliest_start[next_idx] = finish;
                }
                remaining[next_idx] -= 1;
                if remaining[next_idx] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if finalized != total {
            return Err(self.unschedulable(&remaining));
        }
        Ok(())
    }

    /// Backward pass: latest start of every vertex.
    ///
    /// The sink's latest start is pinned to its earliest start (the makespan);
    /// every other vertex gets the minimum over its successors of
    /// `successor.latest_start - own weight`. Must follow `forward_pass`.
    pub fn backward_pass(&mut self) -> Result<(), CriticalPathError> {
        let total = self.weights.len();
        let sink = self.sink() as usize;

        self.latest_start = vec![f64::INFINITY; total];
        self.latest_start[sink] = self.earliest_start[sink];

        let mut remaining: Vec<usize> = self.successors.iter().map(Vec::len).collect();
        let mut queue: VecDeque<NodeIndex> = (0..total)
            .filter(|&v| remaining[v] == 0)
            .map(|v| v as NodeIndex)
            .collect();

        let mut finalized = 0;
        while let Some(current) = queue.pop_front() {
            finalized += 1;
            let start = self.latest_start[current as usize];
            log_debug!(
                self.verbosity,
                "backward: {:?} ls={}",
                self.vertex(current),
                start
            );

            for &prev in &self.predecessors[current as usize] {
                let prev_idx = prev as usize;
                let candidate = start - self.weights[prev_idx];
                if candidate < self.latest_start[prev_idx] {
                    self.latest_start[prev_idx] = candidate;
                }
                remaining[prev_idx] -= 1;
                if remaining[prev_idx] == 0 {
                    queue.push_back(prev);
                }
            }
        }

        if finalized != total {
            return Err(self.unschedulable(&remaining));
        }
        Ok(())
    }

    fn unschedulable(&self, remaining: &[usize]) -> CriticalPathError {
        let remaining = remaining
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .filter_map(|(idx, _)| self.index.resolve(idx as NodeIndex))
            .collect();
        CriticalPathError::Unschedulable { remaining }
    }

    pub(super) fn vertex(&self, idx: NodeIndex) -> Vertex {
        match self.index.resolve(idx) {
            Some(id) => Vertex::Node(id),
            None => Vertex::Sink,
        }
    }

    fn vertex_index(&self, vertex: Vertex) -> Option<NodeIndex> {
        match vertex {
            Vertex::Node(id) => self.index.get(id),
            Vertex::Sink => Some(self.sink()),
        }
    }

    #[inline]
    pub(super) fn is_critical_index(&self, idx: NodeIndex) -> bool {
        let idx = idx as usize;
        (self.latest_start[idx] - self.earliest_start[idx]).abs() <= self.epsilon
    }

    /// Timing of a vertex as of the last pass.
    pub fn timing(&self, vertex: Vertex) -> Option<NodeTiming> {
        let idx = self.vertex_index(vertex)? as usize;
        Some(NodeTiming {
            earliest_start: self.earliest_start[idx],
            latest_start: self.latest_start[idx],
            weight: self.weights[idx],
        })
    }

    /// Timings of all caller nodes.
    pub fn timings(&self) -> HashMap<NodeId, NodeTiming> {
        (0..self.len() as NodeIndex)
            .filter_map(|idx| {
                let id = self.index.resolve(idx)?;
                let timing = self.timing(Vertex::Node(id))?;
                Some((id, timing))
            })
            .collect()
    }

    /// Project completion time: the sink's earliest start.
    pub fn makespan(&self) -> f64 {
        self.earliest_start[self.sink() as usize]
    }

    /// Nodes currently wired to the sink, in graph order.
    pub fn terminal_nodes(&self) -> Vec<NodeId> {
        self.predecessors[self.sink() as usize]
            .iter()
            .filter_map(|&idx| self.index.resolve(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn make_graph(nodes: &[(NodeId, &[NodeId], f64)]) -> Vec<Node> {
        nodes
            .iter()
            .enumerate()
            .map(|(i, (id, deps, weight))| Node::new(*id, deps.to_vec(), *weight, Some(i as i64 + 1)))
            .collect()
    }

    fn solve(graph: &Vec<Node>) -> CriticalPathSolver {
        let mut solver =
            CriticalPathSolver::new(graph, &FxHashMap::default(), &SchedulerConfig::default())
                .unwrap();
        solver.forward_pass().unwrap();
        solver.backward_pass().unwrap();
        solver
    }

    fn es(solver: &CriticalPathSolver, id: NodeId) -> f64 {
        solver.timing(Vertex::Node(id)).unwrap().earliest_start
    }

    fn ls(solver: &CriticalPathSolver, id: NodeId) -> f64 {
        solver.timing(Vertex::Node(id)).unwrap().latest_start
    }

    #[test]
    fn test_chain_timings() {
        // 1 -> 2 -> 3, time flows from 1 to 3
        let graph = make_graph(&[(1, &[2], 2.0), (2, &[3], 3.0), (3, &[], 4.0)]);
        let solver = solve(&graph);

        assert_eq!(es(&solver, 1), 0.0);
        assert_eq!(es(&solver, 2), 2.0);
        assert_eq!(es(&solver, 3), 5.0);
        assert_eq!(solver.makespan(), 9.0);
        for id in [1, 2, 3] {
            assert_eq!(es(&solver, id), ls(&solver, id));
        }
    }

    #[test]
    fn test_parallel_branches_with_slack() {
        // 1 and 3 both feed 2; 3 is longer so 1 has slack
        let graph = make_graph(&[(1, &[2], 2.0), (2, &[], 3.0), (3, &[2], 5.0)]);
        let solver = solve(&graph);

        assert_eq!(es(&solver, 2), 5.0);
        assert_eq!(solver.makespan(), 8.0);
        assert_eq!(ls(&solver, 1), 3.0);
        assert_eq!(solver.timing(Vertex::Node(1)).unwrap().slack(), 3.0);
        assert!(solver.timing(Vertex::Node(3)).unwrap().is_critical(1e-9));
    }

    #[test]
    fn test_sink_wiring() {
        let graph = make_graph(&[(1, &[2, 3], 1.0), (2, &[], 4.0), (3, &[], 2.0), (4, &[], 7.0)]);
        let solver = solve(&graph);

        assert_eq!(solver.terminal_nodes(), vec![2, 3, 4]);
        let sink = solver.timing(Vertex::Sink).unwrap();
        assert_eq!(sink.earliest_start, 7.0);
        assert_eq!(sink.latest_start, 7.0);
        assert_eq!(sink.weight, 0.0);
    }

    #[test]
    fn test_durations_override_weights() {
        let graph = make_graph(&[(1, &[2], 100.0), (2, &[], 100.0)]);
        let durations: FxHashMap<NodeId, f64> = [(1, 1.5)].into_iter().collect();
        let mut solver =
            CriticalPathSolver::new(&graph, &durations, &SchedulerConfig::default()).unwrap();
        solver.forward_pass().unwrap();

        assert_eq!(es(&solver, 2), 1.5);
        assert_eq!(solver.makespan(), 101.5);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let graph = make_graph(&[(1, &[], 1.0), (1, &[], 2.0)]);
        let result =
            CriticalPathSolver::new(&graph, &FxHashMap::default(), &SchedulerConfig::default());
        assert_eq!(result.err(), Some(CriticalPathError::DuplicateNode(1)));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let mut graph = make_graph(&[(1, &[], 1.0), (2, &[], 2.0)]);
        graph[0].additional_dependencies.push(42);
        let result =
            CriticalPathSolver::new(&graph, &FxHashMap::default(), &SchedulerConfig::default());
        assert_eq!(
            result.err(),
            Some(CriticalPathError::UnknownDependency {
                node: 1,
                dependency: 42
            })
        );
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let graph = make_graph(&[(1, &[], 1.0)]);
        let durations: FxHashMap<NodeId, f64> = [(1, -2.0)].into_iter().collect();
        let result = CriticalPathSolver::new(&graph, &durations, &SchedulerConfig::default());
        assert!(matches!(
            result.err(),
            Some(CriticalPathError::InvalidWeight { node: 1, .. })
        ));

        let nan = make_graph(&[(1, &[], f64::NAN)]);
        let result =
            CriticalPathSolver::new(&nan, &FxHashMap::default(), &SchedulerConfig::default());
        assert!(matches!(
            result.err(),
            Some(CriticalPathError::InvalidWeight { node: 1, .. })
        ));
    }

    #[test]
    fn test_additional_dependency_cycle_is_unschedulable() {
        let mut graph = make_graph(&[(1, &[2], 1.0), (2, &[], 1.0)]);
        graph[1].additional_dependencies.push(1);
        let mut solver =
            CriticalPathSolver::new(&graph, &FxHashMap::default(), &SchedulerConfig::default())
                .unwrap();

        match solver.forward_pass() {
            Err(CriticalPathError::Unschedulable { remaining }) => {
                assert_eq!(remaining, vec![1, 2]);
            }
            other => panic!("expected Unschedulable, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph: Vec<Node> = Vec::new();
        let solver = solve(&graph);
        assert!(solver.is_empty());
        assert_eq!(solver.makespan(), 0.0);
        assert!(solver.timings().is_empty());
    }
}
