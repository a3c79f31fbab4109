//! Capability traits every concrete node and graph shape implements.
//!
//! The algorithms in this crate only see nodes through [`GraphNode`], so the
//! same code runs over plain input graphs, prediction-enriched graphs and
//! wire-format graphs.

/// Caller-assigned node identifier, unique within a graph.
pub type NodeId = i64;

/// Identifier of the worker a node is assigned to.
pub type WorkerId = i64;

/// Read access to a node plus the one mutation scheduling needs.
pub trait GraphNode {
    fn id(&self) -> NodeId;

    /// Original (semantic) dependencies, in declaration order.
    fn dependencies(&self) -> &[NodeId];

    /// Duration estimate. Must be finite and non-negative to be scheduled.
    fn weight(&self) -> f64;

    /// Assigned worker, `None` when the node is unassigned.
    fn assigned_to(&self) -> Option<WorkerId>;

    /// Ordering edges injected by resource leveling.
    fn additional_dependencies(&self) -> &[NodeId];

    fn add_additional_dependencies(&mut self, ids: &[NodeId]);

    /// Original and additional dependencies, in that order.
    fn all_dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dependencies()
            .iter()
            .chain(self.additional_dependencies())
            .copied()
    }
}

/// A collection of nodes owned by the caller.
pub trait TaskGraph {
    type Node: GraphNode;

    fn nodes(&self) -> &[Self::Node];

    fn nodes_mut(&mut self) -> &mut [Self::Node];

    fn len(&self) -> usize {
        self.nodes().len()
    }

    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }
}

impl<N: GraphNode> TaskGraph for Vec<N> {
    type Node = N;

    fn nodes(&self) -> &[N] {
        self
    }

    fn nodes_mut(&mut self) -> &mut [N] {
        self
    }
}

impl<N: GraphNode> TaskGraph for [N] {
    type Node = N;

    fn nodes(&self) -> &[N] {
        self
    }

    fn nodes_mut(&mut self) -> &mut [N] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    #[test]
    fn test_all_dependencies_lists_original_first() {
        let mut node = Node::new(1, vec![2, 3], 1.0, None);
        node.add_additional_dependencies(&[4]);
        assert_eq!(node.all_dependencies().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_slice_and_vec_graphs_agree() {
        let mut graph = vec![Node::new(1, vec![], 1.0, None), Node::new(2, vec![1], 1.0, None)];
        assert_eq!(graph.len(), 2);

        let slice: &mut [Node] = &mut graph[1..];
        assert_eq!(TaskGraph::len(&*slice), 1);
        slice.nodes_mut()[0].add_additional_dependencies(&[5]);
        assert_eq!(graph[1].additional_dependencies, vec![5]);
    }
}
