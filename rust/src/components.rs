//! Connected-component counting over the dependency relation.

use thiserror::Error;

use crate::graph::{GraphNode, NodeId, TaskGraph};
use crate::interner::NodeInterner;

/// Errors raised by structural graph utilities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {node} depends on {dependency}, which is not in the graph")]
    UnexpectedDependencyReference { node: NodeId, dependency: NodeId },
}

/// Count weakly connected components of the dependency relation.
///
/// Edge direction is ignored and cycles are allowed. A dependency naming a
/// node absent from the graph is an error.
pub fn count_connected_components<G: TaskGraph + ?Sized>(graph: &G) -> Result<usize, GraphError> {
    let nodes = graph.nodes();
    let mut index = NodeInterner::with_capacity(nodes.len());
    for node in nodes {
        index.intern(node.id());
    }

    let mut neighbours: Vec<Vec<u32>> = vec![Vec::new(); index.len()];
    for node in nodes {
        let from = index.intern(node.id());
        for &dep in node.dependencies() {
            let to = index
                .get(dep)
                .ok_or(GraphError::UnexpectedDependencyReference {
                    node: node.id(),
                    dependency: dep,
                })?;
            neighbours[from as usize].push(to);
            neighbours[to as usize].push(from);
        }
    }

    let mut visited = vec![false; index.len()];
    let mut stack: Vec<u32> = Vec::new();
    let mut count = 0;

    for start in 0..index.len() {
        if visited[start] {
            continue;
        }
        count += 1;
        visited[start] = true;
        stack.push(start as u32);

        while let Some(current) = stack.pop() {
            for &next in &neighbours[current as usize] {
                if !visited[next as usize] {
                    visited[next as usize] = true;
                    stack.push(next);
                }
            }
        }
    }

    Ok(count)
}
