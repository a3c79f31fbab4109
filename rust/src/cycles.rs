//! Cycle detection over the original dependency relation.

use crate::graph::{GraphNode, NodeId, TaskGraph};
use crate::interner::NodeInterner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Find a dependency cycle, if any.
///
/// Iterative DFS with a three-state marker per node. Only original
/// dependencies are followed; references to nodes outside the graph are
/// ignored here and reported by validation instead.
///
/// The returned cycle starts and ends with the same node, in dependency
/// order: `[a, b, a]` means `a` depends on `b` and `b` depends on `a`.
pub fn find_cycle<G: TaskGraph + ?Sized>(graph: &G) -> Option<Vec<NodeId>> {
    let nodes = graph.nodes();
    let mut index = NodeInterner::with_capacity(nodes.len());
    for node in nodes {
        index.intern(node.id());
    }

    // Duplicate IDs collapse onto one index; their dependency lists merge.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); index.len()];
    for node in nodes {
        let Some(from) = index.get(node.id()) else {
            continue;
        };
        adjacency[from as usize].extend(
            node.dependencies()
                .iter()
                .filter_map(|&dep| index.get(dep))
                .map(|dep| dep as usize),
        );
    }

    let mut marks = vec![Mark::Unvisited; index.len()];
    // (node, position of the next dependency to explore)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..index.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;
            let Some(&dep) = adjacency[node].get(pos) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[dep] {
                Mark::Unvisited => {
                    marks[dep] = Mark::InProgress;
                    stack.push((dep, 0));
                }
                Mark::InProgress => {
                    let start = stack.iter().position(|&(n, _)| n == dep).unwrap_or(0);
                    let cycle = stack[start..]
                        .iter()
                        .chain(std::iter::once(&(dep, 0)))
                        .filter_map(|&(n, _)| index.resolve(n as u32))
                        .collect();
                    return Some(cycle);
                }
                Mark::Done => {}
            }
        }
    }

    None
}

/// Whether the dependency relation contains a cycle.
pub fn has_cycle<G: TaskGraph + ?Sized>(graph: &G) -> bool {
    find_cycle(graph).is_some()
}
