//! Enumeration of zero-slack chains ending at the sink.

use crate::graph::NodeId;
use crate::interner::NodeIndex;
use crate::log_debug;

use super::solver::CriticalPathSolver;

impl CriticalPathSolver {
    /// A chain stops at a zero-slack node that starts at time zero.
    #[inline]
    fn is_path_origin(&self, idx: NodeIndex) -> bool {
        idx != self.sink()
            && self.earliest_start[idx as usize].abs() <= self.epsilon
            && self.is_critical_index(idx)
    }

    /// Collect every maximal zero-slack chain, walking backward from the sink.
    ///
    /// Branches into every zero-slack predecessor, so ties yield several
    /// paths. Each path reads from its origin towards the sink and excludes
    /// the sink itself. Paths appear in discovery order, which follows the
    /// graph's node order. Must follow `backward_pass`.
    pub fn collect_paths(&self, max_paths: Option<usize>) -> Vec<Vec<NodeId>> {
        let sink = self.sink();
        let mut paths: Vec<Vec<NodeId>> = Vec::new();
        if max_paths == Some(0) {
            return paths;
        }

        // Current chain from the sink backward, sink excluded
        let mut chain: Vec<NodeIndex> = Vec::new();
        // (vertex, position of the next predecessor to try)
        let mut stack: Vec<(NodeIndex, usize)> = vec![(sink, 0)];

        while let Some(frame) = stack.last_mut() {
            let (vertex, pos) = *frame;
            let preds = &self.predecessors[vertex as usize];
            let next = preds[pos..]
                .iter()
                .position(|&p| self.is_critical_index(p))
                .map(|offset| pos + offset);

            let Some(found) = next else {
                stack.pop();
                if vertex != sink {
                    chain.pop();
                }
                continue;
            };
            frame.1 = found + 1;

            let pred = preds[found];
            chain.push(pred);
            if self.is_path_origin(pred) {
                let path: Vec<NodeId> = chain
                    .iter()
                    .rev()
                    .filter_map(|&idx| self.index.resolve(idx))
                    .collect();
                log_debug!(self.verbosity, "critical path: {:?}", path);
                paths.push(path);
                chain.pop();

                if max_paths.is_some_and(|limit| paths.len() >= limit) {
                    break;
                }
            } else {
                stack.push((pred, 0));
            }
        }

        paths
    }
}
