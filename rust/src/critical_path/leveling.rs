//! Single-resource leveling: no worker runs two nodes at once.

use rustc_hash::FxHashMap;

use crate::graph::{NodeId, WorkerId};
use crate::interner::NodeIndex;
use crate::{log_changes, log_checks};

use super::solver::CriticalPathSolver;

/// A node's `[start, end)` window on its worker, from the last forward pass.
#[derive(Clone, Copy, Debug)]
struct WorkerInterval {
    node: NodeIndex,
    start: f64,
    end: f64,
}

impl CriticalPathSolver {
    /// Intervals grouped by worker, ordered by worker ID, each group sorted
    /// by start then end. Unassigned nodes and the sink are excluded.
    fn worker_intervals(&self) -> Vec<(WorkerId, Vec<WorkerInterval>)> {
        let mut by_worker: FxHashMap<WorkerId, Vec<WorkerInterval>> = FxHashMap::default();
        for (idx, worker) in self.workers.iter().enumerate() {
            let Some(worker) = *worker else {
                continue;
            };
            let start = self.earliest_start[idx];
            by_worker.entry(worker).or_default().push(WorkerInterval {
                node: idx as NodeIndex,
                start,
                end: start + self.weights[idx],
            });
        }

        let mut groups: Vec<(WorkerId, Vec<WorkerInterval>)> = by_worker.into_iter().collect();
        groups.sort_unstable_by_key(|(worker, _)| *worker);
        for (_, intervals) in &mut groups {
            // Stable, so equal windows keep graph order
            intervals.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));
        }
        groups
    }

    /// Resolve worker conflicts found in the current forward-pass timings.
    ///
    /// Walks each worker's sorted intervals pairwise; whenever one interval
    /// ends after the next one starts, the earlier-starting node gains an
    /// additional dependency on the later one. Returns the injected edges as
    /// `(earlier, later)`; empty means the schedule was already conflict-free.
    ///
    /// Only adjacent pairs are compared, so a conflict that appears only after
    /// the next forward pass is left for a further round.
    pub fn level_resources(&mut self) -> Vec<(NodeId, NodeId)> {
        let mut injected: Vec<(NodeIndex, NodeIndex)> = Vec::new();

        for (worker, intervals) in self.worker_intervals() {
            log_checks!(
                self.verbosity,
                worker,
                "checking {} intervals for overlap",
                intervals.len()
            );
            for pair in intervals.windows(2) {
                let (current, next) = (pair[0], pair[1]);
                if current.end - next.start > self.epsilon {
                    self.dependencies[current.node as usize].push(next.node);
                    injected.push((current.node, next.node));
                    log_changes!(
                        self.verbosity,
                        worker,
                        "serializing {:?} [{}, {}) before {:?} [{}, {})",
                        self.vertex(current.node),
                        current.start,
                        current.end,
                        self.vertex(next.node),
                        next.start,
                        next.end
                    );
                }
            }
        }

        injected
            .into_iter()
            .filter_map(|(from, to)| Some((self.index.resolve(from)?, self.index.resolve(to)?)))
            .collect()
    }

    /// Every pair of same-worker nodes whose current windows overlap.
    pub fn worker_conflicts(&self) -> Vec<(NodeId, NodeId)> {
        let mut conflicts = Vec::new();
        for (_, intervals) in self.worker_intervals() {
            for (i, current) in intervals.iter().enumerate() {
                for next in &intervals[i + 1..] {
                    if current.end - next.start > self.epsilon {
                        if let (Some(a), Some(b)) = (
                            self.index.resolve(current.node),
                            self.index.resolve(next.node),
                        ) {
                            conflicts.push((a, b));
                        }
                    }
                }
            }
        }
        conflicts
    }
}
