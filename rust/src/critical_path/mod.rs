//! Critical path scheduling over task-dependency graphs.
//!
//! Given nodes with durations and assigned workers, computes earliest and
//! latest start times, serializes nodes that would double-book a worker, and
//! extracts every zero-slack chain. All state lives for a single call.

mod calculation;
mod leveling;
mod paths;
mod solver;
mod types;

pub use calculation::find_critical_path;
pub use solver::CriticalPathSolver;
pub use types::{CriticalPathError, CriticalPathResult, NodeTiming, Vertex};
