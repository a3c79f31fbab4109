//! Configuration types for the critical-path scheduler.

use pyo3::prelude::*;

/// Configuration for critical-path computation and resource leveling.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Number of correct-then-reforward rounds. 1 re-runs the forward pass
    /// once after the first correction; larger values keep going until no
    /// edge is injected or the bound is hit; 0 disables leveling.
    #[pyo3(get, set)]
    pub leveling_rounds: usize,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Tolerance for slack and interval-overlap comparisons.
    #[pyo3(get, set)]
    pub epsilon: f64,
    /// Stop collecting once this many critical paths were found (None = all).
    #[pyo3(get, set)]
    pub max_paths: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            leveling_rounds: 1,
            verbosity: 0,
            epsilon: 1e-9,
            max_paths: None,
        }
    }
}

impl SchedulerConfig {
    /// Level until no conflicts remain, bounded by `max_rounds`.
    pub fn until_stable(max_rounds: usize) -> Self {
        Self {
            leveling_rounds: max_rounds,
            ..Self::default()
        }
    }
}

#[pymethods]
impl SchedulerConfig {
    #[new]
    #[pyo3(signature = (
        leveling_rounds=None,
        verbosity=None,
        epsilon=None,
        max_paths=None
    ))]
    fn new(
        leveling_rounds: Option<usize>,
        verbosity: Option<u8>,
        epsilon: Option<f64>,
        max_paths: Option<usize>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            leveling_rounds: leveling_rounds.unwrap_or(defaults.leveling_rounds),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            epsilon: epsilon.unwrap_or(defaults.epsilon),
            max_paths,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulerConfig(leveling_rounds={}, verbosity={}, epsilon={}, max_paths={:?})",
            self.leveling_rounds, self.verbosity, self.epsilon, self.max_paths
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.leveling_rounds, 1);
        assert_eq!(config.verbosity, 0);
        assert!((config.epsilon - 1e-9).abs() < 1e-15);
        assert!(config.max_paths.is_none());
    }

    #[test]
    fn test_until_stable_keeps_other_defaults() {
        let config = SchedulerConfig::until_stable(16);
        assert_eq!(config.leveling_rounds, 16);
        assert_eq!(config.verbosity, 0);
    }
}
