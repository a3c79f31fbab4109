//! Logging macros for the scheduler with verbosity level control.
//!
//! Events go through `tracing` under the [`TARGET`] target; the library never
//! installs a subscriber. Verbosity levels:
//! - 0: SILENT (nothing)
//! - 1: CHANGES (injected edges, makespan)
//! - 2: CHECKS (per-worker conflict checks)
//! - 3: DEBUG (sweep order and per-node timings)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Target used for every event emitted by this crate.
pub const TARGET: &str = "graph_tools";

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: injected ordering edges, leveling rounds, makespan.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!(target: $crate::logging::TARGET, $($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: worker interval comparisons, validation outcomes.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!(target: $crate::logging::TARGET, $($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: sweep order, per-node timing updates.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!(target: $crate::logging::TARGET, $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_compile() {
        // No subscriber installed; events are dropped either way
        for verbosity in [VERBOSITY_SILENT, VERBOSITY_DEBUG] {
            log_changes!(verbosity, "edge {} -> {}", 1, 2);
            log_checks!(verbosity, worker = 7, "checking {} intervals", 3);
            log_debug!(verbosity, "node {} es={}", 4, 0.5);
        }
    }
}
