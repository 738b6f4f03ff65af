//! Per-bug statistics for display layers.

use serde::Serialize;

use crate::bug::{Bug, BugState};

/// A bug's path compared against the optimal path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BugStats {
    pub path_len: usize,
    pub optimal_len: usize,
    /// `path_len - optimal_len`; negative only while a bug is still en route.
    pub diff_from_optimal: i64,
    /// `optimal_len / path_len * 100`, or 0 for an empty path.
    pub efficiency_pct: f64,
    pub state: BugState,
}

impl BugStats {
    pub fn new(path_len: usize, optimal_len: usize, state: BugState) -> Self {
        let efficiency_pct = if path_len == 0 {
            0.0
        } else {
            optimal_len as f64 / path_len as f64 * 100.0
        };
        BugStats {
            path_len,
            optimal_len,
            diff_from_optimal: path_len as i64 - optimal_len as i64,
            efficiency_pct,
            state,
        }
    }

    pub fn from_bug(bug: &Bug, optimal_len: usize) -> Self {
        Self::new(bug.path_len(), optimal_len, bug.state())
    }

    pub fn is_finished(&self) -> bool {
        self.state == BugState::Finished
    }

    /// `RUNNING`, `FINISHED` or `GAVE UP`.
    pub fn state_label(&self) -> &'static str {
        self.state.label()
    }
}
