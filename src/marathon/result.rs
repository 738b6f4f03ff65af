//! Per-trial records and the aggregated marathon result.

use serde::{Deserialize, Serialize};

use crate::bug::{Bug, BugKind, BugState};
use crate::grid::Position;

/// How a bug's trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOutcome {
    /// Reached the goal.
    Finished,
    /// Given up by the runner's stall limit.
    GaveUp,
    /// Still running when the step cap was hit.
    Terminated,
}

impl From<BugState> for TrialOutcome {
    fn from(state: BugState) -> Self {
        match state {
            BugState::Finished => TrialOutcome::Finished,
            BugState::GaveUp => TrialOutcome::GaveUp,
            BugState::Running => TrialOutcome::Terminated,
        }
    }
}

/// Result of one bug in one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRun {
    pub kind: BugKind,
    pub outcome: TrialOutcome,
    /// History length when the trial stopped.
    pub path_len: usize,
    /// Ticks the bug was stepped.
    pub ticks: usize,
}

impl BugRun {
    pub fn from_bug(bug: &Bug, ticks: usize) -> Self {
        BugRun {
            kind: bug.kind(),
            outcome: bug.state().into(),
            path_len: bug.path_len(),
            ticks,
        }
    }
}

/// A complete record of one marathon trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_id: usize,
    pub width: usize,
    pub height: usize,
    pub start: Position,
    pub goal: Position,
    pub optimal_len: usize,
    pub bug: BugRun,
    /// Present in compare mode.
    pub rival: Option<BugRun>,
}

/// Aggregated statistics over a marathon.
///
/// Steps are path lengths (history node counts), matching how the optimal
/// length is measured. Win/loss/tie are from the primary bug's point of
/// view and only count trials where both bugs finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarathonResult {
    pub total_trials: usize,
    pub completed: usize,
    pub gave_up: usize,
    pub terminated: usize,
    pub total_steps: u64,
    pub total_optimal_steps: u64,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

impl MarathonResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one trial into the totals.
    pub fn record(&mut self, trial: &TrialRecord) {
        self.total_trials += 1;

        match trial.bug.outcome {
            TrialOutcome::Finished => {
                self.completed += 1;
                self.total_steps += trial.bug.path_len as u64;
                self.total_optimal_steps += trial.optimal_len as u64;
            }
            TrialOutcome::GaveUp => self.gave_up += 1,
            TrialOutcome::Terminated => self.terminated += 1,
        }

        if let Some(rival) = &trial.rival {
            if trial.bug.outcome == TrialOutcome::Finished
                && rival.outcome == TrialOutcome::Finished
            {
                match trial.bug.path_len.cmp(&rival.path_len) {
                    std::cmp::Ordering::Less => self.wins += 1,
                    std::cmp::Ordering::Greater => self.losses += 1,
                    std::cmp::Ordering::Equal => self.ties += 1,
                }
            }
        }
    }

    /// Adds another partial result into this one.
    pub fn merge(&mut self, other: &MarathonResult) {
        self.total_trials += other.total_trials;
        self.completed += other.completed;
        self.gave_up += other.gave_up;
        self.terminated += other.terminated;
        self.total_steps += other.total_steps;
        self.total_optimal_steps += other.total_optimal_steps;
        self.wins += other.wins;
        self.losses += other.losses;
        self.ties += other.ties;
    }

    /// Mean path length over completed trials.
    pub fn average_steps(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.completed as f64
        }
    }

    /// Mean optimal length over completed trials.
    pub fn average_optimal(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.total_optimal_steps as f64 / self.completed as f64
        }
    }

    /// Sum of optimal lengths over sum of actual lengths, in `[0, 1]`.
    pub fn efficiency(&self) -> f64 {
        if self.total_steps == 0 {
            0.0
        } else {
            self.total_optimal_steps as f64 / self.total_steps as f64
        }
    }

    /// Fraction of trials the primary bug finished.
    pub fn completion_rate(&self) -> f64 {
        if self.total_trials == 0 {
            0.0
        } else {
            self.completed as f64 / self.total_trials as f64
        }
    }
}
