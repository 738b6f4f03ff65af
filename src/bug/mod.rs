//! Bug navigation engine.
//!
//! A [`Bug`] walks a grid one tick at a time using a [`Policy`] to propose
//! moves. It records every cell it occupies in an append-only history with
//! a cursor, so a run can be rewound to an earlier step and continued from
//! there. Continuing after a rewind discards the old future.

pub mod policy;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};

pub use policy::{BugKind, ParseBugKindError, Policy};

/// Lifecycle of a bug run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BugState {
    Running,
    Finished,
    /// Set by an external caller, never by the bug itself.
    #[serde(rename = "GAVE UP")]
    GaveUp,
}

impl BugState {
    pub const fn label(self) -> &'static str {
        match self {
            BugState::Running => "RUNNING",
            BugState::Finished => "FINISHED",
            BugState::GaveUp => "GAVE UP",
        }
    }

    /// Finished or gave up.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, BugState::Running)
    }
}

impl fmt::Display for BugState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A navigating agent: a move policy plus its step history.
///
/// `history[cursor]` is always the current position. Index 0 is the start
/// cell.
#[derive(Debug, Clone)]
pub struct Bug {
    policy: Policy,
    grid: Arc<Grid>,
    goal: Position,
    history: Vec<Position>,
    cursor: usize,
    state: BugState,
}

impl Bug {
    /// Creates a bug at `start` heading for `goal`.
    pub fn new(policy: Policy, grid: Arc<Grid>, start: Position, goal: Position) -> Self {
        Bug {
            policy,
            grid,
            goal,
            history: vec![start],
            cursor: 0,
            state: BugState::Running,
        }
    }

    /// Restarts the bug on a (possibly different) grid, start and goal.
    /// The policy, including any random state, is kept.
    pub fn init(&mut self, grid: Arc<Grid>, start: Position, goal: Position) {
        self.grid = grid;
        self.goal = goal;
        self.history.clear();
        self.history.push(start);
        self.cursor = 0;
        self.state = BugState::Running;
    }

    /// Advances one tick and returns the current position afterwards.
    ///
    /// Terminal bugs do not move. If the cursor was rewound, history after it
    /// is dropped before moving. A bug standing on the goal is marked finished
    /// without moving; a step that lands on the goal finishes on that tick.
    /// A blocked candidate leaves the bug in place and adds nothing to the
    /// history.
    pub fn next_step(&mut self) -> Position {
        if self.state.is_terminal() {
            return self.current_position();
        }

        self.history.truncate(self.cursor + 1);

        let current = self.history[self.cursor];
        if current == self.goal {
            self.state = BugState::Finished;
            return current;
        }

        let candidate = self.policy.move_to(current, self.goal);
        if self.grid.is_blocked(candidate) || candidate == current {
            return current;
        }

        self.history.push(candidate);
        self.cursor += 1;
        if candidate == self.goal {
            self.state = BugState::Finished;
        }
        candidate
    }

    /// Moves the cursor back (or forward) to `step` and resumes running, even
    /// from a finished or given-up state. Returns false and changes nothing if
    /// `step` is outside the history.
    pub fn reset_to_step(&mut self, step: usize) -> bool {
        if step >= self.history.len() {
            return false;
        }
        self.cursor = step;
        self.state = BugState::Running;
        true
    }

    /// Marks a running bug as given up. Finished bugs are unaffected.
    pub fn give_up(&mut self) {
        if self.state == BugState::Running {
            self.state = BugState::GaveUp;
        }
    }

    pub fn current_position(&self) -> Position {
        self.history[self.cursor]
    }

    /// Every cell visited, including any future kept after a rewind.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Number of positions in the history, the bug's path length.
    pub fn path_len(&self) -> usize {
        self.history.len()
    }

    pub fn current_step_index(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> BugState {
        self.state
    }

    pub fn has_finished(&self) -> bool {
        self.state == BugState::Finished
    }

    pub fn has_given_up(&self) -> bool {
        self.state == BugState::GaveUp
    }

    /// Finished or gave up.
    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn start(&self) -> Position {
        self.history[0]
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn kind(&self) -> BugKind {
        self.policy.kind()
    }
}
