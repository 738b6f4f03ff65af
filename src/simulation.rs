//! Tick drivers for interactive runs.
//!
//! A renderer or timer owns a driver and calls `step` once per tick, reading
//! bug state back through the accessors between ticks.

use crate::bug::Bug;

/// Drives a single bug.
#[derive(Debug, Clone)]
pub struct Simulator {
    bug: Bug,
}

impl Simulator {
    pub fn new(bug: Bug) -> Self {
        Simulator { bug }
    }

    /// Advances the bug one tick unless it is finished or has given up.
    pub fn step(&mut self) {
        if !self.bug.is_done() {
            self.bug.next_step();
        }
    }

    /// Rewinds the bug one step. Returns false at the start of the history.
    pub fn step_back(&mut self) -> bool {
        match self.bug.current_step_index().checked_sub(1) {
            Some(step) => self.bug.reset_to_step(step),
            None => false,
        }
    }

    /// Rewinds to the start cell. The old history stays until the next step.
    pub fn restart(&mut self) {
        self.bug.reset_to_step(0);
    }

    /// Steps until the bug is done or `max_ticks` have elapsed; returns the
    /// number of ticks taken.
    pub fn run_to_end(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && !self.is_done() {
            self.step();
            ticks += 1;
        }
        ticks
    }

    pub fn is_done(&self) -> bool {
        self.bug.is_done()
    }

    pub fn bug(&self) -> &Bug {
        &self.bug
    }

    pub fn bug_mut(&mut self) -> &mut Bug {
        &mut self.bug
    }

    pub fn into_bug(self) -> Bug {
        self.bug
    }
}

/// Drives two bugs side by side. Each is stepped independently, so one may
/// finish well before the other.
#[derive(Debug, Clone)]
pub struct CompareSimulator {
    first: Bug,
    second: Bug,
}

impl CompareSimulator {
    pub fn new(first: Bug, second: Bug) -> Self {
        CompareSimulator { first, second }
    }

    /// Advances each bug that is not yet done by one tick.
    pub fn step(&mut self) {
        if !self.first.is_done() {
            self.first.next_step();
        }
        if !self.second.is_done() {
            self.second.next_step();
        }
    }

    /// Rewinds each bug one step where possible. Returns true if either moved.
    pub fn step_back(&mut self) -> bool {
        let first = rewind_one(&mut self.first);
        let second = rewind_one(&mut self.second);
        first || second
    }

    pub fn restart(&mut self) {
        self.first.reset_to_step(0);
        self.second.reset_to_step(0);
    }

    /// Steps until both bugs are done or `max_ticks` have elapsed; returns the
    /// number of ticks taken.
    pub fn run_to_end(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && !self.both_done() {
            self.step();
            ticks += 1;
        }
        ticks
    }

    pub fn both_finished(&self) -> bool {
        self.first.has_finished() && self.second.has_finished()
    }

    /// Both bugs finished or gave up.
    pub fn both_done(&self) -> bool {
        self.first.is_done() && self.second.is_done()
    }

    pub fn first(&self) -> &Bug {
        &self.first
    }

    pub fn second(&self) -> &Bug {
        &self.second
    }

    pub fn first_mut(&mut self) -> &mut Bug {
        &mut self.first
    }

    pub fn second_mut(&mut self) -> &mut Bug {
        &mut self.second
    }

    pub fn into_bugs(self) -> (Bug, Bug) {
        (self.first, self.second)
    }
}

fn rewind_one(bug: &mut Bug) -> bool {
    match bug.current_step_index().checked_sub(1) {
        Some(step) => bug.reset_to_step(step),
        None => false,
    }
}
