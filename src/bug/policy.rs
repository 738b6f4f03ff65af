//! Move policies for the bug engine.
//!
//! A policy only proposes the next cell. Obstacle handling, history and
//! termination live in [`super::Bug`], so every policy shares one stepping
//! engine.

use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::grid::Position;

/// The available navigation heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BugKind {
    /// Diagonal-first greedy descent toward the goal.
    Bug1,
    /// Unbiased random walk.
    Bug2,
}

impl BugKind {
    /// Builds a fresh policy of this kind. A random walk is seeded from `rng`
    /// so that seeded runs stay reproducible.
    pub fn make_policy(self, rng: &mut impl Rng) -> Policy {
        match self {
            BugKind::Bug1 => Policy::Greedy,
            BugKind::Bug2 => Policy::random_walk(SmallRng::seed_from_u64(rng.gen())),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BugKind::Bug1 => "bug1",
            BugKind::Bug2 => "bug2",
        }
    }
}

impl fmt::Display for BugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a bug name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bug '{0}', expected bug1 or bug2")]
pub struct ParseBugKindError(pub String);

impl FromStr for BugKind {
    type Err = ParseBugKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bug1" | "greedy" => Ok(BugKind::Bug1),
            "bug2" | "random" => Ok(BugKind::Bug2),
            _ => Err(ParseBugKindError(s.to_string())),
        }
    }
}

/// A move policy: proposes one candidate cell per tick.
///
/// Neither policy looks ahead or backtracks; a blocked candidate is handled
/// by the engine as a stall.
#[derive(Debug, Clone)]
pub enum Policy {
    /// Bug1: step by `sign(goal - current)` on both axes at once.
    Greedy,
    /// Bug2: step by independent uniform draws from {-1, 0, 1} on each axis.
    RandomWalk(SmallRng),
}

impl Policy {
    pub fn random_walk(rng: SmallRng) -> Self {
        Policy::RandomWalk(rng)
    }

    pub fn kind(&self) -> BugKind {
        match self {
            Policy::Greedy => BugKind::Bug1,
            Policy::RandomWalk(_) => BugKind::Bug2,
        }
    }

    /// Proposes the next cell from `current`. The random walk ignores `goal`.
    pub fn move_to(&mut self, current: Position, goal: Position) -> Position {
        match self {
            Policy::Greedy => {
                let dx = (goal.x - current.x).signum();
                let dy = (goal.y - current.y).signum();
                current.offset(dx, dy)
            }
            Policy::RandomWalk(rng) => {
                let dx = rng.gen_range(-1..=1);
                let dy = rng.gen_range(-1..=1);
                current.offset(dx, dy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_moves_diagonally_first() {
        let mut policy = Policy::Greedy;
        let here = Position::new(5, 5);
        assert_eq!(policy.move_to(here, Position::new(9, 1)), Position::new(6, 4));
        assert_eq!(policy.move_to(here, Position::new(5, 0)), Position::new(5, 4));
        assert_eq!(policy.move_to(here, Position::new(0, 5)), Position::new(4, 5));
        assert_eq!(policy.move_to(here, here), here);
    }

    #[test]
    fn random_walk_stays_within_one_cell() {
        let mut policy = Policy::random_walk(SmallRng::seed_from_u64(3));
        let here = Position::new(10, 10);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let next = policy.move_to(here, Position::new(0, 0));
            assert!(here.is_adjacent_or_same(next));
            seen.insert(next);
        }
        // All nine offsets show up, including standing still.
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn bug_kind_parsing() {
        assert_eq!("bug1".parse::<BugKind>(), Ok(BugKind::Bug1));
        assert_eq!("Greedy".parse::<BugKind>(), Ok(BugKind::Bug1));
        assert_eq!(" bug2 ".parse::<BugKind>(), Ok(BugKind::Bug2));
        assert_eq!("random".parse::<BugKind>(), Ok(BugKind::Bug2));
        assert!("bug3".parse::<BugKind>().is_err());
        assert_eq!(BugKind::Bug2.to_string(), "bug2");
    }

    #[test]
    fn make_policy_matches_kind() {
        let mut rng = SmallRng::seed_from_u64(9);
        assert_eq!(BugKind::Bug1.make_policy(&mut rng).kind(), BugKind::Bug1);
        assert_eq!(BugKind::Bug2.make_policy(&mut rng).kind(), BugKind::Bug2);
    }
}
