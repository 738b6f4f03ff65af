//! Random trial setup.
//!
//! Picks a map, a start and a goal such that the goal is reachable and the
//! optimal path is long enough to be a real challenge. Goal sampling is
//! bounded per map; a map that cannot produce an admissible goal is thrown
//! away and regenerated.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::grid::{self, Grid, GridError, Position};
use crate::pathfinding::find_path;

/// Parameters for random scenario generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Smallest map side, inclusive.
    pub min_size: usize,
    /// Largest map side, inclusive.
    pub max_size: usize,
    /// Per-cell obstacle probability.
    pub obstacle_probability: f64,
    /// Minimum optimal path length (node count) for an admissible goal.
    pub min_optimal_len: usize,
    /// Goal samples tried on one map before regenerating it.
    pub goal_attempts: usize,
    /// Maps generated before giving up.
    pub map_attempts: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            min_size: 20,
            max_size: 60,
            obstacle_probability: 0.01,
            min_optimal_len: 10,
            goal_attempts: 1000,
            map_attempts: 100,
        }
    }
}

/// Errors from scenario generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error("invalid map size range {min}..={max}")]
    InvalidSizeRange { min: usize, max: usize },

    #[error("no admissible start/goal pair found after {map_attempts} generated maps")]
    NoAdmissibleScenario { map_attempts: usize },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A ready-to-run trial: map, endpoints and the optimal reference path.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub grid: Arc<Grid>,
    pub start: Position,
    pub goal: Position,
    pub optimal_path: Vec<Position>,
}

impl Scenario {
    /// Node count of the optimal path.
    pub fn optimal_len(&self) -> usize {
        self.optimal_path.len()
    }
}

/// Generates a random scenario. Map size is drawn uniformly from
/// `min_size..=max_size` on each axis.
pub fn generate_scenario(
    config: &ScenarioConfig,
    rng: &mut impl Rng,
) -> Result<Scenario, ScenarioError> {
    if config.min_size == 0 || config.min_size > config.max_size {
        return Err(ScenarioError::InvalidSizeRange {
            min: config.min_size,
            max: config.max_size,
        });
    }

    for attempt in 0..config.map_attempts {
        let width = rng.gen_range(config.min_size..=config.max_size);
        let height = rng.gen_range(config.min_size..=config.max_size);
        let grid = grid::generate(width, height, config.obstacle_probability, rng)?;

        match pick_endpoints(&grid, config, rng) {
            Some((start, goal, optimal_path)) => {
                return Ok(Scenario {
                    grid: Arc::new(grid),
                    start,
                    goal,
                    optimal_path,
                });
            }
            None => {
                debug!(attempt, width, height, "map has no admissible goal, regenerating");
            }
        }
    }

    warn!(
        map_attempts = config.map_attempts,
        "scenario generation exhausted its map budget"
    );
    Err(ScenarioError::NoAdmissibleScenario {
        map_attempts: config.map_attempts,
    })
}

/// Picks a random free start and then samples goals until one is admissible
/// or the goal budget runs out.
pub fn pick_endpoints(
    grid: &Grid,
    config: &ScenarioConfig,
    rng: &mut impl Rng,
) -> Option<(Position, Position, Vec<Position>)> {
    let free = grid.free_cells();
    if free.len() < 2 {
        return None;
    }
    let start = free[rng.gen_range(0..free.len())];

    for _ in 0..config.goal_attempts {
        let goal = free[rng.gen_range(0..free.len())];
        if goal == start {
            continue;
        }
        if let Some(path) = find_path(grid, start, goal) {
            if path.len() >= config.min_optimal_len {
                return Some((start, goal, path));
            }
        }
    }

    None
}
