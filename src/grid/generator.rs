//! Random map generation.

use rand::Rng;

use super::{Grid, GridError};

/// Generates a `width` x `height` grid where every cell is independently
/// blocked with probability `obstacle_probability`.
///
/// No connectivity guarantee is made; callers that need a reachable goal
/// must check with the pathfinder.
pub fn generate(
    width: usize,
    height: usize,
    obstacle_probability: f64,
    rng: &mut impl Rng,
) -> Result<Grid, GridError> {
    if !(0.0..=1.0).contains(&obstacle_probability) {
        return Err(GridError::InvalidProbability(obstacle_probability));
    }
    let mut grid = Grid::new(width, height)?;

    for x in 0..width as i32 {
        for y in 0..height as i32 {
            if rng.gen::<f64>() < obstacle_probability {
                grid.set_obstacle(x, y, true);
            }
        }
    }

    Ok(grid)
}
