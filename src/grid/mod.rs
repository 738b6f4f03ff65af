//! Obstacle map representation.
//!
//! A [`Grid`] is a fixed-size rectangle of free and blocked cells. Queries
//! outside the rectangle report "obstacle" instead of failing, so movement
//! code never needs a separate bounds check.

pub mod generator;
pub mod position;

pub use generator::generate;
pub use position::Position;

/// Errors raised while constructing a grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyDimension { width: usize, height: usize },

    #[error("grid dimensions {width}x{height} exceed the coordinate range")]
    TooLarge { width: usize, height: usize },

    #[error("obstacle probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
}

/// Rectangular obstacle map.
///
/// Cells are stored row-major in a flat vector indexed by `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    obstacles: Vec<bool>,
}

impl Grid {
    /// Creates an obstacle-free grid.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimension { width, height });
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(GridError::TooLarge { width, height });
        }
        Ok(Grid {
            width,
            height,
            obstacles: vec![false; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Returns true if `(x, y)` is blocked or outside the grid.
    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(idx) => self.obstacles[idx],
            None => true,
        }
    }

    /// Marks or clears an obstacle. Out-of-bounds coordinates are ignored.
    pub fn set_obstacle(&mut self, x: i32, y: i32, blocked: bool) {
        if let Some(idx) = self.index(x, y) {
            self.obstacles[idx] = blocked;
        }
    }

    /// Convenience form of [`Grid::is_obstacle`] taking a [`Position`].
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.is_obstacle(pos.x, pos.y)
    }

    /// Returns true if `pos` is inside the grid and not blocked.
    pub fn is_free(&self, pos: Position) -> bool {
        !self.is_blocked(pos)
    }

    /// All free cells in row-major order.
    pub fn free_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.obstacles[y * self.width + x] {
                    cells.push(Position::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    /// Number of blocked cells.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.iter().filter(|&&b| b).count()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}
