//! Integer cell coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on a grid. `x` is the column, `y` the row.
///
/// Coordinates are signed so that candidate moves off the edge of a map
/// (e.g. `x = -1`) can be expressed and then rejected by the grid query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev (king-move) distance, the number of 8-connected steps
    /// between two cells on an open grid.
    pub fn chebyshev(self, other: Position) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// Returns true if `other` is this cell or one of its 8 neighbours.
    pub fn is_adjacent_or_same(self, other: Position) -> bool {
        self.chebyshev(other) <= 1
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_takes_larger_axis() {
        let a = Position::new(0, 0);
        assert_eq!(a.chebyshev(Position::new(5, 5)), 5);
        assert_eq!(a.chebyshev(Position::new(7, -2)), 7);
        assert_eq!(a.chebyshev(Position::new(-1, 3)), 3);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn adjacency_includes_diagonals() {
        let c = Position::new(4, 4);
        assert!(c.is_adjacent_or_same(Position::new(5, 5)));
        assert!(c.is_adjacent_or_same(Position::new(3, 4)));
        assert!(c.is_adjacent_or_same(c));
        assert!(!c.is_adjacent_or_same(Position::new(6, 4)));
    }

    #[test]
    fn display_and_tuple_conversion() {
        let p: Position = (3, -1).into();
        assert_eq!(p, Position::new(3, -1));
        assert_eq!(p.to_string(), "(3, -1)");
        assert_eq!(p.offset(-3, 1), Position::new(0, 0));
    }
}
