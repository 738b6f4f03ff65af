//! Breadth-first shortest paths on an 8-connected grid.
//!
//! The BFS path is the optimality reference every bug is measured against.
//! Cardinal and diagonal moves cost the same, and diagonal moves may pass
//! between two blocked orthogonal neighbours.

use std::collections::VecDeque;

use crate::grid::{Grid, Position};

/// Neighbour offsets: the four cardinal directions first, then the diagonals.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const NO_PARENT: usize = usize::MAX;

/// Finds a shortest path from `start` to `goal`, both inclusive.
///
/// Returns `None` when the goal is unreachable or either endpoint is
/// blocked. When several shortest paths exist, which one is returned depends
/// on [`DIRECTIONS`] order; only the length is meaningful.
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Option<Vec<Position>> {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return None;
    }

    let width = grid.width();
    let cell_count = width * grid.height();
    let index = |p: Position| p.y as usize * width + p.x as usize;

    let mut visited = vec![false; cell_count];
    let mut parent = vec![NO_PARENT; cell_count];
    let mut queue = VecDeque::new();

    visited[index(start)] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return Some(reconstruct(&parent, goal, width));
        }

        for &(dx, dy) in DIRECTIONS.iter() {
            let next = current.offset(dx, dy);
            if grid.is_blocked(next) {
                continue;
            }
            let idx = index(next);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            parent[idx] = index(current);
            queue.push_back(next);
        }
    }

    None
}

/// Length (node count, endpoints included) of the shortest path, if any.
pub fn optimal_length(grid: &Grid, start: Position, goal: Position) -> Option<usize> {
    find_path(grid, start, goal).map(|path| path.len())
}

fn reconstruct(parent: &[usize], goal: Position, width: usize) -> Vec<Position> {
    let mut path = Vec::new();
    let mut idx = goal.y as usize * width + goal.x as usize;
    loop {
        path.push(Position::new((idx % width) as i32, (idx / width) as i32));
        idx = parent[idx];
        if idx == NO_PARENT {
            break;
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(width: usize, height: usize) -> Grid {
        Grid::new(width, height).unwrap()
    }

    fn assert_connected(path: &[Position]) {
        for pair in path.windows(2) {
            assert!(
                pair[0].chebyshev(pair[1]) == 1,
                "non-adjacent step {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn diagonal_path_on_open_grid() {
        let grid = open(10, 10);
        let path = find_path(&grid, Position::new(0, 0), Position::new(5, 5)).unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path[0], Position::new(0, 0));
        assert_eq!(path[5], Position::new(5, 5));
        assert_connected(&path);
    }

    #[test]
    fn start_equals_goal() {
        let grid = open(3, 3);
        let p = Position::new(1, 1);
        assert_eq!(find_path(&grid, p, p), Some(vec![p]));
    }

    #[test]
    fn wall_forces_detour() {
        // Vertical wall at x = 2 with a gap at y = 4.
        let mut grid = open(5, 5);
        for y in 0..4 {
            grid.set_obstacle(2, y, true);
        }
        let path = find_path(&grid, Position::new(0, 0), Position::new(4, 0)).unwrap();
        assert_connected(&path);
        assert!(path.iter().all(|p| grid.is_free(*p)));
        assert!(path.contains(&Position::new(2, 4)));
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn diagonal_squeeze_is_allowed() {
        let mut grid = open(2, 2);
        grid.set_obstacle(1, 0, true);
        grid.set_obstacle(0, 1, true);
        let path = find_path(&grid, Position::new(0, 0), Position::new(1, 1)).unwrap();
        assert_eq!(path, vec![Position::new(0, 0), Position::new(1, 1)]);
    }

    #[test]
    fn walled_in_start_has_no_path() {
        let mut grid = open(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                if (x, y) != (2, 2) {
                    grid.set_obstacle(x, y, true);
                }
            }
        }
        grid.set_obstacle(4, 4, false);
        assert_eq!(find_path(&grid, Position::new(2, 2), Position::new(4, 4)), None);
    }

    #[test]
    fn blocked_endpoints_have_no_path() {
        let mut grid = open(4, 4);
        grid.set_obstacle(3, 3, true);
        assert_eq!(find_path(&grid, Position::new(0, 0), Position::new(3, 3)), None);
        assert_eq!(find_path(&grid, Position::new(3, 3), Position::new(0, 0)), None);
        assert_eq!(find_path(&grid, Position::new(0, 0), Position::new(9, 9)), None);
    }

    #[test]
    fn optimal_length_counts_nodes() {
        let grid = open(20, 5);
        assert_eq!(
            optimal_length(&grid, Position::new(0, 0), Position::new(12, 3)),
            Some(13)
        );
    }
}
