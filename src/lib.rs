//! Bugbench library.
//!
//! Grid model, BFS reference paths, the bug navigation engine with its move
//! policies, tick drivers for interactive runs, and the marathon batch
//! evaluator. Rendering and map files are left to consumers of these
//! modules.

pub mod bug;
pub mod grid;
pub mod marathon;
pub mod pathfinding;
pub mod scenario;
pub mod simulation;
pub mod stats;
