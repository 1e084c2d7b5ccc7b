//! # grid_astar
//!
//! Step-wise [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) on square grids with
//! 8-neighbour movement. A [Grid] is generated with a random source, goal and scattered
//! obstacles, after which [AStar] expands one cell per [step](AStar::step) so that a front end can
//! animate the search. Move costs and the heuristic are both the
//! [Euclidean distance](https://en.wikipedia.org/wiki/Euclidean_distance), which keeps the
//! heuristic consistent and the returned paths optimal.
//!
//! ```
//! use grid_astar::{find_path, Grid};
//!
//! // |S..|
//! // |.#.|
//! // |..G|
//! let grid = Grid::from_parts(3, 0, 8, [4]).unwrap();
//! let path = find_path(&grid).unwrap();
//! assert_eq!(path.indices(), vec![0, 1, 5, 8]);
//! ```
pub mod astar;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod path;

pub use astar::{find_path, AStar, SearchNode, SearchObserver, Step};
pub use cell::{euclidean_distance, Cell};
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use grid::Grid;
pub use path::{path_cost, Path};

/// Smallest side length for which a source and a distinct goal exist.
pub const MIN_SIDE: usize = 2;
/// Largest accepted side length, keeping `side * side` cells allocatable and every cell index
/// representable as an `isize` offset.
pub const MAX_SIDE: usize = 1 << 12;
pub const DEFAULT_SIDE: usize = 20;
/// Roughly half of the cells become obstacles.
pub const DEFAULT_OBSTACLE_DENSITY: f64 = 0.5;
