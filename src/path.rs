use crate::cell::{euclidean_distance, Cell};
use itertools::Itertools;

/// A path found by [AStar](crate::astar::AStar), ordered from the source to the goal with both
/// endpoints included.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    cells: Vec<Cell>,
    cost: f64,
}

/// Sum of the Euclidean step lengths along a sequence of cells.
pub fn path_cost(cells: &[Cell]) -> f64 {
    cells
        .iter()
        .tuple_windows()
        .map(|(a, b)| euclidean_distance(a, b))
        .sum()
}

impl Path {
    pub(crate) fn new(cells: Vec<Cell>, cost: f64) -> Path {
        Path { cells, cost }
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn indices(&self) -> Vec<usize> {
        self.cells.iter().map(|c| c.index).collect()
    }
    /// Accumulated g-score of the goal, i.e. the length of the path.
    pub fn cost(&self) -> f64 {
        self.cost
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    pub fn first(&self) -> Option<&Cell> {
        self.cells.first()
    }
    pub fn last(&self) -> Option<&Cell> {
        self.cells.last()
    }
    pub fn contains(&self, index: usize) -> bool {
        self.cells.iter().any(|c| c.index == index)
    }
    /// Whether every pair of consecutive cells are Moore neighbours.
    pub fn is_contiguous(&self) -> bool {
        self.cells
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.is_adjacent(b))
    }
}
