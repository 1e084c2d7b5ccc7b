use core::fmt;

/// A single position on a [Grid](crate::grid::Grid). The identity (`row`, `col`, `index`) never
/// changes after construction and `obstacle` is fixed once the grid is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub index: usize,
    pub obstacle: bool,
}

impl Cell {
    /// Creates the free cell at `index` on a grid with the given side length.
    pub fn new(index: usize, side: usize) -> Cell {
        Cell {
            row: index / side,
            col: index % side,
            index,
            obstacle: false,
        }
    }
    pub fn is_free(&self) -> bool {
        !self.obstacle
    }
    /// Whether `other` lies in the Moore neighbourhood of this cell.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.index != other.index
            && self.row.abs_diff(other.row) <= 1
            && self.col.abs_diff(other.col) <= 1
    }
    /// Straight-line distance treating (row, col) as Cartesian coordinates.
    pub fn distance(&self, other: &Cell) -> f64 {
        euclidean_distance(self, other)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Euclidean distance between two cells. Serves both as the A* heuristic and as the cost of a
/// single move, which is 1 for cardinal and sqrt(2) for diagonal steps.
pub fn euclidean_distance(a: &Cell, b: &Cell) -> f64 {
    let d_row = a.row as f64 - b.row as f64;
    let d_col = a.col as f64 - b.col as f64;
    (d_row * d_row + d_col * d_col).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_maps_to_row_and_col() {
        let side = 7;
        for index in 0..side * side {
            let cell = Cell::new(index, side);
            assert_eq!(cell.row * side + cell.col, index);
            assert!(cell.col < side);
            assert!(cell.is_free());
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let side = 5;
        for i in 0..side * side {
            for j in 0..side * side {
                let a = Cell::new(i, side);
                let b = Cell::new(j, side);
                assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
            }
        }
    }

    #[test]
    fn unit_step_costs() {
        let side = 3;
        let center = Cell::new(4, side);
        assert_eq!(center.distance(&Cell::new(1, side)), 1.0);
        assert_eq!(center.distance(&Cell::new(5, side)), 1.0);
        assert!((center.distance(&Cell::new(0, side)) - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert_eq!(center.distance(&center), 0.0);
    }

    #[test]
    fn adjacency_excludes_self_and_wraparound() {
        let side = 4;
        // (0, 3) and (1, 0) are consecutive indices but not neighbours
        let end_of_row = Cell::new(3, side);
        let start_of_next = Cell::new(4, side);
        assert!(!end_of_row.is_adjacent(&start_of_next));
        assert!(!end_of_row.is_adjacent(&end_of_row));
        assert!(end_of_row.is_adjacent(&Cell::new(6, side)));
    }
}
