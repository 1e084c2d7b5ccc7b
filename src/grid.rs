use crate::cell::Cell;
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::{MAX_SIDE, MIN_SIDE};
use core::fmt;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use rand::Rng;
use smallvec::SmallVec;

/// A square grid of `side * side` [Cell]s with a source and a goal. Cells are stored row-major so
/// that `index = row * side + col`. The topology never changes after construction; a new scenario
/// means a new [Grid].
///
/// Connected components of the free cells under 8-neighbour movement are computed once on
/// construction and kept in a [UnionFind] structure for reachability queries.
#[derive(Clone, Debug)]
pub struct Grid {
    side: usize,
    cells: Vec<Cell>,
    source: usize,
    goal: usize,
    components: UnionFind<usize>,
}

/// Validates the side length and returns the number of cells.
pub(crate) fn check_side(side: usize) -> Result<usize> {
    if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
        return Err(GridError::invalid(format!(
            "side length must lie in {MIN_SIDE}..={MAX_SIDE}, got {side}"
        )));
    }
    side.checked_mul(side).ok_or_else(|| {
        GridError::invalid(format!("{side}x{side} cells overflow usize"))
    })
}

fn make_cells(side: usize, n_cells: usize) -> Vec<Cell> {
    (0..n_cells).map(|ix| Cell::new(ix, side)).collect()
}

impl Grid {
    /// Generates a random scenario. The source is drawn uniformly, then the goal is redrawn until
    /// it differs from the source, and only then are obstacle candidates drawn so that both
    /// endpoints can be kept free. Candidates are drawn with replacement, so the resulting
    /// density is somewhat below `obstacle_density`.
    pub fn random<R: Rng + ?Sized>(
        side: usize,
        obstacle_density: f64,
        rng: &mut R,
    ) -> Result<Grid> {
        let config = GridConfig::new(side, obstacle_density);
        let n_cells = config.cell_count()?;
        let source = rng.gen_range(0..n_cells);
        let mut goal = rng.gen_range(0..n_cells);
        while goal == source {
            goal = rng.gen_range(0..n_cells);
        }
        let candidates = (0..config.obstacle_draws_for(n_cells))
            .map(|_| rng.gen_range(0..n_cells))
            .collect::<Vec<usize>>();
        let grid = Grid::build(side, n_cells, source, goal, candidates);
        info!(
            "Generated {}x{} grid with source {}, goal {} and {} obstacles",
            side,
            side,
            grid.source(),
            grid.goal(),
            grid.obstacle_count()
        );
        Ok(grid)
    }

    /// Builds a grid from explicit indices. Obstacle indices equal to the source or goal are
    /// ignored, mirroring random generation.
    pub fn from_parts<I>(side: usize, source: usize, goal: usize, obstacles: I) -> Result<Grid>
    where
        I: IntoIterator<Item = usize>,
    {
        let n_cells = check_side(side)?;
        if source >= n_cells || goal >= n_cells {
            return Err(GridError::invalid(format!(
                "source {source} and goal {goal} must lie in 0..{n_cells}"
            )));
        }
        if source == goal {
            return Err(GridError::invalid("source and goal must differ"));
        }
        let obstacles = obstacles.into_iter().collect::<Vec<usize>>();
        if let Some(ix) = obstacles.iter().find(|&&ix| ix >= n_cells) {
            return Err(GridError::invalid(format!(
                "obstacle index {ix} outside of 0..{n_cells}"
            )));
        }
        Ok(Grid::build(side, n_cells, source, goal, obstacles))
    }

    /// Assumes validated input.
    fn build(
        side: usize,
        n_cells: usize,
        source: usize,
        goal: usize,
        obstacles: Vec<usize>,
    ) -> Grid {
        let mut cells = make_cells(side, n_cells);
        for ix in obstacles {
            if ix != source && ix != goal {
                cells[ix].obstacle = true;
            }
        }
        let mut grid = Grid {
            side,
            components: UnionFind::new(cells.len()),
            cells,
            source,
            goal,
        };
        grid.generate_components();
        grid
    }

    pub fn side(&self) -> usize {
        self.side
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.side && col < self.side {
            self.cells.get(row * self.side + col)
        } else {
            None
        }
    }
    pub fn source(&self) -> &Cell {
        &self.cells[self.source]
    }
    pub fn goal(&self) -> &Cell {
        &self.cells[self.goal]
    }
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.obstacle).count()
    }

    /// Returns the cell at a possibly out-of-range index if it exists and is free.
    fn free_cell(&self, ix: isize) -> Option<Cell> {
        usize::try_from(ix)
            .ok()
            .and_then(|ix| self.cells.get(ix))
            .filter(|c| c.is_free())
            .copied()
    }

    /// The free Moore neighbours of `cell`. Left-side candidates are skipped in the first column
    /// and right-side candidates in the last column so that no move wraps around to another row;
    /// the top and bottom rows are handled by discarding indices outside the grid.
    ///
    /// Order matters for tie-breaking during search: up-left, left, down-left, up-right, right,
    /// down-right, up, down.
    pub fn neighbours(&self, cell: &Cell) -> SmallVec<[Cell; 8]> {
        let n = self.side as isize;
        let ix = cell.index as isize;
        let mut candidates: SmallVec<[isize; 8]> = SmallVec::new();
        if cell.col != 0 {
            candidates.extend([ix - n - 1, ix - 1, ix + n - 1]);
        }
        if cell.col != self.side - 1 {
            candidates.extend([ix - n + 1, ix + 1, ix + n + 1]);
        }
        candidates.extend([ix - n, ix + n]);
        candidates
            .into_iter()
            .filter_map(|c| self.free_cell(c))
            .collect()
    }

    /// Links up free neighbouring cells into the same component.
    fn generate_components(&mut self) {
        let mut components = UnionFind::new(self.cells.len());
        for cell in self.cells.iter().filter(|c| c.is_free()) {
            for neighbour in self.neighbours(cell) {
                components.union(cell.index, neighbour.index);
            }
        }
        self.components = components;
        debug!("Generated connected components for {} cells", self.cells.len());
    }

    /// Retrieves the component id of the cell at `index`.
    pub fn get_component(&self, index: usize) -> Option<usize> {
        (index < self.cells.len()).then(|| self.components.find(index))
    }

    /// Checks if two free cells are on the same connected component.
    pub fn reachable(&self, from: usize, to: usize) -> bool {
        match (self.cell(from), self.cell(to)) {
            (Some(a), Some(b)) if a.is_free() && b.is_free() => self.components.equiv(from, to),
            _ => false,
        }
    }

    /// Checks if the goal can be reached from the source at all.
    pub fn goal_reachable(&self) -> bool {
        self.reachable(self.source, self.goal)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.side) {
            for cell in row {
                let c = if cell.index == self.source {
                    'S'
                } else if cell.index == self.goal {
                    'G'
                } else if cell.obstacle {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
