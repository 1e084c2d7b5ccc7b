//! Step-wise A* over a [Grid] with Euclidean move costs and heuristic.
//!
//! The open set is scanned linearly for the lowest f-score rather than kept in a heap. Ties go to
//! the cell that has been in the open set the longest, so the expansion order is fully determined
//! by the neighbour order of [Grid::neighbours]. Cells that have been closed are never reopened.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};

use crate::cell::{euclidean_distance, Cell};
use crate::grid::Grid;
use crate::path::Path;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Bookkeeping for a cell that has been discovered during a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchNode {
    pub g: f64,
    pub h: f64,
    pub f: f64,
    pub parent: Option<usize>,
    pub closed: bool,
}

impl SearchNode {
    fn new(g: f64, h: f64, parent: Option<usize>) -> SearchNode {
        SearchNode {
            g,
            h,
            f: g + h,
            parent,
            closed: false,
        }
    }
}

/// Outcome of a single call to [AStar::step].
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// The cell moved from the open to the closed set.
    Expanded(Cell),
    /// The goal was selected from the open set.
    Found(Path),
    /// The open set is empty, the goal cannot be reached.
    Exhausted,
}

/// Receives progress from [AStar::run_with]. Both hooks default to doing nothing.
pub trait SearchObserver {
    /// Called before every step; the place to pace an animation.
    fn on_step(&mut self) {}
    /// Called once per cell moving from open to closed, except for the source and the goal.
    fn on_closed(&mut self, _cell: &Cell) {}
}

impl SearchObserver for () {}

/// A single search run from the source to the goal of a [Grid]. All per-cell state lives here,
/// so any number of runs can borrow the same grid.
#[derive(Clone, Debug)]
pub struct AStar<'a> {
    grid: &'a Grid,
    open: FxIndexSet<usize>,
    nodes: FxIndexMap<usize, SearchNode>,
    expanded: usize,
}

impl<'a> AStar<'a> {
    pub fn new(grid: &'a Grid) -> AStar<'a> {
        let source = grid.source();
        let mut nodes = FxIndexMap::default();
        nodes.insert(
            source.index,
            SearchNode::new(0.0, euclidean_distance(source, grid.goal()), None),
        );
        let mut open = FxIndexSet::default();
        open.insert(source.index);
        AStar {
            grid,
            open,
            nodes,
            expanded: 0,
        }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }
    pub fn node(&self, index: usize) -> Option<&SearchNode> {
        self.nodes.get(&index)
    }
    pub fn is_open(&self, index: usize) -> bool {
        self.open.contains(&index)
    }
    pub fn is_closed(&self, index: usize) -> bool {
        self.nodes.get(&index).map_or(false, |n| n.closed)
    }
    /// Open cells in their current scan order.
    pub fn open_cells(&self) -> impl Iterator<Item = &'a Cell> + '_ {
        let grid = self.grid;
        self.open.iter().filter_map(move |&ix| grid.cell(ix))
    }
    /// Closed cells in the order they were discovered.
    pub fn closed_cells(&self) -> impl Iterator<Item = &'a Cell> + '_ {
        let grid = self.grid;
        self.nodes
            .iter()
            .filter(|(_, n)| n.closed)
            .filter_map(move |(&ix, _)| grid.cell(ix))
    }
    /// Number of cells closed so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    fn f_score(&self, index: usize) -> f64 {
        self.nodes.get(&index).map_or(f64::INFINITY, |n| n.f)
    }

    /// First open cell with the strictly lowest f-score.
    fn lowest_f(&self) -> Option<usize> {
        self.open.iter().copied().reduce(|best, ix| {
            if self.f_score(ix) < self.f_score(best) {
                ix
            } else {
                best
            }
        })
    }

    /// Follows parent links back from `index` and returns the cells in source to goal order.
    fn reconstruct_path(&self, index: usize) -> Path {
        let grid = self.grid;
        let mut cells: Vec<Cell> = std::iter::successors(Some(index), |ix| {
            self.nodes.get(ix).and_then(|n| n.parent)
        })
        .filter_map(|ix| grid.cell(ix).copied())
        .collect();
        cells.reverse();
        Path::new(cells, self.nodes.get(&index).map_or(0.0, |n| n.g))
    }

    /// Advances the search by one expansion. Calling it again after [Step::Found] or
    /// [Step::Exhausted] returns the same outcome.
    pub fn step(&mut self) -> Step {
        let grid = self.grid;
        let goal = grid.goal();
        let Some(current_ix) = self.lowest_f() else {
            return Step::Exhausted;
        };
        if current_ix == goal.index {
            return Step::Found(self.reconstruct_path(current_ix));
        }
        // Open indices always come from the grid itself
        let current = grid.cells()[current_ix];
        self.open.shift_remove(&current_ix);
        let current_g = match self.nodes.get_mut(&current_ix) {
            Some(node) => {
                node.closed = true;
                node.g
            }
            None => 0.0,
        };
        self.expanded += 1;
        debug!("Closed {} with g = {:.3}", current, current_g);

        for neighbour in grid.neighbours(&current) {
            let tentative_g = current_g + euclidean_distance(&current, &neighbour);
            match self.nodes.entry(neighbour.index) {
                Vacant(e) => {
                    let h = euclidean_distance(&neighbour, goal);
                    e.insert(SearchNode::new(tentative_g, h, Some(current_ix)));
                    self.open.insert(neighbour.index);
                }
                Occupied(mut e) => {
                    let node = e.get_mut();
                    if node.closed || tentative_g >= node.g {
                        continue;
                    }
                    *node = SearchNode::new(
                        tentative_g,
                        euclidean_distance(&neighbour, goal),
                        Some(current_ix),
                    );
                }
            }
        }
        Step::Expanded(current)
    }

    /// Runs the search to completion, reporting progress to `observer`. Returns [None] if the goal
    /// is unreachable.
    pub fn run_with<O>(&mut self, observer: &mut O) -> Option<Path>
    where
        O: SearchObserver + ?Sized,
    {
        let source = self.grid.source().index;
        loop {
            observer.on_step();
            match self.step() {
                Step::Expanded(cell) => {
                    if cell.index != source {
                        observer.on_closed(&cell);
                    }
                }
                Step::Found(path) => {
                    info!(
                        "Found path of {} cells with cost {:.3} after {} expansions",
                        path.len(),
                        path.cost(),
                        self.expanded
                    );
                    return Some(path);
                }
                Step::Exhausted => {
                    warn!(
                        "Open set exhausted after {} expansions, {} is not reachable from {}",
                        self.expanded,
                        self.grid.goal(),
                        self.grid.source()
                    );
                    return None;
                }
            }
        }
    }

    /// Runs the search to completion without observing it.
    pub fn run(&mut self) -> Option<Path> {
        self.run_with(&mut ())
    }
}

/// Computes the path from the source to the goal of `grid`, if there is one.
pub fn find_path(grid: &Grid) -> Option<Path> {
    AStar::new(grid).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use std::collections::HashSet;
    use std::f64::consts::SQRT_2;

    #[derive(Default)]
    struct Recorder {
        steps: usize,
        closed: Vec<usize>,
    }

    impl SearchObserver for Recorder {
        fn on_step(&mut self) {
            self.steps += 1;
        }
        fn on_closed(&mut self, cell: &Cell) {
            self.closed.push(cell.index);
        }
    }

    /// Optimal cost on an obstacle-free 8-grid.
    fn octile(a: &Cell, b: &Cell) -> f64 {
        let dr = a.row.abs_diff(b.row) as f64;
        let dc = a.col.abs_diff(b.col) as f64;
        SQRT_2 * dr.min(dc) + (dr - dc).abs()
    }

    #[test]
    fn diagonal_path_on_open_grid() {
        let grid = Grid::from_parts(3, 0, 8, []).unwrap();
        let path = find_path(&grid).unwrap();
        assert_eq!(path.indices(), vec![0, 4, 8]);
        assert!((path.cost() - 2.0 * SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn everything_blocked_has_no_path() {
        let grid = Grid::from_parts(3, 0, 8, 1..8).unwrap();
        let mut astar = AStar::new(&grid);
        assert!(astar.run().is_none());
        assert_eq!(astar.expanded(), 1);
        assert_eq!(astar.step(), Step::Exhausted);
    }

    #[test]
    fn enclosed_goal_has_no_path() {
        // |S....|
        // |.###.|
        // |.#G#.|
        // |.###.|
        // |.....|
        let grid = Grid::from_parts(5, 0, 12, [6, 7, 8, 11, 13, 16, 17, 18]).unwrap();
        let mut astar = AStar::new(&grid);
        assert!(astar.run().is_none());
        // Every free cell outside the ring gets expanded
        assert_eq!(astar.expanded(), 16);
        assert!(!astar.is_closed(12));
    }

    /// Walks through a scenario in which both f-score ties and an equal-cost alternative parent
    /// occur:
    ///  ___
    /// |S  |
    /// | # |
    /// |  G|
    ///  ___
    #[test]
    fn ties_resolve_by_open_order() {
        let grid = Grid::from_parts(3, 0, 8, [4]).unwrap();
        let mut astar = AStar::new(&grid);
        let mut order = Vec::new();
        let path = loop {
            match astar.step() {
                Step::Expanded(cell) => order.push(cell.index),
                Step::Found(path) => break path,
                Step::Exhausted => panic!("goal is reachable"),
            }
        };
        assert_eq!(order, vec![0, 1, 3, 5, 7]);
        // Reaching the goal from 7 costs the same as from 5, so the first parent is kept
        assert_eq!(path.indices(), vec![0, 1, 5, 8]);
        assert!((path.cost() - (2.0 + SQRT_2)).abs() < 1e-12);
    }

    #[test]
    fn open_grid_paths_are_optimal() {
        let mut rng = StdRng::seed_from_u64(0);
        for side in 2..12 {
            for _ in 0..20 {
                let grid = Grid::random(side, 0.0, &mut rng).unwrap();
                let path = find_path(&grid).unwrap();
                assert_eq!(path.first(), Some(grid.source()));
                assert_eq!(path.last(), Some(grid.goal()));
                assert!(path.is_contiguous());
                assert!(path.len() >= 2);
                assert!((path.cost() - octile(grid.source(), grid.goal())).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn closed_scores_are_frozen() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let grid = Grid::random(12, 0.5, &mut rng).unwrap();
            let mut astar = AStar::new(&grid);
            let mut frozen: Vec<(usize, f64)> = Vec::new();
            while let Step::Expanded(cell) = astar.step() {
                for &(ix, f) in &frozen {
                    assert_eq!(astar.node(ix).unwrap().f, f);
                }
                frozen.push((cell.index, astar.node(cell.index).unwrap().f));
            }
        }
    }

    #[test]
    fn observer_sees_each_intermediate_cell_once() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let grid = Grid::random(10, 0.4, &mut rng).unwrap();
            let mut astar = AStar::new(&grid);
            let mut recorder = Recorder::default();
            let found = astar.run_with(&mut recorder).is_some();
            let source = grid.source().index;
            let goal = grid.goal().index;
            assert!(!recorder.closed.contains(&source));
            assert!(!recorder.closed.contains(&goal));
            let unique = recorder.closed.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), recorder.closed.len());
            // The source is expanded but not reported
            assert_eq!(recorder.closed.len() + 1, astar.expanded());
            // One step per expansion plus the final one
            assert_eq!(recorder.steps, astar.expanded() + 1);
            assert_eq!(found, grid.goal_reachable());
        }
    }

    #[test]
    fn runs_over_the_same_grid_are_independent() {
        let mut rng = StdRng::seed_from_u64(6);
        let grid = Grid::random(15, 0.3, &mut rng).unwrap();
        let mut first = AStar::new(&grid);
        let mut second = AStar::new(&grid);
        second.step();
        assert_eq!(first.run(), second.run());
        assert_eq!(first.expanded(), second.expanded());
    }

    #[test]
    fn step_after_success_repeats_result() {
        let grid = Grid::from_parts(2, 0, 3, []).unwrap();
        let mut astar = AStar::new(&grid);
        assert_eq!(astar.step(), Step::Expanded(*grid.source()));
        let found = astar.step();
        assert!(matches!(found, Step::Found(_)));
        assert_eq!(astar.step(), found);
        assert!(astar.is_open(3));
        assert_eq!(astar.closed_cells().count(), 1);
        assert_eq!(astar.open_cells().count(), 3);
    }
}
