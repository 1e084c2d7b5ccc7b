//! Scenario parameters for random grid generation.

use crate::error::{GridError, Result};
use crate::grid::{check_side, Grid};
use crate::{DEFAULT_OBSTACLE_DENSITY, DEFAULT_SIDE};
use rand::Rng;

/// Side length and obstacle density used to generate a random [Grid].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub side: usize,
    /// Fraction of the non-source cells drawn as obstacle candidates, in `[0, 1)`.
    pub obstacle_density: f64,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            side: DEFAULT_SIDE,
            obstacle_density: DEFAULT_OBSTACLE_DENSITY,
        }
    }
}

impl GridConfig {
    pub fn new(side: usize, obstacle_density: f64) -> GridConfig {
        GridConfig {
            side,
            obstacle_density,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.cell_count().map(|_| ())
    }

    /// Validates the configuration and returns the number of cells, `side^2`.
    pub fn cell_count(&self) -> Result<usize> {
        let n_cells = check_side(self.side)?;
        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(GridError::invalid(format!(
                "obstacle density must lie in [0, 1), got {}",
                self.obstacle_density
            )));
        }
        Ok(n_cells)
    }

    /// Number of obstacle candidates drawn, `floor(density * (side^2 - 1))`. Zero for a side
    /// length that does not validate.
    pub fn obstacle_draws(&self) -> usize {
        check_side(self.side).map_or(0, |n_cells| self.obstacle_draws_for(n_cells))
    }

    pub(crate) fn obstacle_draws_for(&self, n_cells: usize) -> usize {
        (self.obstacle_density * n_cells.saturating_sub(1) as f64).floor() as usize
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Grid> {
        Grid::random(self.side, self.obstacle_density, rng)
    }
}
