//! Forest fuel grid
//!
//! Row-major `H×W` storage of forest-cell states plus the two per-cell
//! accumulators the transition rules need: the exposure sum `C` (grows while
//! a cell is dormant next to flame) and the remaining ignition latency
//! (finite only while a cell is pre-ignition).
//!
//! Coordinates are `(y, x)`: row first, row 0 at the northern edge.

use crate::core_types::compass::Direction;
use crate::core_types::state::ForestState;
use crate::core_types::units::{Meters, Minutes};
use crate::error::{Result, SimulationError};

/// Forest-state grid with exposure and ignition-delay fields
#[derive(Debug, Clone, PartialEq)]
pub struct ForestGrid {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) cell_length: Meters,
    /// Fire-progression state per cell
    pub(crate) states: Vec<ForestState>,
    /// Accumulated exposure `C` (dimensionless, ignition at 1.0)
    pub(crate) exposure: Vec<f64>,
    /// Remaining pre-ignition latency in minutes (`INFINITY` when not pending)
    pub(crate) ignition_delay: Vec<f64>,
}

impl ForestGrid {
    /// Build a grid from caller-supplied masks
    ///
    /// A cell is burnable when it is forest and not incombustible. Burnable
    /// cells start `Dormant`, everything else is `Unburnable` for the run.
    ///
    /// # Arguments
    ///
    /// * `height`, `width` - Grid dimensions in cells
    /// * `cell_length` - Physical side length of one cell
    /// * `forest_mask` - Row-major forest flags, `height * width` long
    /// * `incombustible_mask` - Row-major incombustible flags, `height * width` long
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-sized grid, a non-positive cell length, or
    /// a mask whose length does not match the grid.
    pub fn new(
        height: usize,
        width: usize,
        cell_length: Meters,
        forest_mask: &[bool],
        incombustible_mask: &[bool],
    ) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(SimulationError::EmptyGrid { height, width });
        }
        if !cell_length.is_finite() || *cell_length <= 0.0 {
            return Err(SimulationError::InvalidCellLength);
        }
        let expected = height * width;
        for (mask, actual) in [
            ("forest", forest_mask.len()),
            ("incombustible", incombustible_mask.len()),
        ] {
            if actual != expected {
                return Err(SimulationError::MaskDimensionMismatch {
                    mask,
                    expected,
                    actual,
                });
            }
        }

        let states = forest_mask
            .iter()
            .zip(incombustible_mask)
            .map(|(&forest, &incombustible)| {
                if forest && !incombustible {
                    ForestState::Dormant
                } else {
                    ForestState::Unburnable
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            cell_length,
            states,
            exposure: vec![0.0; expected],
            ignition_delay: vec![f64::INFINITY; expected],
        })
    }

    /// Build a grid where every cell is burnable forest
    ///
    /// # Errors
    ///
    /// Same conditions as [`ForestGrid::new`] for dimensions and cell length.
    pub fn all_burnable(height: usize, width: usize, cell_length: Meters) -> Result<Self> {
        let forest = vec![true; height * width];
        let incombustible = vec![false; height * width];
        Self::new(height, width, cell_length, &forest, &incombustible)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Physical side length of a cell
    #[inline]
    pub fn cell_length(&self) -> Meters {
        self.cell_length
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Row-major index of `(y, x)`. Caller guarantees bounds.
    #[inline]
    pub fn index(&self, y: usize, x: usize) -> usize {
        y * self.width + x
    }

    /// `(y, x)` of a row-major index
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx / self.width, idx % self.width)
    }

    /// Whether signed coordinates fall on the grid
    #[inline]
    pub fn contains(&self, y: isize, x: isize) -> bool {
        y >= 0 && x >= 0 && (y as usize) < self.height && (x as usize) < self.width
    }

    /// Row-major index of `(y, x)`, or an out-of-bounds error
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::CellOutOfBounds`] when `(y, x)` is off the grid.
    pub fn checked_index(&self, y: usize, x: usize) -> Result<usize> {
        if y < self.height && x < self.width {
            Ok(self.index(y, x))
        } else {
            Err(SimulationError::CellOutOfBounds {
                y,
                x,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Index of the neighbour of `idx` in `direction`, if it is on the grid
    #[inline]
    pub fn neighbor(&self, idx: usize, direction: Direction) -> Option<usize> {
        let (y, x) = self.coords(idx);
        let (dy, dx) = direction.offset();
        let ny = y as isize + dy;
        let nx = x as isize + dx;
        self.contains(ny, nx)
            .then(|| self.index(ny as usize, nx as usize))
    }

    /// State of cell `(y, x)`
    ///
    /// # Panics
    ///
    /// Panics if `(y, x)` is outside the grid.
    #[inline]
    pub fn state(&self, y: usize, x: usize) -> ForestState {
        assert!(y < self.height && x < self.width, "Coordinates out of bounds");
        self.states[self.index(y, x)]
    }

    /// All states in row-major order
    #[inline]
    pub fn states(&self) -> &[ForestState] {
        &self.states
    }

    /// Accumulated exposure of cell `(y, x)`
    #[inline]
    pub fn exposure(&self, y: usize, x: usize) -> f64 {
        self.exposure[self.index(y, x)]
    }

    /// Remaining ignition latency of cell `(y, x)`; `None` unless pre-ignition
    pub fn ignition_delay(&self, y: usize, x: usize) -> Option<Minutes> {
        let delay = self.ignition_delay[self.index(y, x)];
        delay.is_finite().then_some(Minutes::new(delay))
    }

    /// Whether the cell carries fuel at all
    #[inline]
    pub fn is_burnable(&self, y: usize, x: usize) -> bool {
        self.state(y, x) != ForestState::Unburnable
    }

    /// Number of cells currently in `state`
    pub fn count(&self, state: ForestState) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    /// Move a dormant cell to pre-ignition with the given latency
    pub(crate) fn enter_pre_ignition(&mut self, idx: usize, delay: Minutes) {
        debug_assert_eq!(self.states[idx], ForestState::Dormant);
        self.states[idx] = ForestState::PreIgnition;
        self.ignition_delay[idx] = *delay;
    }

    /// Flame a cell: exposure is spent and any pending latency cleared
    pub(crate) fn activate(&mut self, idx: usize) {
        self.states[idx] = ForestState::Active;
        self.exposure[idx] = 0.0;
        self.ignition_delay[idx] = f64::INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_define_burnable_cells() {
        let forest = [true, true, false, true];
        let incombustible = [false, true, false, false];
        let grid = ForestGrid::new(2, 2, Meters::new(10.0), &forest, &incombustible).unwrap();

        assert_eq!(grid.state(0, 0), ForestState::Dormant);
        assert_eq!(grid.state(0, 1), ForestState::Unburnable);
        assert_eq!(grid.state(1, 0), ForestState::Unburnable);
        assert_eq!(grid.state(1, 1), ForestState::Dormant);
        assert_eq!(grid.count(ForestState::Dormant), 2);
        assert!(grid.ignition_delay(0, 0).is_none());
    }

    #[test]
    fn test_rejects_wrong_mask_length() {
        let err = ForestGrid::new(2, 3, Meters::new(10.0), &[true; 6], &[false; 5]).unwrap_err();
        assert_eq!(
            err,
            SimulationError::MaskDimensionMismatch {
                mask: "incombustible",
                expected: 6,
                actual: 5,
            }
        );
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        assert!(matches!(
            ForestGrid::all_burnable(0, 4, Meters::new(10.0)),
            Err(SimulationError::EmptyGrid { .. })
        ));
        assert_eq!(
            ForestGrid::all_burnable(4, 4, Meters::new(0.0)).unwrap_err(),
            SimulationError::InvalidCellLength
        );
    }

    #[test]
    fn test_neighbor_respects_edges() {
        let grid = ForestGrid::all_burnable(3, 4, Meters::new(10.0)).unwrap();
        let corner = grid.index(0, 0);
        assert_eq!(grid.neighbor(corner, Direction::North), None);
        assert_eq!(grid.neighbor(corner, Direction::West), None);
        assert_eq!(grid.neighbor(corner, Direction::SouthEast), Some(grid.index(1, 1)));

        let edge = grid.index(2, 3);
        assert_eq!(grid.neighbor(edge, Direction::East), None);
        assert_eq!(grid.neighbor(edge, Direction::NorthWest), Some(grid.index(1, 2)));
    }

    #[test]
    fn test_checked_index() {
        let grid = ForestGrid::all_burnable(3, 4, Meters::new(10.0)).unwrap();
        assert_eq!(grid.checked_index(2, 3), Ok(11));
        assert!(matches!(
            grid.checked_index(3, 0),
            Err(SimulationError::CellOutOfBounds { y: 3, x: 0, .. })
        ));
    }
}
