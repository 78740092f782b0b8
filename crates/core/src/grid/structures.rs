//! Urban structures and the registry that places them on the grid
//!
//! A structure is an axis-aligned rectangle of cells with a construction
//! material and its own fire-progression state. The registry owns all
//! structures plus an index grid mapping each cell to the structure covering
//! it. Footprints never overlap, so every cell has at most one owner.

use crate::core_types::material::HouseMaterial;
use crate::core_types::state::UrbanState;
use crate::core_types::units::{Meters, Minutes};
use crate::error::{Result, SimulationError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rectangular footprint `[y0, y1) × [x0, x1)` in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub y0: usize,
    pub x0: usize,
    /// Exclusive end row
    pub y1: usize,
    /// Exclusive end column
    pub x1: usize,
}

impl Footprint {
    /// Footprint spanning from corner `(y0, x0)` up to, not including, `(y1, x1)`
    pub const fn new(y0: usize, x0: usize, y1: usize, x1: usize) -> Self {
        Self { y0, x0, y1, x1 }
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    #[inline]
    pub const fn cols(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    /// Area in cells
    #[inline]
    pub const fn area(&self) -> usize {
        self.rows() * self.cols()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.area() == 0
    }

    #[inline]
    pub const fn contains(&self, y: usize, x: usize) -> bool {
        y >= self.y0 && y < self.y1 && x >= self.x0 && x < self.x1
    }

    /// Geometric centre in continuous cell-centre coordinates `(y, x)`
    ///
    /// Cell `(i, j)` has its centre at `(i, j)`, so a single-cell footprint
    /// is centred on itself.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.y0 + self.y1) as f64 / 2.0 - 0.5,
            (self.x0 + self.x1) as f64 / 2.0 - 0.5,
        )
    }

    /// Characteristic size `d`: square root of the physical footprint area
    pub fn characteristic_size(&self, cell_length: Meters) -> Meters {
        Meters::new((self.area() as f64).sqrt() * *cell_length)
    }

    /// Iterate over the covered cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y0..self.y1).flat_map(move |y| (self.x0..self.x1).map(move |x| (y, x)))
    }
}

/// Cumulative minutes after ignition at which a burning structure moves on
/// to the next stage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DwellTimes {
    /// SU1 → SU2
    pub t12: Minutes,
    /// SU2 → SU3
    pub t23: Minutes,
    /// SU3 → SU4
    pub t34: Minutes,
    /// SU4 → SU5
    pub t45: Minutes,
}

impl DwellTimes {
    /// Draw thresholds for one ignition episode
    ///
    /// The early stages do not depend on material; the breakout and burnout
    /// stages last longer for more fire-resistant construction. Draws are
    /// integer minutes taken in the order t12, t23, t34, t45.
    pub fn draw<R: Rng>(material: HouseMaterial, rng: &mut R) -> Self {
        let t12 = rng.random_range(4..=6_u32);
        let t23 = rng.random_range(5..=8_u32);
        let t34 = rng.random_range(material.breakout_dwell());
        let t45 = rng.random_range(material.burnout_dwell());
        Self {
            t12: Minutes::new(f64::from(t12)),
            t23: Minutes::new(f64::from(t23)),
            t34: Minutes::new(f64::from(t34)),
            t45: Minutes::new(f64::from(t45)),
        }
    }

    /// Threshold that must be reached to leave `state`, if it has one
    pub fn threshold_for(&self, state: UrbanState) -> Option<Minutes> {
        match state {
            UrbanState::SU1 => Some(self.t12),
            UrbanState::SU2 => Some(self.t23),
            UrbanState::SU3 => Some(self.t34),
            UrbanState::SU4 => Some(self.t45),
            UrbanState::SU0 | UrbanState::SU5 => None,
        }
    }
}

/// A house on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub footprint: Footprint,
    pub material: HouseMaterial,
    pub state: UrbanState,
    /// Minutes since the current ignition episode began
    pub time_in_state: Minutes,
    /// Stage thresholds of the current ignition episode
    pub dwell: DwellTimes,
}

impl Structure {
    /// Unignited structure
    pub fn new(footprint: Footprint, material: HouseMaterial) -> Self {
        Self {
            footprint,
            material,
            state: UrbanState::SU0,
            time_in_state: Minutes::ZERO,
            dwell: DwellTimes::default(),
        }
    }

    /// Start an ignition episode: fresh thresholds, clock reset, state set to `entry`
    pub(crate) fn ignite<R: Rng>(&mut self, entry: UrbanState, rng: &mut R) {
        self.dwell = DwellTimes::draw(self.material, rng);
        self.time_in_state = Minutes::ZERO;
        self.state = entry;
    }

    /// Advance the episode clock by `dt` and move up at most one stage
    ///
    /// Returns `true` if the state changed.
    pub(crate) fn progress(&mut self, dt: Minutes) -> bool {
        if !self.state.is_burning() {
            return false;
        }
        self.time_in_state += dt;
        match self.dwell.threshold_for(self.state) {
            Some(threshold) if self.time_in_state >= threshold => {
                self.state = self.state.next();
                true
            }
            _ => false,
        }
    }
}

/// All structures of a scenario plus the cell → owner index
#[derive(Debug, Clone, PartialEq)]
pub struct StructureRegistry {
    width: usize,
    height: usize,
    structures: Vec<Structure>,
    owners: Vec<Option<usize>>,
}

impl StructureRegistry {
    /// Place structures on an `height × width` grid
    ///
    /// Structure ids are positions in `structures`.
    ///
    /// # Errors
    ///
    /// Rejects empty footprints, footprints that leave the grid, and any two
    /// footprints sharing a cell.
    pub fn new(height: usize, width: usize, structures: Vec<Structure>) -> Result<Self> {
        let mut owners = vec![None; height * width];

        for (id, structure) in structures.iter().enumerate() {
            let fp = structure.footprint;
            if fp.is_empty() {
                return Err(SimulationError::EmptyFootprint { structure: id });
            }
            if fp.y1 > height || fp.x1 > width {
                return Err(SimulationError::FootprintOutOfBounds { structure: id });
            }
            for (y, x) in fp.cells() {
                let slot = &mut owners[y * width + x];
                if let Some(first) = *slot {
                    return Err(SimulationError::OverlappingStructures {
                        first,
                        second: id,
                        y,
                        x,
                    });
                }
                *slot = Some(id);
            }
        }

        Ok(Self {
            width,
            height,
            structures,
            owners,
        })
    }

    /// Registry with no structures
    pub fn empty(height: usize, width: usize) -> Self {
        Self {
            width,
            height,
            structures: Vec::new(),
            owners: vec![None; height * width],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Structure> {
        self.structures.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut Structure> {
        self.structures.get_mut(id)
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub(crate) fn structures_mut(&mut self) -> &mut [Structure] {
        &mut self.structures
    }

    /// Id of the structure covering `(y, x)`, if any
    pub fn owner(&self, y: usize, x: usize) -> Option<usize> {
        if y < self.height && x < self.width {
            self.owners[y * self.width + x]
        } else {
            None
        }
    }

    /// Id of the structure covering the row-major cell `idx`, if any
    #[inline]
    pub fn owner_at(&self, idx: usize) -> Option<usize> {
        self.owners.get(idx).copied().flatten()
    }

    /// Number of structures that have been ignited
    pub fn burning_count(&self) -> usize {
        self.structures.iter().filter(|s| s.state.is_burning()).count()
    }
}
