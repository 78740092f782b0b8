//! Time-to-fire map
//!
//! Reduces a snapshot sequence to, per cell, the first recorded time at which
//! the cell was flaming or already burned. Structure footprints are masked
//! out, since houses are reported through their own state instead.

use crate::core_types::units::Minutes;
use crate::simulation::Snapshot;
use serde::{Deserialize, Serialize};

/// Class edges used when colouring a time-to-fire map, in minutes
pub const ARRIVAL_BIN_EDGES: [f64; 16] = [
    0.0, 10.0, 15.0, 20.0, 25.0, 50.0, 60.0, 70.0, 80.0, 100.0, 200.0, 500.0, 700.0, 800.0,
    1500.0, 2500.0,
];

/// Index of the `[edge_i, edge_{i+1})` class holding `time`
///
/// `None` before the first edge or at/after the last one.
pub fn bin(time: Minutes) -> Option<usize> {
    let t = *time;
    ARRIVAL_BIN_EDGES
        .windows(2)
        .position(|edges| t >= edges[0] && t < edges[1])
}

/// Fire arrival at one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArrivalTime {
    /// First snapshot time the cell was active or later
    Reached(Minutes),
    /// Never burned within the recorded run
    Unreached,
    /// Covered by a structure footprint
    Structure,
}

impl ArrivalTime {
    pub fn minutes(self) -> Option<Minutes> {
        match self {
            Self::Reached(t) => Some(t),
            Self::Unreached | Self::Structure => None,
        }
    }
}

/// Per-cell fire arrival over a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalMap {
    pub height: usize,
    pub width: usize,
    /// Row-major
    pub cells: Vec<ArrivalTime>,
}

impl ArrivalMap {
    /// Build the map for a `height × width` grid from snapshots in time order
    pub fn from_snapshots(height: usize, width: usize, snapshots: &[Snapshot]) -> Self {
        let mut cells = vec![ArrivalTime::Unreached; height * width];

        for snapshot in snapshots {
            for (cell, state) in cells.iter_mut().zip(&snapshot.forest) {
                if *cell == ArrivalTime::Unreached && state.has_ignited() {
                    *cell = ArrivalTime::Reached(snapshot.time);
                }
            }
        }

        if let Some(first) = snapshots.first() {
            for structure in &first.structures {
                for (y, x) in structure.footprint.cells() {
                    if y < height && x < width {
                        cells[y * width + x] = ArrivalTime::Structure;
                    }
                }
            }
        }

        Self {
            height,
            width,
            cells,
        }
    }

    /// Arrival at `(y, x)`; panics off the grid
    pub fn get(&self, y: usize, x: usize) -> ArrivalTime {
        assert!(y < self.height && x < self.width, "cell ({y}, {x}) off the grid");
        self.cells[y * self.width + x]
    }

    /// Number of cells the fire reached
    pub fn reached_count(&self) -> usize {
        self.cells.iter().filter(|c| c.minutes().is_some()).count()
    }

    /// Latest arrival time on the map
    pub fn latest(&self) -> Option<Minutes> {
        self.cells.iter().filter_map(|c| c.minutes()).max()
    }
}
