//! Grid-based state: forest fuel and urban structures

pub mod forest_grid;
pub mod structures;

// Re-export main types
pub use forest_grid::ForestGrid;
pub use structures::{DwellTimes, Footprint, Structure, StructureRegistry};
