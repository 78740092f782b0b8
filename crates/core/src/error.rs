//! Error type for scenario construction and caller-supplied arguments
//!
//! Everything that can go wrong is caught before the first step: bad masks,
//! overlapping footprints, non-finite weather, coordinates off the grid. The stepping loop itself
//! has no failure paths.

use thiserror::Error;

/// Errors returned by grid construction, registry construction and the
/// ignition operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("grid must have at least one row and one column (got {height}x{width})")]
    EmptyGrid { height: usize, width: usize },

    #[error("cell length must be finite and positive")]
    InvalidCellLength,

    #[error("weather {field} must be finite")]
    NonFiniteWeather { field: &'static str },

    #[error("{mask} mask has {actual} cells, expected {expected}")]
    MaskDimensionMismatch {
        mask: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cell ({y}, {x}) is outside the {height}x{width} grid")]
    CellOutOfBounds {
        y: usize,
        x: usize,
        height: usize,
        width: usize,
    },

    #[error("cell ({y}, {x}) holds no burnable fuel")]
    CellNotBurnable { y: usize, x: usize },

    #[error("structure {structure} has an empty footprint")]
    EmptyFootprint { structure: usize },

    #[error("structure {structure} footprint extends past the grid edge")]
    FootprintOutOfBounds { structure: usize },

    #[error("structures {first} and {second} both cover cell ({y}, {x})")]
    OverlappingStructures {
        first: usize,
        second: usize,
        y: usize,
        x: usize,
    },

    #[error("no structure with id {id}")]
    UnknownStructure { id: usize },

    #[error("structure registry is {registry_height}x{registry_width} but forest grid is {grid_height}x{grid_width}")]
    RegistryDimensionMismatch {
        registry_height: usize,
        registry_width: usize,
        grid_height: usize,
        grid_width: usize,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SimulationError>;
