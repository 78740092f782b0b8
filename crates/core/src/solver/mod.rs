//! Per-step state transition engines
//!
//! The driver runs [`step_forest`] first, then [`UrbanEngine::step`] against
//! the resulting grid.

pub mod forest;
pub mod urban;

pub use forest::{step_forest, ForestTransitions};
pub use urban::{UrbanEngine, UrbanTransitions};
