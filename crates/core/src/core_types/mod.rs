//! Core types and utilities

pub mod compass;
pub mod material;
pub mod state;
pub mod units;
pub mod weather;

pub use compass::Direction;
pub use material::HouseMaterial;
pub use state::{ForestState, UrbanState};
pub use units::*;
pub use weather::{Environment, WeatherType};
