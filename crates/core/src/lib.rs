//! Wildland-urban interface fire simulation
//!
//! A cellular-automaton forest fire coupled to a set of structures on the
//! same grid. Forest cells burn through
//! `Dormant → PreIgnition → Active → Consumed → Extinguished` driven by
//! their flaming neighbours; structures burn through `SU0..SU5` on drawn
//! dwell times. Embers carried downwind link the two: burning houses ignite
//! other houses and heat nearby forest, flaming forest ignites houses.
//!
//! Weather is fixed for a run, so the spread rates, timestep and ember zones
//! are derived once when the [`Simulation`] is built. All randomness flows
//! through one seeded generator owned by the simulation, so a run is fully
//! reproducible from its seed.
//!
//! ```rust,ignore
//! use wui_fire_core::{
//!     Environment, ForestGrid, Meters, Minutes, Simulation, SimulationConfig, StructureRegistry,
//! };
//!
//! let forest = ForestGrid::all_burnable(10, 10, Meters::new(10.0))?;
//! let registry = StructureRegistry::empty(10, 10);
//! let mut sim = Simulation::new(forest, registry, Environment::default(), SimulationConfig::with_seed(1))?;
//! sim.ignite_forest(2, 2)?;
//! let snapshots = sim.run(Minutes::new(240.0));
//! ```

pub mod arrival_time;
pub mod core_types;
pub mod error;
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod solver;

pub use arrival_time::{ArrivalMap, ArrivalTime, ARRIVAL_BIN_EDGES};
pub use core_types::{
    Celsius, Degrees, Direction, Environment, ForestState, HouseMaterial, Meters,
    MetersPerMinute, MetersPerSecond, Minutes, Percent, UrbanState, WeatherType,
};
pub use error::{Result, SimulationError};
pub use grid::{DwellTimes, Footprint, ForestGrid, Structure, StructureRegistry};
pub use physics::{FireRegime, SpotEllipse, SpottingParameters, SpreadParameters, SpreadRates};
pub use simulation::{Simulation, SimulationConfig, Snapshot, StructureIgnition};
