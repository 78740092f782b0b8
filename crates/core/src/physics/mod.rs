//! Physics modules: spread rate / timestep and ember spotting

pub mod spotting;
pub mod spread_rate;

pub use spotting::{
    candidate_cells, transmission_probability, FireRegime, SpotEllipse, SpotKernel,
    SpottingParameters,
};
pub use spread_rate::{
    base_rate, directional_rates, ignition_latency, timestep, SpreadCorrections, SpreadParameters,
    SpreadRates,
};
