//! Run configuration
//!
//! Everything here has a sensible default; a scenario usually only sets the
//! seed and perhaps the structure ignition policy.

use crate::core_types::state::UrbanState;
use crate::physics::{SpottingParameters, SpreadParameters};
use serde::{Deserialize, Serialize};

/// Stage a structure enters when it catches fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StructureIgnition {
    /// Straight to SU3, the first stage that throws embers
    #[default]
    Transmitting,
    /// SU1, working through the full sequence before transmitting
    Progressive,
}

impl StructureIgnition {
    /// Urban state a newly ignited structure is set to
    #[must_use]
    pub const fn entry_state(self) -> UrbanState {
        match self {
            Self::Transmitting => UrbanState::SU3,
            Self::Progressive => UrbanState::SU1,
        }
    }
}

/// Tunables for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for the run's random stream
    pub seed: u64,
    /// Entry stage for structure ignition
    pub structure_ignition: StructureIgnition,
    /// Spread rate and timestep selection
    pub spread: SpreadParameters,
    /// Ember zones and transmission severities
    pub spotting: SpottingParameters,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            structure_ignition: StructureIgnition::default(),
            spread: SpreadParameters::default(),
            spotting: SpottingParameters::default(),
        }
    }
}

impl SimulationConfig {
    /// Default configuration with a specific seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}
