//! Simulation driver
//!
//! `Simulation` owns the forest grid, the structure registry and the random
//! stream for one run. Spread rates, timestep, fire regime and ember zones
//! are derived once at construction from the (constant) weather; each
//! [`Simulation::step`] then runs the forest engine followed by the urban
//! engine.

mod config;
mod snapshot;

pub use config::{SimulationConfig, StructureIgnition};
pub use snapshot::Snapshot;

use crate::core_types::state::{ForestState, UrbanState};
use crate::core_types::units::Minutes;
use crate::core_types::weather::Environment;
use crate::error::{Result, SimulationError};
use crate::grid::{ForestGrid, Structure, StructureRegistry};
use crate::physics::{FireRegime, SpreadRates};
use crate::solver::{step_forest, UrbanEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// One wildland-urban fire run
#[derive(Debug, Clone)]
pub struct Simulation {
    forest: ForestGrid,
    registry: StructureRegistry,
    environment: Environment,
    config: SimulationConfig,
    rng: ChaCha8Rng,

    // Run constants
    rates: SpreadRates,
    regime: FireRegime,
    urban: UrbanEngine,

    elapsed: Minutes,
    steps: u64,
}

impl Simulation {
    /// Set up a run over `forest` and `registry` under fixed weather
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::RegistryDimensionMismatch`] when the
    /// registry was built for a different grid size, and
    /// [`SimulationError::NonFiniteWeather`] when a weather scalar is
    /// infinite or NaN.
    pub fn new(
        forest: ForestGrid,
        registry: StructureRegistry,
        environment: Environment,
        config: SimulationConfig,
    ) -> Result<Self> {
        if registry.height() != forest.height() || registry.width() != forest.width() {
            return Err(SimulationError::RegistryDimensionMismatch {
                registry_height: registry.height(),
                registry_width: registry.width(),
                grid_height: forest.height(),
                grid_width: forest.width(),
            });
        }
        environment.validate()?;

        let rates = SpreadRates::compute(&environment, forest.cell_length(), &config.spread);
        let regime = FireRegime::classify(rates.max, &config.spotting);
        let urban = UrbanEngine::new(
            &registry,
            &environment,
            forest.cell_length(),
            regime,
            config.spotting,
            config.structure_ignition.entry_state(),
        );

        info!(
            "Simulation initialized: {}x{} grid, L={}, R0={}, Rmax={}, dt={}, regime={:?}, heading={:?}, {} structures, seed={}",
            forest.height(),
            forest.width(),
            forest.cell_length(),
            rates.base,
            rates.max,
            rates.timestep,
            regime,
            urban.heading(),
            registry.len(),
            config.seed
        );

        Ok(Self {
            forest,
            registry,
            environment,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            rates,
            regime,
            urban,
            elapsed: Minutes::ZERO,
            steps: 0,
        })
    }

    /// Set a forest cell flaming
    ///
    /// Dormant and pre-ignition cells become active with their exposure
    /// cleared. Cells that are already burning or burned are left alone.
    ///
    /// # Errors
    ///
    /// [`SimulationError::CellOutOfBounds`] off the grid,
    /// [`SimulationError::CellNotBurnable`] on a cell without fuel.
    pub fn ignite_forest(&mut self, y: usize, x: usize) -> Result<()> {
        let idx = self.forest.checked_index(y, x)?;
        match self.forest.states[idx] {
            ForestState::Unburnable => Err(SimulationError::CellNotBurnable { y, x }),
            ForestState::Dormant | ForestState::PreIgnition => {
                self.forest.activate(idx);
                info!("Forest ignited at ({}, {})", y, x);
                Ok(())
            }
            ForestState::Active | ForestState::Consumed | ForestState::Extinguished => Ok(()),
        }
    }

    /// Set structure `id` on fire
    ///
    /// Draws its dwell times and puts it in the configured entry stage. A
    /// structure that is already burning is left alone.
    ///
    /// # Errors
    ///
    /// [`SimulationError::UnknownStructure`] when `id` is not in the registry.
    pub fn ignite_structure(&mut self, id: usize) -> Result<()> {
        let entry = self.urban.entry_state();
        let structure = self
            .registry
            .get_mut(id)
            .ok_or(SimulationError::UnknownStructure { id })?;
        if structure.state == UrbanState::SU0 {
            structure.ignite(entry, &mut self.rng);
            info!("Structure {} ignited, entering {:?}", id, entry);
        }
        Ok(())
    }

    /// Advance one timestep: forest transitions, then urban progression and
    /// cross-ignition
    pub fn step(&mut self) {
        let forest = step_forest(&mut self.forest, &self.rates);
        let urban = self
            .urban
            .step(&mut self.forest, &mut self.registry, &self.rates, &mut self.rng);

        self.elapsed += self.rates.timestep;
        self.steps += 1;

        debug!(
            "Step {}: t={}, active={}, pre-ignition={}, consumed={}, extinguished={}, +{} cells heated by houses, +{} structures ignited, {} burning",
            self.steps,
            self.elapsed,
            self.forest.count(ForestState::Active),
            self.forest.count(ForestState::PreIgnition),
            forest.consumed,
            self.forest.count(ForestState::Extinguished),
            urban.house_to_forest,
            urban.structures_ignited(),
            self.registry.burning_count()
        );
    }

    /// Step until `budget` minutes have been covered, recording a snapshot
    /// after every step
    ///
    /// Always runs the full budget; a fire that has died out keeps producing
    /// (unchanging) snapshots. The budget is measured from the current
    /// elapsed time, snapshot times are absolute.
    pub fn run(&mut self, budget: Minutes) -> Vec<Snapshot> {
        let dt = self.rates.timestep;
        let mut covered = Minutes::ZERO;
        let mut snapshots = Vec::new();

        while covered < budget {
            self.step();
            covered += dt;
            snapshots.push(self.snapshot());
        }

        info!(
            "Run finished: {} snapshots, t={}, {} cells burned, {} of {} structures ignited",
            snapshots.len(),
            self.elapsed,
            self.forest.states().iter().filter(|s| s.has_ignited()).count(),
            self.registry.burning_count(),
            self.registry.len()
        );

        snapshots
    }

    /// Independent copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.elapsed,
            height: self.forest.height(),
            width: self.forest.width(),
            forest: self.forest.states().to_vec(),
            structures: self.registry.structures().to_vec(),
        }
    }

    pub fn forest(&self) -> &ForestGrid {
        &self.forest
    }

    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    pub fn structures(&self) -> &[Structure] {
        self.registry.structures()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spread rates derived at construction
    pub fn spread_rates(&self) -> &SpreadRates {
        &self.rates
    }

    /// Fixed step length
    pub fn timestep(&self) -> Minutes {
        self.rates.timestep
    }

    pub fn regime(&self) -> FireRegime {
        self.regime
    }

    /// Total simulated time
    pub fn elapsed(&self) -> Minutes {
        self.elapsed
    }

    /// Steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
