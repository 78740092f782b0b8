//! Urban progression and cross-ignition engine
//!
//! Runs after the forest step. Order within one step:
//!
//! 1. every burning structure advances its episode clock (one stage max);
//! 2. the structures now in SU3/SU4 become this step's ember sources;
//! 3. house → house: sources by ascending id, targets by ascending id,
//!    one uniform draw per unignited target;
//! 4. house → forest: dormant cells in a source's ember zone go straight
//!    to pre-ignition;
//! 5. forest → house: every flaming cell, row-major, checks the
//!    structures inside its (shared) ember kernel.
//!
//! A structure ignited in step 3 or 5 is not a source until the next step.

use crate::core_types::compass::Direction;
use crate::core_types::state::{ForestState, UrbanState};
use crate::core_types::units::Meters;
use crate::core_types::weather::{Environment, WeatherType};
use crate::grid::{ForestGrid, StructureRegistry};
use crate::physics::{
    candidate_cells, transmission_probability, FireRegime, SpotEllipse, SpotKernel,
    SpottingParameters, SpreadRates,
};
use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Counts of what happened in one urban step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrbanTransitions {
    /// Structures that moved up a stage
    pub progressed: usize,
    /// Structures ignited by embers from another structure
    pub house_to_house: usize,
    /// Forest cells pushed to pre-ignition by burning structures
    pub house_to_forest: usize,
    /// Structures ignited by embers from flaming forest
    pub forest_to_house: usize,
}

impl UrbanTransitions {
    /// Structures ignited this step from any source
    pub fn structures_ignited(&self) -> usize {
        self.house_to_house + self.forest_to_house
    }
}

/// Ember zones and run constants for the urban step
///
/// Footprints, wind and cell size are fixed for a run, so every structure's
/// candidate cells and the forest kernel are resolved once up front.
#[derive(Debug, Clone)]
pub struct UrbanEngine {
    heading: Direction,
    house_zones: Vec<Vec<usize>>,
    forest_kernel: SpotKernel,
    forest_severity: f64,
    spotting: SpottingParameters,
    weather: WeatherType,
    entry: UrbanState,
}

impl UrbanEngine {
    pub fn new(
        registry: &StructureRegistry,
        environment: &Environment,
        cell_length: Meters,
        regime: FireRegime,
        spotting: SpottingParameters,
        entry: UrbanState,
    ) -> Self {
        let heading = Direction::from_bearing(environment.wind_direction);

        let house_zones = registry
            .structures()
            .iter()
            .map(|structure| {
                let d = structure.footprint.characteristic_size(cell_length);
                let ellipse = SpotEllipse::for_structure(environment.wind_speed, d);
                candidate_cells(
                    &ellipse,
                    structure.footprint.center(),
                    heading,
                    registry.height(),
                    registry.width(),
                    cell_length,
                )
            })
            .collect();

        let forest_ellipse = SpotEllipse::for_forest(
            environment.wind_speed,
            cell_length,
            spotting.reach_factor(regime),
        );

        Self {
            heading,
            house_zones,
            forest_kernel: SpotKernel::new(&forest_ellipse, heading, cell_length),
            forest_severity: spotting.forest_severity(regime),
            spotting,
            weather: environment.weather,
            entry,
        }
    }

    /// Octant embers are carried toward
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Stage a structure enters when it catches fire
    pub fn entry_state(&self) -> UrbanState {
        self.entry
    }

    /// Candidate cells of structure `id`'s ember zone
    pub fn house_zone(&self, id: usize) -> &[usize] {
        self.house_zones.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn forest_kernel(&self) -> &SpotKernel {
        &self.forest_kernel
    }

    /// Run one urban step against the post-forest-step grid
    pub fn step<R: Rng>(
        &self,
        grid: &mut ForestGrid,
        registry: &mut StructureRegistry,
        rates: &SpreadRates,
        rng: &mut R,
    ) -> UrbanTransitions {
        let mut transitions = UrbanTransitions::default();

        for structure in registry.structures_mut() {
            if structure.progress(rates.timestep) {
                transitions.progressed += 1;
            }
        }

        let sources: Vec<(usize, f64)> = registry
            .structures()
            .iter()
            .enumerate()
            .filter_map(|(id, s)| self.spotting.structure_severity(s.state).map(|p| (id, p)))
            .collect();

        for &(source, severity) in &sources {
            let hits = tally_targets(self.house_zone(source).iter().copied(), registry);
            for (target, cells) in hits {
                if self.try_ignite(registry, target, cells, severity, rng) {
                    trace!(source, target, "structure ignited by structure");
                    transitions.house_to_house += 1;
                }
            }
        }

        for &(source, _) in &sources {
            for &idx in self.house_zone(source) {
                if grid.states[idx] == ForestState::Dormant {
                    grid.enter_pre_ignition(idx, rates.ignition_latency);
                    trace!(source, cell = idx, "forest cell heated by structure");
                    transitions.house_to_forest += 1;
                }
            }
        }

        if !registry.is_empty() {
            let (height, width) = (grid.height(), grid.width());
            let flaming: Vec<usize> = grid
                .states()
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == ForestState::Active)
                .map(|(idx, _)| idx)
                .collect();

            for idx in flaming {
                let (y, x) = grid.coords(idx);
                let zone = self.forest_kernel.cells_around(y, x, height, width);
                for (target, cells) in tally_targets(zone, registry) {
                    if self.try_ignite(registry, target, cells, self.forest_severity, rng) {
                        trace!(cell = idx, target, "structure ignited by forest");
                        transitions.forest_to_house += 1;
                    }
                }
            }
        }

        transitions
    }

    /// One ember check against structure `target`, `cells` of whose footprint
    /// lie in the source's zone
    ///
    /// Draws only when the target is still unignited.
    fn try_ignite<R: Rng>(
        &self,
        registry: &mut StructureRegistry,
        target: usize,
        cells: usize,
        severity: f64,
        rng: &mut R,
    ) -> bool {
        let Some(structure) = registry.get_mut(target) else {
            return false;
        };
        if structure.state != UrbanState::SU0 {
            return false;
        }

        let coverage = cells as f64 / structure.footprint.area() as f64;
        let p = transmission_probability(structure.material, self.weather, severity, coverage);
        if rng.random::<f64>() < p {
            structure.ignite(self.entry, rng);
            true
        } else {
            false
        }
    }
}

/// Structures touched by a set of candidate cells, with how many of their
/// cells were hit, sorted by structure id
fn tally_targets<I>(cells: I, registry: &StructureRegistry) -> Vec<(usize, usize)>
where
    I: IntoIterator<Item = usize>,
{
    let mut hits: FxHashMap<usize, usize> = FxHashMap::default();
    for idx in cells {
        if let Some(owner) = registry.owner_at(idx) {
            *hits.entry(owner).or_insert(0) += 1;
        }
    }
    let mut hits: Vec<(usize, usize)> = hits.into_iter().collect();
    hits.sort_unstable_by_key(|&(id, _)| id);
    hits
}
