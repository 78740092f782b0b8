//! Shared helpers for integration tests

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use wui_fire_core::{
    Environment, ForestGrid, ForestState, Meters, Simulation, SimulationConfig, Snapshot,
    Structure, StructureRegistry,
};

/// Route engine logs through the test harness; `RUST_LOG` overrides the level
#[ctor::ctor]
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Square all-burnable grid of 10 m cells with the given structures
pub fn square_scenario(
    size: usize,
    structures: Vec<Structure>,
    environment: Environment,
    config: SimulationConfig,
) -> Simulation {
    let forest = ForestGrid::all_burnable(size, size, Meters::new(10.0)).unwrap();
    let registry = StructureRegistry::new(size, size, structures).unwrap();
    Simulation::new(forest, registry, environment, config).unwrap()
}

/// Panic if any cell's forest state ever goes backwards
pub fn assert_forest_monotone(snapshots: &[Snapshot]) {
    for pair in snapshots.windows(2) {
        for (idx, (before, after)) in pair[0].forest.iter().zip(&pair[1].forest).enumerate() {
            assert!(
                after >= before,
                "cell {} regressed from {:?} to {:?} at t={}",
                idx,
                before,
                after,
                pair[1].time
            );
        }
    }
}

/// Every burnable cell of the snapshot has finished burning
pub fn fully_burned(snapshot: &Snapshot) -> bool {
    snapshot.forest.iter().all(|s| {
        matches!(
            s,
            ForestState::Unburnable | ForestState::Consumed | ForestState::Extinguished
        )
    })
}
