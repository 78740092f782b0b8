//! Per-step state capture
//!
//! The driver records one [`Snapshot`] after every step. Snapshots are the
//! input to the arrival-time map and to any external rendering.

use crate::core_types::state::ForestState;
use crate::core_types::units::Minutes;
use crate::grid::Structure;
use serde::{Deserialize, Serialize};

/// Full copy of the simulation state after one step
///
/// Owns its data; nothing aliases the live simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Elapsed simulation time at the end of the step
    pub time: Minutes,
    pub height: usize,
    pub width: usize,
    /// Row-major forest states
    pub forest: Vec<ForestState>,
    /// Structures, indexed by id
    pub structures: Vec<Structure>,
}

impl Snapshot {
    /// Forest state of `(y, x)`, `None` off the grid
    pub fn state_at(&self, y: usize, x: usize) -> Option<ForestState> {
        if y < self.height && x < self.width {
            self.forest.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// Number of cells in `state`
    pub fn count(&self, state: ForestState) -> usize {
        self.forest.iter().filter(|&&s| s == state).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_count() {
        let snapshot = Snapshot {
            time: Minutes::new(2.5),
            height: 2,
            width: 2,
            forest: vec![
                ForestState::Active,
                ForestState::Dormant,
                ForestState::Dormant,
                ForestState::Unburnable,
            ],
            structures: Vec::new(),
        };
        assert_eq!(snapshot.state_at(0, 0), Some(ForestState::Active));
        assert_eq!(snapshot.state_at(1, 1), Some(ForestState::Unburnable));
        assert_eq!(snapshot.state_at(0, 2), None);
        assert_eq!(snapshot.count(ForestState::Dormant), 2);
        assert_eq!(snapshot.count(ForestState::Consumed), 0);
    }
}
