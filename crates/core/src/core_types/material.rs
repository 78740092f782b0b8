//! House construction materials
//!
//! Material drives two things: how readily embers ignite the structure
//! (susceptibility) and how long each late fire stage lasts once it burns.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Construction material category of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HouseMaterial {
    /// Untreated timber
    #[default]
    Wood,
    /// Timber treated with fire retardant
    FireRetardantWood,
    /// Masonry / non-combustible cladding
    Fireproof,
}

impl HouseMaterial {
    /// All material variants
    pub const ALL: [HouseMaterial; 3] = [
        HouseMaterial::Wood,
        HouseMaterial::FireRetardantWood,
        HouseMaterial::Fireproof,
    ];

    /// Ignition susceptibility coefficient `P_material` in `(0, 1]`
    pub const fn susceptibility(self) -> f64 {
        match self {
            HouseMaterial::Wood => 1.0,
            HouseMaterial::FireRetardantWood => 0.8,
            HouseMaterial::Fireproof => 0.6,
        }
    }

    /// Range (minutes since ignition) for the SU3→SU4 threshold
    pub const fn breakout_dwell(self) -> RangeInclusive<u32> {
        match self {
            HouseMaterial::Wood => 10..=20,
            HouseMaterial::FireRetardantWood => 20..=30,
            HouseMaterial::Fireproof => 30..=40,
        }
    }

    /// Range (minutes since ignition) for the SU4→SU5 threshold
    pub const fn burnout_dwell(self) -> RangeInclusive<u32> {
        match self {
            HouseMaterial::Wood => 20..=30,
            HouseMaterial::FireRetardantWood => 30..=40,
            HouseMaterial::Fireproof => 50..=60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_susceptibility_decreases_with_resistance() {
        assert!(HouseMaterial::Wood.susceptibility() > HouseMaterial::FireRetardantWood.susceptibility());
        assert!(
            HouseMaterial::FireRetardantWood.susceptibility() > HouseMaterial::Fireproof.susceptibility()
        );
        for material in HouseMaterial::ALL {
            let p = material.susceptibility();
            assert!(p > 0.0 && p <= 1.0);
        }
    }

    #[test]
    fn test_resistant_materials_burn_longer() {
        for pair in HouseMaterial::ALL.windows(2) {
            assert!(pair[1].breakout_dwell().start() >= pair[0].breakout_dwell().start());
            assert!(pair[1].burnout_dwell().start() > pair[0].burnout_dwell().start());
        }
    }
}
