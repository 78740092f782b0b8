//! Fire-progression states for forest cells and urban structures

use serde::{Deserialize, Serialize};

/// Fire-progression state of a forest cell
///
/// Variants are declared in progression order so the derived `Ord` matches
/// the direction of travel: a burnable cell only ever moves to a greater
/// state. `Unburnable` sorts first and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ForestState {
    /// No fuel (outside the forest mask or incombustible)
    Unburnable,
    /// Unburned fuel (SF0)
    Dormant,
    /// Heated, waiting out the ignition latency (SF1)
    PreIgnition,
    /// Flaming (SF2)
    Active,
    /// Fire front has passed, one-tick transient (SF3)
    Consumed,
    /// Burned out, terminal (SF4)
    Extinguished,
}

impl ForestState {
    /// Whether the cell still holds fuel the front has not reached
    #[inline]
    pub fn is_unburned(self) -> bool {
        matches!(self, ForestState::Dormant | ForestState::PreIgnition)
    }

    /// Whether the cell has reached flaming combustion at some point
    #[inline]
    pub fn has_ignited(self) -> bool {
        self >= ForestState::Active
    }
}

/// Fire-progression state of an urban structure
///
/// `SU0` is unignited, `SU5` fully burned out. `SU3` and `SU4` throw embers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UrbanState {
    /// Not ignited
    SU0,
    /// Incipient fire
    SU1,
    /// Developing fire
    SU2,
    /// Fire breaks out of the envelope, moderate ember shower
    SU3,
    /// Fully involved, intense ember shower
    SU4,
    /// Burned out / collapsed
    SU5,
}

impl UrbanState {
    /// Whether a structure in this state has been ignited
    #[inline]
    pub fn is_burning(self) -> bool {
        self >= UrbanState::SU1
    }

    /// Whether the structure currently spots embers onto its surroundings
    #[inline]
    pub fn is_transmitting(self) -> bool {
        matches!(self, UrbanState::SU3 | UrbanState::SU4)
    }

    /// Next state in the progression chain (`SU5` is terminal)
    pub fn next(self) -> UrbanState {
        match self {
            UrbanState::SU0 => UrbanState::SU1,
            UrbanState::SU1 => UrbanState::SU2,
            UrbanState::SU2 => UrbanState::SU3,
            UrbanState::SU3 => UrbanState::SU4,
            UrbanState::SU4 | UrbanState::SU5 => UrbanState::SU5,
        }
    }
}
