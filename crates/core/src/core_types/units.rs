//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers keep metres, minutes and spread rates from being mixed up
//! at the public API. Internally the engine works on raw `f64` in metres and
//! minutes; every wrapper derefs to its inner value.
//!
//! # Usage
//! ```
//! use wui_fire_core::core_types::units::{Meters, MetersPerMinute, Minutes};
//!
//! let rate = MetersPerMinute::new(2.0);
//! let travel: Minutes = Meters::new(10.0) / rate;
//! assert!((*travel - 5.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Div, Mul};

/// Shared trait impls for an `f64` newtype: total ordering, deref, raw conversions
/// and a `Display` with the unit suffix.
macro_rules! unit_type {
    ($name:ident, $suffix:expr) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                Self(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2}{}", self.0, $suffix)
            }
        }
    };
}

// ============================================================================
// SPATIAL / TEMPORAL
// ============================================================================

/// Distance in metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

unit_type!(Meters, " m");

impl Meters {
    /// Create a new distance in metres
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Meters) -> Meters {
        Meters(self.0 + rhs.0)
    }
}

impl Mul<f64> for Meters {
    type Output = Meters;
    fn mul(self, rhs: f64) -> Meters {
        Meters(self.0 * rhs)
    }
}

/// Distance / rate = travel time
impl Div<MetersPerMinute> for Meters {
    type Output = Minutes;
    fn div(self, rhs: MetersPerMinute) -> Minutes {
        Minutes(self.0 / rhs.0)
    }
}

/// Simulated time in minutes
///
/// The engine clock, timesteps, ignition latencies and structure dwell times
/// all use this unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Minutes(f64);

unit_type!(Minutes, " min");

impl Minutes {
    /// Zero elapsed time
    pub const ZERO: Minutes = Minutes(0.0);

    /// Create a new duration in minutes
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Minutes(value)
    }

    /// Create a duration from seconds
    #[inline]
    #[must_use]
    pub fn from_seconds(seconds: f64) -> Self {
        Minutes(seconds / 60.0)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert to seconds
    #[inline]
    #[must_use]
    pub fn to_seconds(self) -> f64 {
        self.0 * 60.0
    }
}

impl Add for Minutes {
    type Output = Minutes;
    fn add(self, rhs: Minutes) -> Minutes {
        Minutes(self.0 + rhs.0)
    }
}

impl AddAssign for Minutes {
    fn add_assign(&mut self, rhs: Minutes) {
        self.0 += rhs.0;
    }
}

impl Mul<f64> for Minutes {
    type Output = Minutes;
    fn mul(self, rhs: f64) -> Minutes {
        Minutes(self.0 * rhs)
    }
}

// ============================================================================
// VELOCITY
// ============================================================================

/// Fire spread rate in metres per minute
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerMinute(f64);

unit_type!(MetersPerMinute, " m/min");

impl MetersPerMinute {
    /// Create a new rate. Negative values are allowed: the empirical base-rate
    /// fit goes below zero in cold, calm, humid conditions.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerMinute(value)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Mul<f64> for MetersPerMinute {
    type Output = MetersPerMinute;
    fn mul(self, rhs: f64) -> MetersPerMinute {
        MetersPerMinute(self.0 * rhs)
    }
}

/// Rate × time = distance
impl Mul<Minutes> for MetersPerMinute {
    type Output = Meters;
    fn mul(self, rhs: Minutes) -> Meters {
        Meters(self.0 * rhs.0)
    }
}

/// Wind speed in metres per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

unit_type!(MetersPerSecond, " m/s");

impl MetersPerSecond {
    /// Create a new wind speed
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "MetersPerSecond::new: speed must be non-negative");
        MetersPerSecond(value)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

// ============================================================================
// WEATHER SCALARS
// ============================================================================

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

unit_type!(Celsius, "°C");

impl Celsius {
    /// Celsius to Kelvin conversion offset (0°C = 273.15 K)
    const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -Self::CELSIUS_KELVIN_OFFSET,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Percentage in `[0, 100]` (relative humidity)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f64);

unit_type!(Percent, "%");

impl Percent {
    /// Create a new percentage. Asserts `0 <= value <= 100`.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0 && value <= 100.0,
            "Percent::new: value must be within [0, 100]"
        );
        Percent(value)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Compass bearing in degrees (0 = north, 90 = east)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

unit_type!(Degrees, "°");

impl Degrees {
    /// Create a new bearing. Any finite value is accepted; see [`Degrees::normalized`].
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Bearing wrapped into `[0, 360)`
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Degrees {
        Degrees(self.0.rem_euclid(360.0))
    }
}
