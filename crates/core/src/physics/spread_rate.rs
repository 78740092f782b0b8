//! Forest spread rate and simulation timestep
//!
//! The base rate is an empirical linear fit in temperature, wind speed and
//! relative humidity:
//!
//! `R0 = 0.03·T + 0.05·W + 0.01·(100 − RH) − 0.3`   (m/min)
//!
//! Each Moore direction then gets `R0 · Kw · Ks · Kf`, where the wind, slope
//! and fuel corrections default to 1.0. The timestep is chosen so that the
//! fastest direction covers a fixed fraction of a cell per step:
//!
//! `dt = k · L / Rmax`
//!
//! falling back to a fixed floor when `Rmax` is too small, negative or not
//! finite for that expression to be meaningful.
//!
//! Weather is constant for a run, so all of this is computed once at start.

use crate::core_types::compass::Direction;
use crate::core_types::units::{Meters, MetersPerMinute, Minutes};
use crate::core_types::weather::Environment;
use serde::{Deserialize, Serialize};

/// Fraction of a cell the fastest direction advances per step
pub const DEFAULT_TIMESTEP_COEFFICIENT: f64 = 0.5;

/// Rates below this are treated as "no meaningful spread"
pub const DEFAULT_LOW_RATE_THRESHOLD: MetersPerMinute = MetersPerMinute::new(0.01);

/// Timestep used when the spread rate is below the low-rate threshold (60 s)
pub const DEFAULT_TIMESTEP_FLOOR: Minutes = Minutes::new(1.0);

/// Per-direction correction coefficients, indexed by [`Direction::index`]
///
/// These are the extension points for wind-aligned, slope-aligned and
/// fuel-aligned spread. Each entry multiplies the base rate for fire
/// travelling in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadCorrections {
    /// `Kw` per direction of travel
    pub wind: [f64; 8],
    /// `Ks` per direction of travel
    pub slope: [f64; 8],
    /// `Kf` per direction of travel
    pub fuel: [f64; 8],
}

impl Default for SpreadCorrections {
    fn default() -> Self {
        Self {
            wind: [1.0; 8],
            slope: [1.0; 8],
            fuel: [1.0; 8],
        }
    }
}

impl SpreadCorrections {
    /// Combined `Kw · Ks · Kf` for fire travelling in `direction`
    #[inline]
    pub fn factor(&self, direction: Direction) -> f64 {
        let i = direction.index();
        self.wind[i] * self.slope[i] * self.fuel[i]
    }
}

/// Tunables for spread rate and timestep selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadParameters {
    /// `k` in `dt = k · L / Rmax`
    pub timestep_coefficient: f64,
    /// Below this `Rmax` the timestep floor is used
    pub low_rate_threshold: MetersPerMinute,
    /// Timestep for low or non-positive spread rates
    pub timestep_floor: Minutes,
    /// Directional correction factors
    pub corrections: SpreadCorrections,
}

impl Default for SpreadParameters {
    fn default() -> Self {
        Self {
            timestep_coefficient: DEFAULT_TIMESTEP_COEFFICIENT,
            low_rate_threshold: DEFAULT_LOW_RATE_THRESHOLD,
            timestep_floor: DEFAULT_TIMESTEP_FLOOR,
            corrections: SpreadCorrections::default(),
        }
    }
}

/// Base forest spread rate `R0` from the ambient weather
///
/// Not clamped: cold, calm and humid inputs produce a non-positive rate,
/// which the timestep policy handles.
pub fn base_rate(environment: &Environment) -> MetersPerMinute {
    let t = *environment.temperature;
    let w = *environment.wind_speed;
    let rh = *environment.relative_humidity;
    MetersPerMinute::new(0.03 * t + 0.05 * w + 0.01 * (100.0 - rh) - 0.3)
}

/// Spread rate for each direction of travel
pub fn directional_rates(
    base: MetersPerMinute,
    corrections: &SpreadCorrections,
) -> [MetersPerMinute; 8] {
    Direction::ALL.map(|dir| base * corrections.factor(dir))
}

/// Simulation step for a maximum spread rate
///
/// Always strictly positive and finite for positive cell length and
/// coefficient. A non-finite `Rmax`, or a step that would come out zero or
/// non-finite, takes the floor.
pub fn timestep(rmax: MetersPerMinute, cell_length: Meters, params: &SpreadParameters) -> Minutes {
    if !rmax.is_finite() || rmax < params.low_rate_threshold {
        return params.timestep_floor;
    }
    let dt = (cell_length / rmax) * params.timestep_coefficient;
    if dt.is_finite() && *dt > 0.0 {
        dt
    } else {
        params.timestep_floor
    }
}

/// Delay between a cell reaching pre-ignition and flaming
///
/// `L / Rmax / √π`, independent of which neighbour heated the cell. The rate
/// is floored at the low-rate threshold so the delay stays positive; a
/// non-finite rate is replaced by the threshold.
pub fn ignition_latency(
    rmax: MetersPerMinute,
    cell_length: Meters,
    params: &SpreadParameters,
) -> Minutes {
    let rate = if rmax.is_finite() {
        rmax.max(params.low_rate_threshold)
    } else {
        params.low_rate_threshold
    };
    (cell_length / rate) * (1.0 / std::f64::consts::PI.sqrt())
}

/// Everything derived from the weather at run start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadRates {
    /// `R0`
    pub base: MetersPerMinute,
    /// Rate per direction of travel, indexed by [`Direction::index`]
    pub directional: [MetersPerMinute; 8],
    /// `Rmax`
    pub max: MetersPerMinute,
    /// Fixed step length for the run
    pub timestep: Minutes,
    /// Pre-ignition → active delay
    pub ignition_latency: Minutes,
}

impl SpreadRates {
    /// Derive rates, timestep and ignition latency for a run
    pub fn compute(
        environment: &Environment,
        cell_length: Meters,
        params: &SpreadParameters,
    ) -> Self {
        let base = base_rate(environment);
        let directional = directional_rates(base, &params.corrections);
        let max = directional
            .iter()
            .copied()
            .max()
            .unwrap_or(base);

        Self {
            base,
            directional,
            max,
            timestep: timestep(max, cell_length, params),
            ignition_latency: ignition_latency(max, cell_length, params),
        }
    }

    /// Rate for fire travelling in `direction`
    #[inline]
    pub fn toward(&self, direction: Direction) -> MetersPerMinute {
        self.directional[direction.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::weather::WeatherType;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_rate_formula() {
        let env = Environment::new(30.0, 15.0, 20.0, 0.0, WeatherType::Neutral);
        // 0.9 + 0.75 + 0.8 - 0.3
        assert_relative_eq!(*base_rate(&env), 2.15, epsilon = 1e-12);
    }

    #[test]
    fn test_base_rate_can_go_negative() {
        let env = Environment::new(-20.0, 0.0, 100.0, 0.0, WeatherType::Disadvantage);
        assert!(*base_rate(&env) < 0.0);
    }

    #[test]
    fn test_default_corrections_are_isotropic() {
        let rates = directional_rates(MetersPerMinute::new(1.25), &SpreadCorrections::default());
        assert!(rates.iter().all(|r| **r == 1.25));
    }

    #[test]
    fn test_corrections_scale_single_direction() {
        let mut corrections = SpreadCorrections::default();
        corrections.wind[Direction::East.index()] = 2.0;
        corrections.fuel[Direction::East.index()] = 1.5;
        let rates = directional_rates(MetersPerMinute::new(1.0), &corrections);
        assert_eq!(*rates[Direction::East.index()], 3.0);
        assert_eq!(*rates[Direction::West.index()], 1.0);
    }

    #[test]
    fn test_timestep_scales_with_cell_over_rate() {
        let params = SpreadParameters::default();
        let dt = timestep(MetersPerMinute::new(2.0), Meters::new(10.0), &params);
        assert_relative_eq!(*dt, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_timestep_floor_for_low_rates() {
        let params = SpreadParameters::default();
        for rate in [0.0, -3.0, 0.009] {
            for length in [1.0, 10.0, 500.0] {
                let dt = timestep(MetersPerMinute::new(rate), Meters::new(length), &params);
                assert_eq!(dt, DEFAULT_TIMESTEP_FLOOR);
            }
        }
        assert_eq!(DEFAULT_TIMESTEP_FLOOR.to_seconds(), 60.0);
    }

    #[test]
    fn test_non_finite_rate_takes_floor() {
        let params = SpreadParameters::default();
        for rate in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
            let dt = timestep(MetersPerMinute::new(rate), Meters::new(10.0), &params);
            assert_eq!(dt, DEFAULT_TIMESTEP_FLOOR, "rate {rate}");

            let latency = ignition_latency(MetersPerMinute::new(rate), Meters::new(10.0), &params);
            assert!(*latency > 0.0 && latency.is_finite(), "rate {rate}");
        }

        // Finite but huge: L / Rmax underflows to zero
        let dt = timestep(MetersPerMinute::new(f64::MAX), Meters::new(1e-300), &params);
        assert_eq!(dt, DEFAULT_TIMESTEP_FLOOR);
    }

    #[test]
    fn test_ignition_latency_stays_positive() {
        let params = SpreadParameters::default();
        let latency = ignition_latency(MetersPerMinute::new(-1.0), Meters::new(10.0), &params);
        assert!(*latency > 0.0 && latency.is_finite());

        let latency = ignition_latency(MetersPerMinute::new(2.0), Meters::new(10.0), &params);
        assert_relative_eq!(*latency, 5.0 / std::f64::consts::PI.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_compute_collects_max() {
        let env = Environment::default();
        let mut params = SpreadParameters::default();
        params.corrections.slope[Direction::South.index()] = 1.2;
        let rates = SpreadRates::compute(&env, Meters::new(10.0), &params);
        assert_relative_eq!(*rates.max, *rates.base * 1.2, epsilon = 1e-12);
        assert_eq!(rates.toward(Direction::South), rates.max);
        assert!(*rates.timestep > 0.0);
    }
}
