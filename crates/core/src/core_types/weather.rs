//! Run-constant weather conditions
//!
//! Weather is fixed for the duration of a run. Changing it means building a
//! new simulation, since spread rates and the timestep are derived from it once.

use crate::core_types::units::{Celsius, Degrees, MetersPerSecond, Percent};
use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Weather-severity category for ember ignition of structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeatherType {
    /// Conditions favour the fire (hot, dry, gusty)
    Advantage,
    /// Typical fire-season conditions
    #[default]
    Neutral,
    /// Conditions work against the fire
    Disadvantage,
}

impl WeatherType {
    /// Weather multiplier `P_weather` applied to every ember ignition draw
    pub const fn severity(self) -> f64 {
        match self {
            WeatherType::Advantage => 1.0,
            WeatherType::Neutral => 0.8,
            WeatherType::Disadvantage => 0.4,
        }
    }
}

/// Ambient conditions for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Air temperature
    pub temperature: Celsius,
    /// Wind speed
    pub wind_speed: MetersPerSecond,
    /// Relative humidity
    pub relative_humidity: Percent,
    /// Bearing the wind carries embers toward (0 = north / up the grid, 90 = east)
    pub wind_direction: Degrees,
    /// Severity category for structure ignition
    pub weather: WeatherType,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature: Celsius::new(20.0),
            wind_speed: MetersPerSecond::new(5.0),
            relative_humidity: Percent::new(30.0),
            wind_direction: Degrees::new(0.0),
            weather: WeatherType::Neutral,
        }
    }
}

impl Environment {
    /// Create an environment from raw values
    #[must_use]
    pub fn new(
        temperature: f64,
        wind_speed: f64,
        relative_humidity: f64,
        wind_direction: f64,
        weather: WeatherType,
    ) -> Self {
        Self {
            temperature: Celsius::new(temperature),
            wind_speed: MetersPerSecond::new(wind_speed),
            relative_humidity: Percent::new(relative_humidity),
            wind_direction: Degrees::new(wind_direction),
            weather,
        }
    }

    /// Check every scalar is finite
    ///
    /// The unit constructors only bound their ranges, and deserialized or
    /// `From<f64>` values skip them entirely.
    ///
    /// # Errors
    ///
    /// [`SimulationError::NonFiniteWeather`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("temperature", *self.temperature),
            ("wind speed", *self.wind_speed),
            ("relative humidity", *self.relative_humidity),
            ("wind direction", *self.wind_direction),
        ];
        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some(&(field, _)) => Err(SimulationError::NonFiniteWeather { field }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_severity_ordering() {
        assert!(WeatherType::Advantage.severity() > WeatherType::Neutral.severity());
        assert!(WeatherType::Neutral.severity() > WeatherType::Disadvantage.severity());
    }

    #[test]
    fn test_validate_rejects_non_finite_fields() {
        assert_eq!(Environment::default().validate(), Ok(()));

        let hot = Environment::new(f64::INFINITY, 5.0, 30.0, 0.0, WeatherType::Neutral);
        assert_eq!(
            hot.validate(),
            Err(SimulationError::NonFiniteWeather { field: "temperature" })
        );

        let gusty = Environment {
            wind_speed: MetersPerSecond::from(f64::NAN),
            ..Environment::default()
        };
        assert_eq!(
            gusty.validate(),
            Err(SimulationError::NonFiniteWeather { field: "wind speed" })
        );

        let spinning = Environment {
            wind_direction: Degrees::new(f64::NEG_INFINITY),
            ..Environment::default()
        };
        assert_eq!(
            spinning.validate(),
            Err(SimulationError::NonFiniteWeather { field: "wind direction" })
        );
    }

    #[test]
    fn test_default_environment() {
        let env = Environment::default();
        assert_eq!(*env.temperature, 20.0);
        assert_eq!(*env.wind_speed, 5.0);
        assert_eq!(*env.relative_humidity, 30.0);
        assert_eq!(env.weather, WeatherType::Neutral);
    }
}
