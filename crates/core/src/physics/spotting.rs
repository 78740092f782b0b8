//! Wind-biased elliptical spot-ignition model
//!
//! Burning sources shower embers over an egg-shaped zone stretched downwind.
//! The zone is an ellipse with different forward and backward semi-axes:
//!
//! - downwind reach `a = 0.6·v + 3 + d/2`
//! - lateral reach  `b = −(2/15)·v + 3 + d/2`
//! - upwind reach   `c = −(1/15)·v + 3 + d/2`
//!
//! where `v` is the wind speed and `d` the characteristic size of the source
//! (square root of its footprint area). Forest sources scale the wind-driven
//! part of the downwind reach by a crown/surface factor.
//!
//! A cell lies in the zone when its centre satisfies
//! `(f / a_eff)² + (l / b)² < 1`, with `f`/`l` its forward/lateral offset from
//! the source centre and `a_eff = a` downwind (`f ≥ 0`), `c` upwind.
//!
//! Wind direction is snapped to the nearest compass octant.

use crate::core_types::compass::Direction;
use crate::core_types::material::HouseMaterial;
use crate::core_types::state::UrbanState;
use crate::core_types::units::{Meters, MetersPerMinute, MetersPerSecond};
use crate::core_types::weather::WeatherType;
use serde::{Deserialize, Serialize};

/// Smallest semi-axis allowed, keeps the containment test finite in strong wind
const MIN_SEMI_AXIS: f64 = 1e-6;

/// Forest fire intensity regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireRegime {
    /// Fire carried in surface fuels
    Surface,
    /// Fire running through the canopy
    Crown,
}

impl FireRegime {
    /// Regime implied by the run's maximum spread rate
    pub fn classify(rmax: MetersPerMinute, params: &SpottingParameters) -> Self {
        if rmax >= params.crown_fire_threshold {
            FireRegime::Crown
        } else {
            FireRegime::Surface
        }
    }
}

/// Tunables for ember transport and ignition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpottingParameters {
    /// `Rmax` at or above which forest fire is treated as crown fire
    pub crown_fire_threshold: MetersPerMinute,
    /// Downwind reach multiplier for crown fire
    pub crown_reach_factor: f64,
    /// Downwind reach multiplier for surface fire
    pub surface_reach_factor: f64,
    /// `P_severity` for moderate sources (structure SU3, surface fire)
    pub moderate_severity: f64,
    /// `P_severity` for intense sources (structure SU4, crown fire)
    pub intense_severity: f64,
}

impl Default for SpottingParameters {
    fn default() -> Self {
        Self {
            crown_fire_threshold: MetersPerMinute::new(2.0),
            crown_reach_factor: 1.5,
            surface_reach_factor: 1.0,
            moderate_severity: 0.3,
            intense_severity: 1.0,
        }
    }
}

impl SpottingParameters {
    /// Downwind reach multiplier for forest sources
    pub fn reach_factor(&self, regime: FireRegime) -> f64 {
        match regime {
            FireRegime::Crown => self.crown_reach_factor,
            FireRegime::Surface => self.surface_reach_factor,
        }
    }

    /// `P_severity` of a burning forest cell
    pub fn forest_severity(&self, regime: FireRegime) -> f64 {
        match regime {
            FireRegime::Crown => self.intense_severity,
            FireRegime::Surface => self.moderate_severity,
        }
    }

    /// `P_severity` of a structure, `None` when it is not throwing embers
    pub fn structure_severity(&self, state: UrbanState) -> Option<f64> {
        match state {
            UrbanState::SU3 => Some(self.moderate_severity),
            UrbanState::SU4 => Some(self.intense_severity),
            _ => None,
        }
    }
}

/// Semi-axes of an ember zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotEllipse {
    /// Reach ahead of the source along the wind
    pub downwind: Meters,
    /// Half-width across the wind
    pub lateral: Meters,
    /// Reach behind the source
    pub upwind: Meters,
}

impl SpotEllipse {
    /// Ember zone of a burning structure of characteristic size `d`
    pub fn for_structure(wind_speed: MetersPerSecond, d: Meters) -> Self {
        let v = *wind_speed;
        let half = 0.5 * *d;
        Self::clamped(
            0.6 * v + 3.0 + half,
            -2.0 / 15.0 * v + 3.0 + half,
            -1.0 / 15.0 * v + 3.0 + half,
        )
    }

    /// Ember zone of a burning forest cell of side `d`, downwind wind term
    /// scaled by the crown/surface `reach_factor`
    pub fn for_forest(wind_speed: MetersPerSecond, d: Meters, reach_factor: f64) -> Self {
        let v = *wind_speed;
        let half = 0.5 * *d;
        Self::clamped(
            (0.6 * v + 3.0) * reach_factor + half,
            -2.0 / 15.0 * v + 3.0 + half,
            -1.0 / 15.0 * v + 3.0 + half,
        )
    }

    fn clamped(downwind: f64, lateral: f64, upwind: f64) -> Self {
        Self {
            downwind: Meters::new(downwind.max(MIN_SEMI_AXIS)),
            lateral: Meters::new(lateral.max(MIN_SEMI_AXIS)),
            upwind: Meters::new(upwind.max(MIN_SEMI_AXIS)),
        }
    }

    /// Largest of the three semi-axes
    pub fn max_reach(&self) -> Meters {
        self.downwind.max(self.lateral).max(self.upwind)
    }

    /// Whether a point at `forward`/`lateral` metres from the centre lies inside
    pub fn contains(&self, forward: f64, lateral: f64) -> bool {
        let along = if forward >= 0.0 {
            *self.downwind
        } else {
            *self.upwind
        };
        let f = forward / along;
        let l = lateral / *self.lateral;
        f * f + l * l < 1.0
    }

    /// Whether the cell centre at `(dy, dx)` cells from the source centre lies
    /// inside when the wind blows toward `heading`
    pub fn contains_offset(&self, dy: f64, dx: f64, heading: Direction, cell_length: Meters) -> bool {
        let (uy, ux) = heading.unit_vector();
        let forward = (dx * ux + dy * uy) * *cell_length;
        let lateral = (dx * uy - dy * ux) * *cell_length;
        self.contains(forward, lateral)
    }

    /// Half-size of the square search window, in cells
    fn search_radius(&self, cell_length: Meters) -> isize {
        (*self.max_reach() / *cell_length).ceil() as isize + 1
    }
}

/// Row-major indices of every grid cell inside the ember zone centred at
/// `center` (continuous cell-centre coordinates), clipped to the grid
pub fn candidate_cells(
    ellipse: &SpotEllipse,
    center: (f64, f64),
    heading: Direction,
    height: usize,
    width: usize,
    cell_length: Meters,
) -> Vec<usize> {
    let radius = ellipse.search_radius(cell_length);
    let (cy, cx) = center;
    let y_lo = (cy.floor() as isize - radius).max(0);
    let y_hi = (cy.ceil() as isize + radius).min(height as isize - 1);
    let x_lo = (cx.floor() as isize - radius).max(0);
    let x_hi = (cx.ceil() as isize + radius).min(width as isize - 1);

    let mut cells = Vec::new();
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dy = y as f64 - cy;
            let dx = x as f64 - cx;
            if ellipse.contains_offset(dy, dx, heading, cell_length) {
                cells.push(y as usize * width + x as usize);
            }
        }
    }
    cells
}

/// Ember zone of a single-cell source as a list of `(dy, dx)` offsets
///
/// Forest sources all share one shape for the run, so the offsets are worked
/// out once and translated to each burning cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotKernel {
    offsets: Vec<(isize, isize)>,
}

impl SpotKernel {
    pub fn new(ellipse: &SpotEllipse, heading: Direction, cell_length: Meters) -> Self {
        let radius = ellipse.search_radius(cell_length);
        let mut offsets = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if ellipse.contains_offset(dy as f64, dx as f64, heading, cell_length) {
                    offsets.push((dy, dx));
                }
            }
        }
        Self { offsets }
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// Row-major indices of the zone around cell `(y, x)`, clipped to the grid
    pub fn cells_around(
        &self,
        y: usize,
        x: usize,
        height: usize,
        width: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        self.offsets.iter().filter_map(move |&(dy, dx)| {
            let ny = y as isize + dy;
            let nx = x as isize + dx;
            (ny >= 0 && nx >= 0 && (ny as usize) < height && (nx as usize) < width)
                .then(|| ny as usize * width + nx as usize)
        })
    }
}

/// Probability that one ember check ignites a structure
///
/// `P = P_material · P_weather · P_severity · P_coverage`, where coverage is
/// the fraction of the target footprint inside the ember zone.
pub fn transmission_probability(
    material: HouseMaterial,
    weather: WeatherType,
    severity: f64,
    coverage: f64,
) -> f64 {
    material.susceptibility() * weather.severity() * severity * coverage
}
