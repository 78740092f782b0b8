//! Forest transition engine
//!
//! Each step applies four rules, all evaluated against the states as they
//! stood at the start of the step and committed together afterwards:
//!
//! 1. `Dormant → PreIgnition`: exposure `C` grows by `R·dt/L` for every
//!    flaming Moore neighbour (÷√2 for diagonals); the cell heats up once
//!    `C ≥ 1`.
//! 2. `PreIgnition → Active`: the ignition latency counts down by `dt`.
//! 3. `Active → Consumed`: no unburned fuel left among the 8 neighbours.
//! 4. `Consumed → Extinguished`: unconditional, one step later.
//!
//! Neighbour sweeps are done per direction over shifted views of the grid,
//! so edge cells simply receive nothing from directions that point off-grid.

use crate::core_types::compass::Direction;
use crate::core_types::state::ForestState;
use crate::grid::ForestGrid;
use crate::physics::SpreadRates;

/// Number of cells that changed state during one forest step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForestTransitions {
    pub pre_ignited: usize,
    pub activated: usize,
    pub consumed: usize,
    pub extinguished: usize,
}

/// Visit every `(cell, neighbour)` pair where the neighbour lies in
/// `direction` from the cell and both are on the grid
///
/// Equivalent to overlaying the grid on a copy of itself shifted by the
/// direction's offset and walking the overlap.
fn for_each_shifted<F>(height: usize, width: usize, direction: Direction, mut visit: F)
where
    F: FnMut(usize, usize),
{
    let (dy, dx) = direction.offset();
    let y_range = dy.unsigned_abs()..height;
    let x_range = dx.unsigned_abs()..width;
    if y_range.is_empty() || x_range.is_empty() {
        return;
    }

    let rows = y_range.len();
    let cols = x_range.len();
    let y_start = if dy < 0 { dy.unsigned_abs() } else { 0 };
    let x_start = if dx < 0 { dx.unsigned_abs() } else { 0 };

    for y in y_start..y_start + rows {
        let ny = (y as isize + dy) as usize;
        for x in x_start..x_start + cols {
            let nx = (x as isize + dx) as usize;
            visit(y * width + x, ny * width + nx);
        }
    }
}

/// Exposure gained in one step from a flaming neighbour in each direction
///
/// The neighbour in direction `d` pushes fire along `d.opposite()`.
/// Negative rates contribute nothing, so exposure never decreases.
fn exposure_increments(rates: &SpreadRates, grid: &ForestGrid) -> [f64; 8] {
    let dt = *rates.timestep;
    let length = *grid.cell_length();
    Direction::ALL.map(|dir| {
        let rate = *rates.toward(dir.opposite());
        (rate * dt / length / dir.step_length()).max(0.0)
    })
}

/// Advance every forest cell by one timestep
pub fn step_forest(grid: &mut ForestGrid, rates: &SpreadRates) -> ForestTransitions {
    let (height, width) = (grid.height(), grid.width());
    let dt = *rates.timestep;
    let previous = grid.states.clone();

    // Rule 1 and rule 3 sweeps
    let increments = exposure_increments(rates, grid);
    let mut exposed = vec![false; previous.len()];
    let mut gain = vec![0.0_f64; previous.len()];
    let mut front_passed = vec![true; previous.len()];

    for direction in Direction::ALL {
        let increment = increments[direction.index()];
        for_each_shifted(height, width, direction, |cell, neighbor| {
            let neighbor_state = previous[neighbor];
            match previous[cell] {
                ForestState::Dormant if neighbor_state == ForestState::Active => {
                    exposed[cell] = true;
                    gain[cell] += increment;
                }
                ForestState::Active if neighbor_state.is_unburned() => {
                    front_passed[cell] = false;
                }
                _ => {}
            }
        });
    }

    let mut to_pre_ignition = Vec::new();
    let mut to_active = Vec::new();
    let mut to_consumed = Vec::new();
    let mut to_extinguished = Vec::new();

    for (idx, &state) in previous.iter().enumerate() {
        match state {
            ForestState::Dormant if exposed[idx] => {
                grid.exposure[idx] += gain[idx];
                if grid.exposure[idx] >= 1.0 {
                    to_pre_ignition.push(idx);
                }
            }
            ForestState::PreIgnition => {
                grid.ignition_delay[idx] -= dt;
                if grid.ignition_delay[idx] <= 0.0 {
                    to_active.push(idx);
                }
            }
            ForestState::Active if front_passed[idx] => to_consumed.push(idx),
            ForestState::Consumed => to_extinguished.push(idx),
            _ => {}
        }
    }

    for &idx in &to_pre_ignition {
        grid.enter_pre_ignition(idx, rates.ignition_latency);
    }
    for &idx in &to_active {
        grid.activate(idx);
    }
    for &idx in &to_consumed {
        grid.states[idx] = ForestState::Consumed;
    }
    for &idx in &to_extinguished {
        grid.states[idx] = ForestState::Extinguished;
    }

    ForestTransitions {
        pre_ignited: to_pre_ignition.len(),
        activated: to_active.len(),
        consumed: to_consumed.len(),
        extinguished: to_extinguished.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Meters;
    use crate::core_types::weather::Environment;
    use crate::physics::SpreadParameters;

    fn rates_for(grid: &ForestGrid) -> SpreadRates {
        SpreadRates::compute(
            &Environment::default(),
            grid.cell_length(),
            &SpreadParameters::default(),
        )
    }

    #[test]
    fn test_shifted_sweep_pairs() {
        let mut pairs = Vec::new();
        for_each_shifted(2, 3, Direction::East, |cell, neighbor| pairs.push((cell, neighbor)));
        assert_eq!(pairs, vec![(0, 1), (1, 2), (3, 4), (4, 5)]);

        pairs.clear();
        for_each_shifted(2, 3, Direction::NorthWest, |cell, neighbor| {
            pairs.push((cell, neighbor));
        });
        assert_eq!(pairs, vec![(4, 0), (5, 1)]);

        pairs.clear();
        for_each_shifted(1, 1, Direction::South, |cell, neighbor| pairs.push((cell, neighbor)));
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_shifted_sweep_matches_grid_neighbours() {
        let grid = ForestGrid::all_burnable(4, 5, Meters::new(10.0)).unwrap();
        for direction in Direction::ALL {
            let mut swept = Vec::new();
            for_each_shifted(4, 5, direction, |cell, neighbor| swept.push((cell, neighbor)));

            let expected: Vec<_> = (0..grid.len())
                .filter_map(|cell| grid.neighbor(cell, direction).map(|n| (cell, n)))
                .collect();
            assert_eq!(swept.len(), expected.len(), "{direction:?}");
            for pair in &expected {
                assert!(swept.contains(pair), "{direction:?} missing {pair:?}");
            }
        }
    }

    #[test]
    fn test_increments_weight_diagonals() {
        let grid = ForestGrid::all_burnable(3, 3, Meters::new(10.0)).unwrap();
        let rates = rates_for(&grid);
        let inc = exposure_increments(&rates, &grid);
        assert!((inc[Direction::North.index()] - 0.5).abs() < 1e-12);
        assert!((inc[Direction::NorthEast.index()] - 0.5 / std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_isolated_dormant_cells_stay_put() {
        let mut grid = ForestGrid::all_burnable(4, 4, Meters::new(10.0)).unwrap();
        let rates = rates_for(&grid);
        for _ in 0..20 {
            let changes = step_forest(&mut grid, &rates);
            assert_eq!(changes, ForestTransitions::default());
        }
        assert!(grid.exposure.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_neighbor_of_flame_heats_then_ignites() {
        let mut grid = ForestGrid::all_burnable(1, 3, Meters::new(10.0)).unwrap();
        let rates = rates_for(&grid);
        grid.activate(0);

        step_forest(&mut grid, &rates);
        assert_eq!(grid.state(0, 1), ForestState::Dormant);
        assert!(grid.exposure(0, 1) > 0.0);
        assert_eq!(grid.exposure(0, 2), 0.0);

        let mut steps = 1;
        while grid.state(0, 1) == ForestState::Dormant {
            step_forest(&mut grid, &rates);
            steps += 1;
            assert!(steps < 10);
        }
        assert_eq!(grid.state(0, 1), ForestState::PreIgnition);
        assert_eq!(grid.ignition_delay(0, 1), Some(rates.ignition_latency));

        while grid.state(0, 1) == ForestState::PreIgnition {
            step_forest(&mut grid, &rates);
            steps += 1;
            assert!(steps < 20);
        }
        assert_eq!(grid.state(0, 1), ForestState::Active);
        assert_eq!(grid.exposure(0, 1), 0.0);
        assert!(grid.ignition_delay(0, 1).is_none());
    }

    #[test]
    fn test_active_cell_waits_for_front_to_pass() {
        let mut grid = ForestGrid::all_burnable(1, 2, Meters::new(10.0)).unwrap();
        let rates = rates_for(&grid);
        grid.activate(0);

        // Still has a dormant neighbour: keeps burning
        step_forest(&mut grid, &rates);
        assert_eq!(grid.state(0, 0), ForestState::Active);

        grid.states[1] = ForestState::Active;
        step_forest(&mut grid, &rates);
        assert_eq!(grid.state(0, 0), ForestState::Consumed);
        assert_eq!(grid.state(0, 1), ForestState::Consumed);

        step_forest(&mut grid, &rates);
        assert_eq!(grid.state(0, 0), ForestState::Extinguished);
        assert_eq!(grid.state(0, 1), ForestState::Extinguished);
    }

    #[test]
    fn test_unburnable_cells_block_nothing_and_never_burn() {
        let forest = [true, true, true];
        let incombustible = [false, true, false];
        let mut grid = ForestGrid::new(1, 3, Meters::new(10.0), &forest, &incombustible).unwrap();
        let rates = rates_for(&grid);
        grid.activate(0);

        // The only neighbour is unburnable, so the source burns out immediately
        step_forest(&mut grid, &rates);
        assert_eq!(grid.state(0, 0), ForestState::Consumed);
        for _ in 0..20 {
            step_forest(&mut grid, &rates);
        }
        assert_eq!(grid.state(0, 1), ForestState::Unburnable);
        assert_eq!(grid.state(0, 2), ForestState::Dormant);
    }

    #[test]
    fn test_transitions_use_start_of_step_states() {
        // A cell that just became active this step must not heat its
        // neighbours until the next step.
        let mut grid = ForestGrid::all_burnable(1, 3, Meters::new(10.0)).unwrap();
        let rates = rates_for(&grid);
        grid.states[1] = ForestState::PreIgnition;
        grid.ignition_delay[1] = 0.0;

        step_forest(&mut grid, &rates);
        assert_eq!(grid.state(0, 1), ForestState::Active);
        assert_eq!(grid.exposure(0, 0), 0.0);
        assert_eq!(grid.exposure(0, 2), 0.0);
    }
}
