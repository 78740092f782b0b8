//! The eight Moore-neighbourhood directions
//!
//! Grid convention: rows grow southward, columns grow eastward. Offsets are
//! `(dy, dx)`. Directions are listed clockwise from north, so diagonals sit
//! at the odd indices.

use crate::core_types::units::Degrees;
use serde::{Deserialize, Serialize};

/// Compass direction toward one of the 8 Moore neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Position in [`Direction::ALL`]; indexes per-direction rate tables
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Grid offset `(dy, dx)` of the neighbour in this direction
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// Direction pointing the other way
    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 4) % 8]
    }

    /// Centre-to-centre distance to the neighbour, in cells
    #[inline]
    pub fn step_length(self) -> f64 {
        if self.is_diagonal() {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }

    /// Unit vector `(y, x)` along this direction
    pub fn unit_vector(self) -> (f64, f64) {
        let (dy, dx) = self.offset();
        let len = self.step_length();
        (dy as f64 / len, dx as f64 / len)
    }

    /// Nearest of the 8 octants to a compass bearing
    pub fn from_bearing(bearing: Degrees) -> Direction {
        let octant = (*bearing.normalized() / 45.0).round() as usize % 8;
        Self::ALL[octant]
    }
}
