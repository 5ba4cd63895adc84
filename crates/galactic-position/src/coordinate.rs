//! Integer grid coordinate of a galaxy cell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Axis, KeyError};

/// Largest x coordinate (18 bits)
pub const MAX_X: u32 = (1 << 18) - 1;
/// Largest y coordinate (12 bits); y is the thin galactic-disk axis
pub const MAX_Y: u32 = (1 << 12) - 1;
/// Largest z coordinate (18 bits)
pub const MAX_Z: u32 = (1 << 18) - 1;

/// A galaxy grid cell. Every axis is 1-based; zero is never a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GalacticCoordinate {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GalacticCoordinate {
    /// Builds a coordinate, rejecting any axis outside its valid range
    pub fn new(x: u32, y: u32, z: u32) -> Result<Self, KeyError> {
        check_axis(Axis::X, x, MAX_X)?;
        check_axis(Axis::Y, y, MAX_Y)?;
        check_axis(Axis::Z, z, MAX_Z)?;
        Ok(Self { x, y, z })
    }

    /// Same as [`GalacticCoordinate::new`] but for signed input, as read from
    /// a console or produced by neighbour arithmetic. Negative values are
    /// reported as out of range rather than wrapping.
    pub fn from_signed(x: i64, y: i64, z: i64) -> Result<Self, KeyError> {
        let saturate = |value: i64| value.clamp(0, i64::from(u32::MAX)) as u32;
        Self::new(saturate(x), saturate(y), saturate(z))
    }

    pub fn is_in_range(&self) -> bool {
        (1..=MAX_X).contains(&self.x) && (1..=MAX_Y).contains(&self.y) && (1..=MAX_Z).contains(&self.z)
    }

    /// Maps the coordinate onto the unit cube `[-1, 1]³` used by the galaxy
    /// density field, with the galactic centre at the origin.
    pub fn normalized(&self) -> [f64; 3] {
        [
            normalize_axis(self.x, MAX_X),
            normalize_axis(self.y, MAX_Y),
            normalize_axis(self.z, MAX_Z),
        ]
    }

    /// Neighbouring cell along +x, if it exists
    pub fn step_x(&self, delta: u32) -> Option<Self> {
        let x = self.x.checked_add(delta)?;
        (x <= MAX_X).then_some(Self { x, ..*self })
    }
}

fn check_axis(axis: Axis, value: u32, max: u32) -> Result<(), KeyError> {
    if value == 0 || value > max {
        return Err(KeyError::CoordinateOutOfRange { axis, value, max });
    }
    Ok(())
}

fn normalize_axis(value: u32, max: u32) -> f64 {
    let centre = (max as f64 + 1.0) / 2.0;
    (value as f64 - centre) / centre
}

impl fmt::Display for GalacticCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}
