use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::{GRAVITATIONAL_CONSTANT, Length, Mass};

/// Calculate circular orbital velocity around a central mass
///
/// v = sqrt(G·M / r)
///
/// # Examples
/// ```
/// use units::{Length, Mass, circular_orbital_velocity};
///
/// // Earth's orbital velocity, ~29.8 km/s
/// let v = circular_orbital_velocity(Mass::from_solar_masses(1.0), Length::from_au(1.0));
/// assert!((v.to_km_per_sec() - 29.78).abs() < 0.1);
/// ```
pub fn circular_orbital_velocity(central_mass: Mass, radius: Length) -> Velocity {
    Velocity((GRAVITATIONAL_CONSTANT * central_mass.to_kg() / radius.to_m()).sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(f64); // Base unit: m/s

impl Velocity {
    pub fn from_meters_per_sec(value: f64) -> Self {
        Self(value)
    }

    pub fn from_km_per_sec(value: f64) -> Self {
        Self(value * 1000.0)
    }

    pub fn to_meters_per_sec(&self) -> f64 {
        self.0
    }

    pub fn to_km_per_sec(&self) -> f64 {
        self.0 / 1000.0
    }
}

impl Add for Velocity {
    type Output = Velocity;

    fn add(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 + rhs.0)
    }
}

impl Sub for Velocity {
    type Output = Velocity;

    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 - rhs.0)
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}
