use serde::{Deserialize, Serialize};

use crate::{Length, Mass};

/// Volume density in kg/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(f64);

impl Density {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_kg_per_m3(value: f64) -> Self {
        Self(value)
    }

    pub fn from_grams_per_cm3(value: f64) -> Self {
        Self(value * 1000.0)
    }

    /// Mean density of a uniform sphere
    ///
    /// Returns zero for a zero radius rather than infinity, which is the
    /// convention for massless organizational nodes.
    pub fn of_sphere(mass: Mass, radius: Length) -> Self {
        if radius.is_zero() {
            return Self::zero();
        }
        let volume = 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3);
        Self(mass.to_kg() / volume)
    }

    /// Radius of a uniform sphere of the given mass at this density
    pub fn sphere_radius(&self, mass: Mass) -> Length {
        if self.0 <= 0.0 {
            return Length::zero();
        }
        let volume = mass.to_kg() / self.0;
        Length::from_meters((3.0 * volume / (4.0 * std::f64::consts::PI)).cbrt())
    }

    pub fn to_kg_per_m3(&self) -> f64 {
        self.0
    }

    pub fn to_grams_per_cm3(&self) -> f64 {
        self.0 / 1000.0
    }
}
