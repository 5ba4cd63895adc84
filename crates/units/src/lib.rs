//! Physical quantities used by the universe generator.
//!
//! Every quantity stores an SI base unit (kg, m, s) so that gravitational
//! formulas can be evaluated directly against [`GRAVITATIONAL_CONSTANT`].

pub mod density;
pub mod length;
pub mod mass;
pub mod time;
pub mod velocity;

#[cfg(test)]
mod density_test;

pub use density::Density;
pub use length::{AU_TO_M, LIGHT_YEAR_TO_M, Length, SOLAR_RADIUS_M};
pub use mass::{EARTH_MASS_KG, JUPITER_MASS_KG, Mass, SOLAR_MASS_KG};
pub use time::{SECONDS_PER_DAY, SECONDS_PER_YEAR, Time};
pub use velocity::{Velocity, circular_orbital_velocity};

/// Newtonian gravitational constant in m³ kg⁻¹ s⁻²
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Speed of light in vacuum, m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
