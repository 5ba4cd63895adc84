//! Deterministic procedural universe
//!
//! Turns a galaxy cell coordinate plus a hierarchy path into a reproducible
//! tree of bodies: star systems, stars, planets, moons, asteroids, binary
//! pairs and trojan companions. Nothing is stored; every value is re-derived
//! from the [`UniverseConfig`] and the packed [`PositionKey`], and the
//! [`Catalog`] memoizes what has been derived so far.
//!
//! ```
//! use celestial::{Catalog, UniverseConfig};
//! use galactic_position::GalacticCoordinate;
//!
//! let catalog = Catalog::new(UniverseConfig::default());
//! let center = GalacticCoordinate::new(131_072, 2_048, 131_072).unwrap();
//!
//! for system in catalog.find_star_systems(center, 1, 500) {
//!     for body in system.roots(&catalog) {
//!         assert!(catalog.celestial(body.key()).is_some());
//!     }
//! }
//! ```

pub mod binary;
pub mod body;
pub mod catalog;
pub mod config;
pub mod generation;
pub mod kind;
pub mod noise;
pub mod orbit;
pub mod sampling;
pub mod seed;
pub mod star_system;
pub mod terrain;

#[cfg(test)]
mod generation_test;
#[cfg(test)]
mod noise_test;
#[cfg(test)]
mod orbit_test;
#[cfg(test)]
mod terrain_test;
#[cfg(test)]
mod test_support;

pub use body::{Celestial, CelestialParams, CelestialSummary, ParentFrame, PhysicalAttributes};
pub use catalog::{Catalog, CatalogStats};
pub use config::{ConfigError, DensityFieldConfig, SeedChannel, UniverseConfig};
pub use kind::CelestialKind;
pub use orbit::{BinaryMember, LagrangePoint, OrbitalElements, Role};
pub use star_system::{StarSystem, StarSystemSummary, SystemParameters};
pub use terrain::{SimplexTerrain, TerrainProfile, TerrainSampler, TerrainType};

pub use galactic_position::{GalacticCoordinate, PositionKey};
