//! Concrete body type chosen from mass

use std::fmt;

use serde::{Deserialize, Serialize};
use units::Mass;

use crate::seed::{SeedStream, derive_seed};

const KIND_SALT: u64 = 0x4B49_4E44;

/// Concrete type of a [`Celestial`](crate::Celestial), fixed at construction
///
/// | Kind                  | Mass (kg)      |
/// |-----------------------|----------------|
/// | Asteroid              | < 1e21         |
/// | Planet                | 1e21 - 1e26    |
/// | GasGiant              | 1e26 - 1e28    |
/// | BrownDwarf            | 1e28 - 1e29    |
/// | Star                  | 1e29 - 1e32    |
/// | HyperGiant            | 1e32 - 1e35    |
/// | SuperMassiveBlackHole | >= 1e35        |
///
/// Stars and hypergiants have a small chance of being reclassified as a
/// stellar black hole. `BinaryCenter` is never chosen from mass; it only
/// comes from [`Catalog::make_binary_center`](crate::Catalog::make_binary_center).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelestialKind {
    BinaryCenter,
    Asteroid,
    Planet,
    GasGiant,
    BrownDwarf,
    Star,
    HyperGiant,
    BlackHole,
    SuperMassiveBlackHole,
}

impl CelestialKind {
    pub const ASTEROID_LIMIT: f64 = 1e21;
    pub const PLANET_LIMIT: f64 = 1e26;
    pub const GAS_GIANT_LIMIT: f64 = 1e28;
    pub const BROWN_DWARF_LIMIT: f64 = 1e29;
    pub const STAR_LIMIT: f64 = 1e32;
    pub const HYPER_GIANT_LIMIT: f64 = 1e35;

    /// Chance that a star collapses into a black hole
    pub const STAR_BLACK_HOLE_CHANCE: f64 = 0.002;
    /// Chance that a hypergiant collapses into a black hole
    pub const HYPER_GIANT_BLACK_HOLE_CHANCE: f64 = 0.0001;

    /// Picks the kind for a body of `mass`, rolling the black-hole chance from
    /// a stream derived from the body's construction seed
    pub fn from_mass(mass: Mass, seed: u64) -> Self {
        let roll = SeedStream::new(derive_seed(seed, KIND_SALT)).next_float();
        Self::classify(mass.to_kg(), roll)
    }

    /// Threshold classification with an explicit black-hole roll in `[0, 1)`.
    /// Thresholds are ordered and the first match wins.
    pub fn classify(mass_kg: f64, black_hole_roll: f64) -> Self {
        match mass_kg {
            m if m < Self::ASTEROID_LIMIT => Self::Asteroid,
            m if m < Self::PLANET_LIMIT => Self::Planet,
            m if m < Self::GAS_GIANT_LIMIT => Self::GasGiant,
            m if m < Self::BROWN_DWARF_LIMIT => Self::BrownDwarf,
            m if m < Self::STAR_LIMIT => {
                if black_hole_roll < Self::STAR_BLACK_HOLE_CHANCE {
                    Self::BlackHole
                } else {
                    Self::Star
                }
            }
            m if m < Self::HYPER_GIANT_LIMIT => {
                if black_hole_roll < Self::HYPER_GIANT_BLACK_HOLE_CHANCE {
                    Self::BlackHole
                } else {
                    Self::HyperGiant
                }
            }
            _ => Self::SuperMassiveBlackHole,
        }
    }

    /// Emits light of its own
    pub fn is_stellar(&self) -> bool {
        matches!(self, Self::Star | Self::HyperGiant)
    }

    pub fn is_black_hole(&self) -> bool {
        matches!(self, Self::BlackHole | Self::SuperMassiveBlackHole)
    }

    /// Has a solid surface for terrain
    pub fn has_surface(&self) -> bool {
        matches!(self, Self::Asteroid | Self::Planet)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BinaryCenter => "Binary Center",
            Self::Asteroid => "Asteroid",
            Self::Planet => "Planet",
            Self::GasGiant => "Gas Giant",
            Self::BrownDwarf => "Brown Dwarf",
            Self::Star => "Star",
            Self::HyperGiant => "Hypergiant",
            Self::BlackHole => "Black Hole",
            Self::SuperMassiveBlackHole => "Supermassive Black Hole",
        }
    }
}

impl fmt::Display for CelestialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
