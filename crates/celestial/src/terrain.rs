//! Terrain hooks for solid bodies
//!
//! This crate only supplies the inputs a terrain generator needs, a base
//! radius and a height amplitude. Sampling itself goes through the
//! [`TerrainSampler`] seam so renderers can plug in their own noise.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use units::Length;

use crate::body::Celestial;
use crate::kind::CelestialKind;
use crate::noise::Simplex3;
use crate::seed::{SeedStream, derive_seed};

const TERRAIN_SALT: u64 = 0x5445_5252;

/// Surface parameters of a planet or asteroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainProfile {
    pub base_radius: Length,
    /// Height of a normalised sample of 1.0
    pub height_amplitude: Length,
    /// Normalised height below which the surface is ocean; asteroids use -1
    pub sea_level: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Ocean,
    Lowland,
    Highland,
    Mountain,
}

/// Supplies normalised heights in `[-1, 1]` for a direction from the centre
pub trait TerrainSampler {
    fn height(&self, profile: &TerrainProfile, direction: &Vector3<f64>) -> f64;
}

/// Fractal simplex noise over the unit sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexTerrain {
    pub octaves: u32,
    pub frequency: f64,
    /// Amplitude falloff per octave
    pub persistence: f64,
}

impl Default for SimplexTerrain {
    fn default() -> Self {
        Self {
            octaves: 5,
            frequency: 1.5,
            persistence: 0.5,
        }
    }
}

impl TerrainSampler for SimplexTerrain {
    fn height(&self, profile: &TerrainProfile, direction: &Vector3<f64>) -> f64 {
        let Some(unit) = direction.try_normalize(f64::EPSILON) else {
            return 0.0;
        };
        let noise = Simplex3::new(profile.seed);

        let mut frequency = self.frequency;
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut norm = 0.0;
        for _ in 0..self.octaves.max(1) {
            total += amplitude
                * noise.sample(unit.x * frequency, unit.y * frequency, unit.z * frequency);
            norm += amplitude;
            amplitude *= self.persistence;
            frequency *= 2.0;
        }
        (total / norm).clamp(-1.0, 1.0)
    }
}

impl Celestial {
    /// Terrain inputs; `None` for bodies without a solid surface
    pub fn terrain_profile(&self) -> Option<TerrainProfile> {
        let seed = derive_seed(self.seed(), TERRAIN_SALT);
        let mut stream = SeedStream::new(seed);
        let u_relief = stream.next_float();
        let u_sea = stream.next_float();

        let radius = self.radius();
        let (relief, sea_level) = match self.kind() {
            // low gravity lets asteroids hold proportionally huge relief
            CelestialKind::Asteroid => (0.05 + 0.15 * u_relief, -1.0),
            CelestialKind::Planet => (0.001 + 0.004 * u_relief, u_sea * 0.6 - 0.3),
            _ => return None,
        };

        Some(TerrainProfile {
            base_radius: radius,
            height_amplitude: radius * relief,
            sea_level,
            seed,
        })
    }

    /// Surface radius along `direction`
    pub fn terrain_height_at(
        &self,
        direction: &Vector3<f64>,
        sampler: &dyn TerrainSampler,
    ) -> Option<Length> {
        let profile = self.terrain_profile()?;
        let h = sampler.height(&profile, direction).clamp(-1.0, 1.0);
        Some(profile.base_radius + profile.height_amplitude * h)
    }

    /// Coarse surface classification along `direction`
    pub fn terrain_type_at(
        &self,
        direction: &Vector3<f64>,
        sampler: &dyn TerrainSampler,
    ) -> Option<TerrainType> {
        let profile = self.terrain_profile()?;
        let h = sampler.height(&profile, direction).clamp(-1.0, 1.0);
        Some(classify_height(h, profile.sea_level))
    }
}

/// Splits the land above sea level into three equal bands
pub fn classify_height(height: f64, sea_level: f64) -> TerrainType {
    if height < sea_level {
        return TerrainType::Ocean;
    }
    let land = (height - sea_level) / (1.0 - sea_level).max(f64::EPSILON);
    match land {
        l if l < 1.0 / 3.0 => TerrainType::Lowland,
        l if l < 2.0 / 3.0 => TerrainType::Highland,
        _ => TerrainType::Mountain,
    }
}
