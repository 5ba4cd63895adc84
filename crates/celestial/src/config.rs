//! Universe configuration.
//!
//! Everything the generator derives is a pure function of a coordinate and
//! this configuration, so two peers holding the same config regenerate the
//! same universe.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::seed::derive_seed;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Named hash channels. Each system-level attribute samples its own channel
/// so attributes stay independent of each other and of generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedChannel {
    Presence,
    RadiusFactor,
    Mass,
    OffsetX,
    OffsetY,
    OffsetZ,
    Age,
    Tilt,
    OrbitCount,
    SubSeed,
    DensityNoise,
}

impl SeedChannel {
    pub const fn constant(self) -> u64 {
        match self {
            Self::Presence => 0x5EED_0000_0000_0001,
            Self::RadiusFactor => 0x5EED_0000_0000_0002,
            Self::Mass => 0x5EED_0000_0000_0003,
            Self::OffsetX => 0x5EED_0000_0000_0004,
            Self::OffsetY => 0x5EED_0000_0000_0005,
            Self::OffsetZ => 0x5EED_0000_0000_0006,
            Self::Age => 0x5EED_0000_0000_0007,
            Self::Tilt => 0x5EED_0000_0000_0008,
            Self::OrbitCount => 0x5EED_0000_0000_0009,
            Self::SubSeed => 0x5EED_0000_0000_000A,
            Self::DensityNoise => 0x5EED_0000_0000_000B,
        }
    }
}

/// Shape of the galaxy density field on the unit cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityFieldConfig {
    /// Exponential falloff of the disk in the galactic plane
    pub disk_scale_length: f64,
    /// Exponential falloff above/below the plane
    pub disk_scale_height: f64,
    /// Gaussian radius of the central bulge
    pub bulge_radius: f64,
    pub arm_count: u32,
    /// 0 = no arms, 1 = nothing between arms
    pub arm_strength: f64,
    /// How tightly arms wind with radius
    pub arm_winding: f64,
    pub noise_frequency: f64,
    /// 0 = smooth field, 1 = fully noise-modulated
    pub noise_strength: f64,
}

impl Default for DensityFieldConfig {
    fn default() -> Self {
        Self {
            disk_scale_length: 0.3,
            disk_scale_height: 0.08,
            bulge_radius: 0.12,
            arm_count: 4,
            arm_strength: 0.6,
            arm_winding: 12.0,
            noise_frequency: 24.0,
            noise_strength: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Universe seed, mixed into every hash channel
    pub seed: u64,
    /// Probability that a cell of full density holds a star system
    pub star_density: f64,
    /// Edge length of one grid cell
    pub cell_size_ly: f64,
    /// Largest star system radius
    pub max_system_radius_ly: f64,
    /// Added to every timestamp before evaluating orbital phase
    pub epoch_offset_s: f64,
    pub density_field: DensityFieldConfig,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            seed: 0x4D41_4752_4154_4845,
            star_density: 0.2,
            cell_size_ly: 0.5,
            max_system_radius_ly: 0.2,
            epoch_offset_s: 0.0,
            density_field: DensityFieldConfig::default(),
        }
    }
}

impl UniverseConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// ```
    /// use celestial::UniverseConfig;
    ///
    /// let config = UniverseConfig::from_toml_str("seed = 7\nstar_density = 0.5").unwrap();
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.cell_size_ly, UniverseConfig::default().cell_size_ly);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if !(0.0..=1.0).contains(&self.star_density) {
            return invalid("star_density", "must lie in 0..=1");
        }
        if self.cell_size_ly <= 0.0 {
            return invalid("cell_size_ly", "must be positive");
        }
        if self.max_system_radius_ly <= 0.0 || 2.0 * self.max_system_radius_ly > self.cell_size_ly
        {
            return invalid(
                "max_system_radius_ly",
                "must be positive and fit twice inside one cell",
            );
        }
        if !self.epoch_offset_s.is_finite() {
            return invalid("epoch_offset_s", "must be finite");
        }
        let field = &self.density_field;
        if field.disk_scale_length <= 0.0 || field.disk_scale_height <= 0.0 {
            return invalid("density_field", "scale lengths must be positive");
        }
        if !(0.0..=1.0).contains(&field.arm_strength) || !(0.0..=1.0).contains(&field.noise_strength)
        {
            return invalid("density_field", "strengths must lie in 0..=1");
        }
        Ok(())
    }

    /// Hash constant for a channel, specific to this universe's seed
    pub fn channel(&self, channel: SeedChannel) -> u64 {
        derive_seed(self.seed, channel.constant())
    }
}
