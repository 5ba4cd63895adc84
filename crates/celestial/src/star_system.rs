//! Star systems occupying galaxy cells

use std::f64::consts::TAU;
use std::sync::{Arc, OnceLock};

use galactic_position::{GalacticCoordinate, KeyError, PositionKey};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;
use units::{LIGHT_YEAR_TO_M, Length, Mass};
use uuid::Uuid;

use crate::binary::{BinaryLayout, MemberOrbit, root_separation, split_mass};
use crate::body::{
    Blueprint, Celestial, CelestialParams, CelestialSummary, ParentFrame, nominal_radius,
};
use crate::catalog::Catalog;
use crate::config::{SeedChannel, UniverseConfig};
use crate::kind::CelestialKind;
use crate::orbit::{BinaryMember, Role};
use crate::sampling::{center_distributed, hash_coordinate, log_mix, uniform_from_coordinate};
use crate::seed::{SeedStream, derive_seed};

/// Root slot of the outer barycentre in a wrapped pair
pub const WRAPPER_SLOT: u8 = 0;
/// Root slot of a single star, or of a pair's primary
pub const PRIMARY_SLOT: u8 = 1;
/// Root slot of a pair's secondary
pub const COMPANION_SLOT: u8 = 2;

const MIN_SYSTEM_MASS_KG: f64 = 1.6e29;
const MAX_SYSTEM_MASS_KG: f64 = 2.0e32;
const MIN_SYSTEM_AGE_GYR: f64 = 0.1;
const MAX_SYSTEM_AGE_GYR: f64 = 13.0;

/// Orbit distance of a wrapping barycentre, in pair separations
const WRAPPER_DISTANCE_FACTOR: f64 = 5.0;

const CENTRAL_SALT: u64 = 0x4345_4E54;
const WRAPPER_SALT: u64 = 0x5752_4150;

/// System-level parameters, each sampled from its own coordinate hash channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemParameters {
    /// Position of the radius within its allowed range, `[0, 1)`
    pub radius_factor: f64,
    pub radius: Length,
    pub mass: Mass,
    /// Offset of the system centre from the cell centre, light-years
    pub offset_ly: [f64; 3],
    pub age_gyr: f64,
    /// Orbital plane tilt, degrees
    pub tilt_deg: f64,
    /// 1 to 3
    pub orbit_count: u8,
    /// 1 or 2
    pub central_body_count: u8,
    pub sub_seed: u64,
}

impl SystemParameters {
    pub fn sample(coordinate: GalacticCoordinate, config: &UniverseConfig) -> Self {
        let u = |channel: SeedChannel| uniform_from_coordinate(coordinate, config.channel(channel));

        let radius_factor = u(SeedChannel::RadiusFactor);
        let max_radius = config.max_system_radius_ly;
        let radius_ly = (0.05 + 0.95 * radius_factor) * max_radius;

        let mass_u = u(SeedChannel::Mass);
        let mass = log_mix(MIN_SYSTEM_MASS_KG, MAX_SYSTEM_MASS_KG, mass_u.powi(3));

        // the whole system stays inside its cell
        let room = (config.cell_size_ly - 2.0 * radius_ly).max(0.0);
        let offset_ly = [SeedChannel::OffsetX, SeedChannel::OffsetY, SeedChannel::OffsetZ]
            .map(|channel| (u(channel) - 0.5) * room);

        let age_gyr = log_mix(
            MIN_SYSTEM_AGE_GYR,
            MAX_SYSTEM_AGE_GYR,
            center_distributed(u(SeedChannel::Age), 1),
        );
        let tilt_deg = (center_distributed(u(SeedChannel::Tilt), 1) - 0.5) * 180.0;

        let orbit_u = u(SeedChannel::OrbitCount);
        let orbit_count = (1.0 + (orbit_u * orbit_u * 3.0).floor()).clamp(1.0, 3.0) as u8;

        let sub_seed = hash_coordinate(coordinate, config.channel(SeedChannel::SubSeed));
        let central_body_count = if orbit_count == 1 {
            1
        } else {
            1 + (SeedStream::new(sub_seed).next_int() % 2) as u8
        };

        Self {
            radius_factor,
            radius: Length::from_light_years(radius_ly),
            mass: Mass::from_kg(mass),
            offset_ly,
            age_gyr,
            tilt_deg,
            orbit_count,
            central_body_count,
            sub_seed,
        }
    }
}

/// The contents of one populated galaxy cell
#[derive(Debug)]
pub struct StarSystem {
    coordinate: GalacticCoordinate,
    key: PositionKey,
    parameters: SystemParameters,
    central_bodies: OnceLock<[Option<Blueprint>; 3]>,
}

impl StarSystem {
    pub fn new(coordinate: GalacticCoordinate, config: &UniverseConfig) -> Result<Self, KeyError> {
        Ok(Self {
            coordinate,
            key: PositionKey::reference_frame(coordinate)?,
            parameters: SystemParameters::sample(coordinate, config),
            central_bodies: OnceLock::new(),
        })
    }

    pub fn coordinate(&self) -> GalacticCoordinate {
        self.coordinate
    }

    /// Reference-frame key of the cell
    pub fn key(&self) -> PositionKey {
        self.key
    }

    pub fn parameters(&self) -> &SystemParameters {
        &self.parameters
    }

    pub fn radius(&self) -> Length {
        self.parameters.radius
    }

    pub fn mass(&self) -> Mass {
        self.parameters.mass
    }

    pub fn age_gyr(&self) -> f64 {
        self.parameters.age_gyr
    }

    pub fn orbit_count(&self) -> u8 {
        self.parameters.orbit_count
    }

    pub fn central_body_count(&self) -> u8 {
        self.parameters.central_body_count
    }

    /// Root bodies by slot, resolved through `catalog`.
    ///
    /// - single star: slot 1
    /// - pair: slots 1 and 2
    /// - wrapped pair: slot 0 holds the barycentre with both stars as its
    ///   children; the outer orbit it makes room for stays empty
    ///
    /// The system only remembers how to build its roots, so a root evicted
    /// from the catalog is rebuilt here.
    pub fn central_bodies(&self, catalog: &Catalog) -> [Option<Arc<Celestial>>; 3] {
        self.blueprints()
            .map(|slot| slot.map(|blueprint| catalog.realize(&blueprint)))
    }

    pub fn central_body(&self, slot: u8, catalog: &Catalog) -> Option<Arc<Celestial>> {
        let blueprint = self.blueprints().get(usize::from(slot)).copied().flatten()?;
        Some(catalog.realize(&blueprint))
    }

    /// Every root body that exists, in slot order
    pub fn roots(&self, catalog: &Catalog) -> Vec<Arc<Celestial>> {
        self.central_bodies(catalog).into_iter().flatten().collect()
    }

    fn blueprints(&self) -> [Option<Blueprint>; 3] {
        *self.central_bodies.get_or_init(|| self.build_central_bodies())
    }

    fn frame(&self) -> ParentFrame {
        ParentFrame {
            mass: self.parameters.mass,
            radius: self.parameters.radius,
            tilt_deg: self.parameters.tilt_deg,
            seed: self.parameters.sub_seed,
        }
    }

    fn build_central_bodies(&self) -> [Option<Blueprint>; 3] {
        let built = if self.parameters.central_body_count == 1 {
            self.build_single()
        } else {
            self.build_pair()
        };

        match built {
            Ok(slots) => {
                debug!(
                    key = %self.key,
                    roots = slots.iter().flatten().count(),
                    orbit_count = self.parameters.orbit_count,
                    "planned central bodies"
                );
                slots
            }
            Err(error) => {
                debug!(key = %self.key, %error, "central body keys out of range");
                [None, None, None]
            }
        }
    }

    fn build_single(&self) -> Result<[Option<Blueprint>; 3], KeyError> {
        let p = &self.parameters;
        let star = Blueprint::Body(CelestialParams {
            key: self.key.child(PRIMARY_SLOT)?,
            age_gyr: p.age_gyr,
            mass: p.mass,
            parent: self.frame(),
            forced_orbit_distance: None,
            forced_phase: None,
            forced_tilt_deg: Some(p.tilt_deg),
            orbit_budget: p.radius,
            seed: derive_seed(p.sub_seed, u64::from(PRIMARY_SLOT)),
            role: Role::center_star(),
        });
        Ok([None, Some(star), None])
    }

    fn build_pair(&self) -> Result<[Option<Blueprint>; 3], KeyError> {
        let p = &self.parameters;
        let mut stream = SeedStream::new(derive_seed(p.sub_seed, CENTRAL_SALT));
        let u_split = stream.next_float();
        let u_separation = stream.next_float();
        let u_phase = stream.next_float();

        let (primary_mass, secondary_mass) = split_mass(p.mass, u_split);
        let primary_seed = derive_seed(p.sub_seed, u64::from(PRIMARY_SLOT));
        let secondary_seed = derive_seed(p.sub_seed, u64::from(COMPANION_SLOT));

        let combined_radius = nominal_radius(
            CelestialKind::from_mass(primary_mass, primary_seed),
            primary_mass,
        ) + nominal_radius(
            CelestialKind::from_mass(secondary_mass, secondary_seed),
            secondary_mass,
        );
        let separation = root_separation(combined_radius, p.radius, u_separation);
        let layout = BinaryLayout::new(primary_mass, secondary_mass, separation, u_phase * TAU);

        let wrapped = p.orbit_count == 3;
        let (primary_key, secondary_key) = if wrapped {
            let center = self.key.child(WRAPPER_SLOT)?;
            (center.child(0)?, center.child(1)?)
        } else {
            (
                self.key.child(PRIMARY_SLOT)?,
                self.key.child(COMPANION_SLOT)?,
            )
        };

        let member = |key: PositionKey,
                      mass: Mass,
                      orbit: &MemberOrbit,
                      seed: u64,
                      which: BinaryMember| {
            let mut role = Role::binary(which);
            role.center_star = true;
            CelestialParams {
                key,
                age_gyr: p.age_gyr,
                mass,
                parent: ParentFrame {
                    mass: orbit.effective_parent_mass,
                    radius: Length::zero(),
                    tilt_deg: p.tilt_deg,
                    seed: p.sub_seed,
                },
                forced_orbit_distance: Some(orbit.distance),
                forced_phase: Some(orbit.phase),
                forced_tilt_deg: Some(p.tilt_deg),
                orbit_budget: p.radius,
                seed,
                role,
            }
        };
        let primary = member(
            primary_key,
            primary_mass,
            &layout.primary,
            primary_seed,
            BinaryMember::Primary,
        );
        let secondary = member(
            secondary_key,
            secondary_mass,
            &layout.secondary,
            secondary_seed,
            BinaryMember::Secondary,
        );

        if !wrapped {
            return Ok([
                None,
                Some(Blueprint::Body(primary)),
                Some(Blueprint::Body(secondary)),
            ]);
        }

        let center = Blueprint::Pair {
            center: CelestialParams {
                key: self.key.child(WRAPPER_SLOT)?,
                age_gyr: p.age_gyr,
                mass: Mass::zero(),
                parent: self.frame(),
                forced_orbit_distance: Some(separation * WRAPPER_DISTANCE_FACTOR),
                forced_phase: None,
                forced_tilt_deg: Some(p.tilt_deg),
                orbit_budget: p.radius,
                seed: derive_seed(p.sub_seed, WRAPPER_SALT),
                role: Role::center_star(),
            },
            members: [primary, secondary],
        };
        Ok([Some(center), None, None])
    }

    /// Catalog designation such as `KV-4729`.
    ///
    /// Derived from a UUIDv5 of the cell key and sub-seed, so it is stable
    /// for a given universe and differs between universes.
    pub fn designation(&self) -> String {
        let mut name = [0u8; 16];
        name[..8].copy_from_slice(&self.key.raw().to_le_bytes());
        name[8..].copy_from_slice(&self.parameters.sub_seed.to_le_bytes());
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, &name);

        let bytes = id.as_bytes();
        let prefix1 = (bytes[0] % 26 + b'A') as char;
        let prefix2 = (bytes[1] % 26 + b'A') as char;
        let number = u16::from_le_bytes([bytes[2], bytes[3]]) % 10000;
        format!("{}{}-{:04}", prefix1, prefix2, number)
    }

    /// Galactic position of the system centre, metres
    pub fn origin(&self, config: &UniverseConfig) -> Vector3<f64> {
        let cell = config.cell_size_ly;
        let c = self.coordinate;
        let [ox, oy, oz] = self.parameters.offset_ly;
        Vector3::new(
            (f64::from(c.x) + 0.5) * cell + ox,
            (f64::from(c.y) + 0.5) * cell + oy,
            (f64::from(c.z) + 0.5) * cell + oz,
        ) * LIGHT_YEAR_TO_M
    }

    pub fn summary(&self, catalog: &Catalog) -> StarSystemSummary {
        StarSystemSummary {
            key: self.key,
            designation: self.designation(),
            coordinate: self.coordinate,
            parameters: self.parameters,
            central_bodies: self
                .central_bodies(catalog)
                .iter()
                .map(|slot| slot.as_ref().map(|body| body.summary()))
                .collect(),
        }
    }
}

/// Serializable snapshot of a star system and its root bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarSystemSummary {
    pub key: PositionKey,
    pub designation: String,
    pub coordinate: GalacticCoordinate,
    pub parameters: SystemParameters,
    pub central_bodies: Vec<Option<CelestialSummary>>,
}
