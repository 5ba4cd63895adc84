//! Hierarchical celestial bodies
//!
//! A [`Celestial`] is one node of a star system's body tree. Its concrete
//! [`CelestialKind`] and every physical attribute are derived once, at
//! construction, from the creation parameters and the body's own seed. Only
//! the child list is deferred; it is generated on first request through the
//! [`Catalog`] and then fixed for the lifetime of the node.
//!
//! A node keeps [`Blueprint`]s for its children, never the children
//! themselves. The catalog is the only owner of a body, so evicting one
//! releases it and the next lookup rebuilds it from its blueprint.

use std::f64::consts::TAU;
use std::sync::{Arc, OnceLock};

use galactic_position::PositionKey;
use serde::{Deserialize, Serialize};
use units::{
    Density, GRAVITATIONAL_CONSTANT, Length, Mass, SECONDS_PER_YEAR, SPEED_OF_LIGHT, Time,
    Velocity,
};

use crate::catalog::Catalog;
use crate::generation;
use crate::kind::CelestialKind;
use crate::orbit::{self, OrbitalElements, Role};
use crate::sampling::{center_distributed, log_mix};
use crate::seed::SeedStream;

/// Largest random deviation of a child's orbital plane from its parent's
const TILT_SPREAD_DEG: f64 = 20.0;

/// Inverse tidal dissipation factor Q/k₂ for a rigid, Earth-like body
const TIDAL_Q_OVER_K2: f64 = 100.0;

/// Spin at formation, a 12 hour day
const INITIAL_SPIN_RAD_S: f64 = 1.45e-4;

const JUPITER_RADIUS_M: f64 = 6.9911e7;

/// What a body knows about the thing it orbits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParentFrame {
    pub mass: Mass,
    pub radius: Length,
    pub tilt_deg: f64,
    pub seed: u64,
}

/// Everything needed to construct a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialParams {
    pub key: PositionKey,
    pub age_gyr: f64,
    pub mass: Mass,
    pub parent: ParentFrame,
    /// Orbit distance; `None` leaves the body unbound at its parent's centre
    pub forced_orbit_distance: Option<Length>,
    /// Initial phase in radians; `None` rolls one from the body's seed
    pub forced_phase: Option<f64>,
    /// Orbital plane tilt in degrees; `None` perturbs the parent's tilt
    pub forced_tilt_deg: Option<f64>,
    /// Radial room the parent grants this body and its children
    pub orbit_budget: Length,
    pub seed: u64,
    pub role: Role,
}

/// Attributes fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAttributes {
    pub density: Density,
    pub radius: Length,
    pub orbit: OrbitalElements,
    pub orbital_period: Time,
    pub tidally_locked: bool,
    pub axial_tilt_deg: f64,
    pub rotation_period: Time,
    /// Rotation angle at `t = 0`, radians
    pub initial_rotation: f64,
}

impl PhysicalAttributes {
    /// Derives every attribute from `params`.
    ///
    /// All seven draws are taken from the body's seed in a fixed order
    /// whether or not the kind uses them, so an attribute never depends on
    /// which branch another attribute took.
    pub fn derive(kind: CelestialKind, params: &CelestialParams) -> Self {
        let mut stream = SeedStream::new(params.seed);
        let u_density = stream.next_float();
        let u_radius = stream.next_float();
        let u_phase = stream.next_float();
        let u_tilt = stream.next_float();
        let u_axial = stream.next_float();
        let u_rotation = stream.next_float();
        let u_spin = stream.next_float();

        let (density, radius) = body_size(kind, params.mass, u_density, u_radius);

        let tilt_deg = params.forced_tilt_deg.unwrap_or_else(|| {
            params.parent.tilt_deg + (center_distributed(u_tilt, 1) - 0.5) * TILT_SPREAD_DEG
        });
        let orbit = OrbitalElements {
            distance: params.forced_orbit_distance.unwrap_or(Length::zero()),
            parent_mass: params.parent.mass,
            tilt_deg,
            initial_phase: params.forced_phase.unwrap_or(u_phase * TAU),
        };
        let orbital_period = orbit.period();

        let tidally_locked = kind != CelestialKind::BinaryCenter
            && !orbit.distance.is_zero()
            && tidal_locking_timescale_years(
                orbit.distance,
                params.parent.mass,
                radius,
                params.mass,
            ) < params.age_gyr * 1e9;

        let (axial_tilt_deg, rotation_period) = if tidally_locked {
            (0.0, orbital_period)
        } else if kind == CelestialKind::BinaryCenter {
            (0.0, Time::zero())
        } else {
            (u_axial.powi(3) * 180.0, rotation_period(kind, u_rotation))
        };

        Self {
            density,
            radius,
            orbit,
            orbital_period,
            tidally_locked,
            axial_tilt_deg,
            rotation_period,
            initial_rotation: u_spin * TAU,
        }
    }
}

/// Density and radius of a body of `kind` and `mass`
fn body_size(
    kind: CelestialKind,
    mass: Mass,
    u_density: f64,
    u_radius: f64,
) -> (Density, Length) {
    let from_density = |density: Density| (density, density.sphere_radius(mass));
    let from_radius = |radius: Length| (Density::of_sphere(mass, radius), radius);

    match kind {
        CelestialKind::BinaryCenter => (Density::zero(), Length::zero()),
        CelestialKind::Asteroid => {
            from_density(Density::from_kg_per_m3(1200.0 + 2300.0 * u_density))
        }
        CelestialKind::Planet => {
            from_density(Density::from_kg_per_m3(log_mix(3000.0, 8000.0, u_density)))
        }
        CelestialKind::GasGiant => {
            from_density(Density::from_kg_per_m3(log_mix(600.0, 2000.0, u_density)))
        }
        // degeneracy pressure pins brown dwarfs near Jupiter's size
        CelestialKind::BrownDwarf => {
            from_radius(Length::from_meters(JUPITER_RADIUS_M * (0.8 + 0.4 * u_radius)))
        }
        CelestialKind::Star => {
            from_radius(Length::from_solar_radii(mass.to_solar_masses().powf(0.8)))
        }
        CelestialKind::HyperGiant => {
            from_radius(Length::from_solar_radii(log_mix(100.0, 1500.0, u_radius)))
        }
        CelestialKind::BlackHole | CelestialKind::SuperMassiveBlackHole => {
            from_radius(schwarzschild_radius(mass))
        }
    }
}

/// Radius a body of this kind and mass has at the middle of its random range
pub fn nominal_radius(kind: CelestialKind, mass: Mass) -> Length {
    body_size(kind, mass, 0.5, 0.5).1
}

pub fn schwarzschild_radius(mass: Mass) -> Length {
    let c2 = SPEED_OF_LIGHT * SPEED_OF_LIGHT;
    Length::from_meters(2.0 * GRAVITATIONAL_CONSTANT * mass.to_kg() / c2)
}

/// Tidal locking timescale in years
///
/// Gladman et al. (1996), for a body spun up at formation:
///
/// ```text
/// τ_lock = ω a⁶ I (Q/k₂) / (3 G M² R⁵),   I = 0.4 m R²
/// ```
pub fn tidal_locking_timescale_years(
    distance: Length,
    parent_mass: Mass,
    radius: Length,
    mass: Mass,
) -> f64 {
    let r = radius.to_m();
    let denominator = 3.0 * GRAVITATIONAL_CONSTANT * parent_mass.to_kg().powi(2) * r * r * r;
    if denominator <= 0.0 {
        return f64::INFINITY;
    }
    let numerator =
        0.4 * INITIAL_SPIN_RAD_S * distance.powi(6) * mass.to_kg() * TIDAL_Q_OVER_K2;
    numerator / denominator / SECONDS_PER_YEAR
}

fn rotation_period(kind: CelestialKind, u: f64) -> Time {
    match kind {
        CelestialKind::BinaryCenter => Time::zero(),
        CelestialKind::Asteroid => Time::from_hours(log_mix(2.0, 24.0, u)),
        CelestialKind::Planet => Time::from_hours(log_mix(8.0, 100.0, u)),
        CelestialKind::GasGiant => Time::from_hours(log_mix(9.0, 20.0, u)),
        CelestialKind::BrownDwarf => Time::from_hours(log_mix(1.0, 10.0, u)),
        CelestialKind::Star => Time::from_days(log_mix(1.0, 40.0, u)),
        CelestialKind::HyperGiant => Time::from_days(log_mix(100.0, 3000.0, u)),
        CelestialKind::BlackHole | CelestialKind::SuperMassiveBlackHole => {
            Time::from_seconds(log_mix(1e-3, 1.0, u))
        }
    }
}

/// How to rebuild the body in one child slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Blueprint {
    /// A single body whose kind follows from its mass
    Body(CelestialParams),
    /// A barycentre over two members
    Pair {
        center: CelestialParams,
        members: [CelestialParams; 2],
    },
}

impl Blueprint {
    pub(crate) fn key(&self) -> PositionKey {
        match self {
            Self::Body(params) => params.key,
            Self::Pair { center, .. } => center.key,
        }
    }
}

/// One node of a star system's body tree
#[derive(Debug)]
pub struct Celestial {
    params: CelestialParams,
    kind: CelestialKind,
    attributes: PhysicalAttributes,
    epoch_offset_s: f64,
    children: OnceLock<Vec<Blueprint>>,
}

impl Celestial {
    pub(crate) fn new(params: CelestialParams, kind: CelestialKind, epoch_offset_s: f64) -> Self {
        Self {
            params,
            kind,
            attributes: PhysicalAttributes::derive(kind, &params),
            epoch_offset_s,
            children: OnceLock::new(),
        }
    }

    /// A zero-mass barycentre whose children are exactly `members`
    pub(crate) fn binary_center(
        params: CelestialParams,
        members: [CelestialParams; 2],
        epoch_offset_s: f64,
    ) -> Self {
        let params = CelestialParams {
            mass: Mass::zero(),
            ..params
        };
        let center = Self::new(params, CelestialKind::BinaryCenter, epoch_offset_s);
        center
            .children
            .get_or_init(|| members.map(Blueprint::Body).to_vec());
        center
    }

    /// The parameters this body was built from
    pub fn params(&self) -> &CelestialParams {
        &self.params
    }

    pub fn key(&self) -> PositionKey {
        self.params.key
    }

    pub fn kind(&self) -> CelestialKind {
        self.kind
    }

    pub fn age_gyr(&self) -> f64 {
        self.params.age_gyr
    }

    pub fn mass(&self) -> Mass {
        self.params.mass
    }

    pub fn radius(&self) -> Length {
        self.attributes.radius
    }

    pub fn density(&self) -> Density {
        self.attributes.density
    }

    pub fn parent_frame(&self) -> &ParentFrame {
        &self.params.parent
    }

    pub fn seed(&self) -> u64 {
        self.params.seed
    }

    pub fn parent_seed(&self) -> u64 {
        self.params.parent.seed
    }

    pub fn role(&self) -> &Role {
        &self.params.role
    }

    pub fn orbit_budget(&self) -> Length {
        self.params.orbit_budget
    }

    pub fn attributes(&self) -> &PhysicalAttributes {
        &self.attributes
    }

    pub fn orbit(&self) -> &OrbitalElements {
        &self.attributes.orbit
    }

    pub fn orbit_distance(&self) -> Length {
        self.attributes.orbit.distance
    }

    pub fn orbital_period(&self) -> Time {
        self.attributes.orbital_period
    }

    pub fn epoch_offset_s(&self) -> f64 {
        self.epoch_offset_s
    }

    /// Number of path levels in this body's key
    pub fn depth(&self) -> usize {
        self.params.key.depth()
    }

    /// Generation level; star system roots are level 0
    pub fn level(&self) -> usize {
        self.depth().saturating_sub(1)
    }

    /// Distance between the two members, for a binary centre
    pub fn binary_separation(&self) -> Option<Length> {
        if self.kind != CelestialKind::BinaryCenter {
            return None;
        }
        let members = self.children.get()?;
        Some(members.iter().fold(Length::zero(), |sum, member| match member {
            Blueprint::Body(params) => {
                sum + params.forced_orbit_distance.unwrap_or(Length::zero())
            }
            Blueprint::Pair { .. } => sum,
        }))
    }

    /// Radial extent this body claims around its parent: its orbit distance
    /// plus its diameter, or plus 1.1× the internal separation for a binary
    /// centre
    pub fn footprint(&self) -> Length {
        match self.binary_separation() {
            Some(separation) => self.orbit_distance() + separation * 1.1,
            None => self.orbit_distance() + self.radius() * 2.0,
        }
    }

    /// Radial room available to this body's children
    pub fn child_budget(&self) -> Length {
        if self.orbit_distance().is_zero() {
            self.params.parent.radius
        } else {
            self.params.orbit_budget.min(self.orbit_distance() * 0.02)
        }
    }

    /// Offset from the parent at `timestamp_s` seconds, metres
    pub fn position_in_orbit(&self, timestamp_s: f64) -> nalgebra::Vector3<f64> {
        orbit::position_in_orbit(
            &self.attributes.orbit,
            self.depth() as u8,
            &self.params.role,
            timestamp_s,
            self.epoch_offset_s,
        )
    }

    fn blueprints(&self, catalog: &Catalog) -> &[Blueprint] {
        self.children
            .get_or_init(|| generation::generate_children(self, catalog))
    }

    /// Child bodies, generated on first call and fetched from `catalog`,
    /// which rebuilds any that were evicted
    pub fn children(&self, catalog: &Catalog) -> Vec<Arc<Celestial>> {
        self.blueprints(catalog)
            .iter()
            .map(|blueprint| catalog.realize(blueprint))
            .collect()
    }

    pub fn child(&self, index: u8, catalog: &Catalog) -> Option<Arc<Celestial>> {
        self.blueprints(catalog)
            .get(usize::from(index))
            .map(|blueprint| catalog.realize(blueprint))
    }

    pub fn child_count(&self, catalog: &Catalog) -> usize {
        self.blueprints(catalog).len()
    }

    /// Number of children if they have been generated, without generating them
    pub fn generated_child_count(&self) -> Option<usize> {
        self.children.get().map(Vec::len)
    }

    pub fn surface_gravity(&self) -> f64 {
        let r = self.radius().to_m();
        if r <= 0.0 {
            return 0.0;
        }
        GRAVITATIONAL_CONSTANT * self.mass().to_kg() / (r * r)
    }

    pub fn escape_velocity(&self) -> Velocity {
        let r = self.radius().to_m();
        if r <= 0.0 {
            return Velocity::from_meters_per_sec(0.0);
        }
        let v2 = 2.0 * GRAVITATIONAL_CONSTANT * self.mass().to_kg() / r;
        Velocity::from_meters_per_sec(v2.sqrt())
    }

    /// Hill sphere radius around the parent, zero when unbound
    pub fn hill_radius(&self) -> Length {
        let parent_mass = self.params.parent.mass;
        if parent_mass.is_zero() {
            return Length::zero();
        }
        self.orbit_distance() * (self.mass() / (parent_mass * 3.0)).cbrt()
    }

    pub fn summary(&self) -> CelestialSummary {
        CelestialSummary {
            key: self.key(),
            kind: self.kind,
            mass_kg: self.mass().to_kg(),
            mass_solar: self.mass().to_solar_masses(),
            radius_m: self.radius().to_m(),
            density_kg_m3: self.density().to_kg_per_m3(),
            age_gyr: self.age_gyr(),
            orbit_distance_m: self.orbit_distance().to_m(),
            orbital_period_s: self.orbital_period().to_seconds(),
            orbit_tilt_deg: self.attributes.orbit.tilt_deg,
            tidally_locked: self.attributes.tidally_locked,
            axial_tilt_deg: self.attributes.axial_tilt_deg,
            rotation_period_s: self.attributes.rotation_period.to_seconds(),
            role: self.params.role,
        }
    }
}

/// Two bodies are equal when every construction-time field matches;
/// generated children are not compared
impl PartialEq for Celestial {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && self.kind == other.kind
            && self.attributes == other.attributes
            && self.epoch_offset_s == other.epoch_offset_s
    }
}

/// Serializable snapshot of a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialSummary {
    pub key: PositionKey,
    pub kind: CelestialKind,
    pub mass_kg: f64,
    pub mass_solar: f64,
    pub radius_m: f64,
    pub density_kg_m3: f64,
    pub age_gyr: f64,
    pub orbit_distance_m: f64,
    pub orbital_period_s: f64,
    pub orbit_tilt_deg: f64,
    pub tidally_locked: bool,
    pub axial_tilt_deg: f64,
    pub rotation_period_s: f64,
    pub role: Role,
}
