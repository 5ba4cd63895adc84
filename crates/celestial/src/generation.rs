//! Child generation
//!
//! Children are fitted outward from the parent, one orbit at a time, into the
//! radial budget the parent may hand out. Each pass draws a candidate, stages
//! it outside the catalog, and either commits it or rolls it back:
//!
//! 1. compute the budget (full parent radius for unbound roots, otherwise
//!    the tighter of the inherited budget and 2% of the orbit distance)
//! 2. pick a target count for the parent's level
//! 3. draw a candidate mass, age and orbit; occasionally a binary pair
//! 4. reject the candidate and stop once its footprint leaves the budget
//! 5. after a massive acceptance, maybe add trojan companions at L4/L5
//!
//! A rejected candidate ends generation. It is a normal outcome and never
//! surfaces as an error.

use std::f64::consts::TAU;

use galactic_position::{LEVEL_CAPACITY, MAX_DEPTH, PositionKey};
use rand::Rng;
use tracing::{debug, trace};
use units::{GRAVITATIONAL_CONSTANT, Length, Mass, SECONDS_PER_DAY};

use crate::binary::{BinaryLayout, child_separation, split_mass};
use crate::body::{Blueprint, Celestial, CelestialParams, ParentFrame};
use crate::catalog::Catalog;
use crate::kind::CelestialKind;
use crate::orbit::{BinaryMember, LagrangePoint, Role};
use crate::sampling::{center_distributed, log_mix, smoothstep};
use crate::seed::{SeedStream, derive_seed};

/// Largest child count per generation level; level 3 has none
pub const MAX_CHILDREN: [usize; 3] = [3, 20, 40];

/// Lightest body ever generated
pub const MIN_CHILD_MASS_KG: f64 = 1e15;
/// Heaviest child as a fraction of its parent
pub const CHILD_MASS_FRACTION: f64 = 0.05;
/// Children younger than this end generation
pub const MIN_AGE_GYR: f64 = 0.01;

const CAPTURE_CHANCE: f64 = 0.01;
const BINARY_CHANCE: f64 = 0.04;

const LAGRANGE_MIN_MASS_KG: f64 = 1e23;
const LAGRANGE_MIN_MASS_RATIO: f64 = 25.0;
const LAGRANGE_MIN_FREE_SLOTS: usize = 4;
const LAGRANGE_CHANCE: f64 = 0.3;
const L5_CHANCE: f64 = 0.5;

const GENERATION_SALT: u64 = 0x4745_4E45;
const L4_SALT: u64 = 0x4C34;
const L5_SALT: u64 = 0x4C35;
const PAIR_SALT: u64 = 0x5041_4952;

/// Orbit radius with a one-day period around `mass`
fn one_day_orbit(mass: Mass) -> Length {
    let n = TAU / SECONDS_PER_DAY;
    Length::from_meters((GRAVITATIONAL_CONSTANT * mass.to_kg() / (n * n)).cbrt())
}

/// Target child count for a parent at `level`
pub fn target_child_count(level: usize, mass: Mass, u: f64) -> usize {
    let Some(&max) = MAX_CHILDREN.get(level) else {
        return 0;
    };
    let max = if level == 2 {
        // more moons around heavier bodies
        (max as f64 * smoothstep(18.0, 27.0, mass.log10_kg())).round() as usize
    } else {
        max
    };
    ((center_distributed(u, 1) * (max as f64 + 1.0)).floor() as usize).min(max)
}

/// Generates the children of `parent`, committing accepted ones to `catalog`
/// and returning the blueprint of each
pub(crate) fn generate_children(parent: &Celestial, catalog: &Catalog) -> Vec<Blueprint> {
    let level = parent.level();
    if parent.kind() == CelestialKind::BinaryCenter || parent.depth() >= MAX_DEPTH {
        return Vec::new();
    }
    let capacity = usize::from(LEVEL_CAPACITY[parent.depth()]);

    let budget = parent.child_budget();
    let mut rng = SeedStream::new(derive_seed(parent.seed(), GENERATION_SALT));
    let target = target_child_count(level, parent.mass(), rng.random()).min(capacity);
    let mass_ceiling = parent.mass().to_kg() * CHILD_MASS_FRACTION;

    let start = (parent.radius() * 2.0).max(one_day_orbit(parent.mass()));
    let mut used = start * log_mix(1.0, 20.0, rng.random());
    let mut children: Vec<Blueprint> = Vec::with_capacity(target);

    while children.len() < target {
        // fixed draw order keeps every candidate reproducible
        let u_gap: f64 = rng.random();
        let u_mass: f64 = rng.random();
        let u_age: f64 = rng.random();
        let u_capture: f64 = rng.random();
        let u_captured_age: f64 = rng.random();
        let u_binary: f64 = rng.random();
        let u_lagrange: f64 = rng.random();
        let u_l5: f64 = rng.random();

        if mass_ceiling <= MIN_CHILD_MASS_KG {
            break;
        }

        let index = children.len();
        let Ok(key) = parent.key().child(index as u8) else {
            break;
        };

        let distance = used * (1.0 + log_mix(0.15, 1.0, u_gap));
        let mass = Mass::from_kg(log_mix(
            MIN_CHILD_MASS_KG,
            mass_ceiling,
            center_distributed(u_mass, 1),
        ));
        let age_gyr = if u_capture < CAPTURE_CHANCE {
            log_mix(0.001, 13.0, u_captured_age)
        } else {
            parent.age_gyr() * log_mix(0.6, 1.0, u_age)
        };
        if age_gyr < MIN_AGE_GYR {
            debug!(%key, age_gyr, "child too young, stopping");
            break;
        }

        let is_binary = key.depth() < MAX_DEPTH && u_binary < BINARY_CHANCE;
        let lagrange = !is_binary
            && mass.to_kg() > LAGRANGE_MIN_MASS_KG
            && parent.mass() / mass > LAGRANGE_MIN_MASS_RATIO
            && capacity - index > LAGRANGE_MIN_FREE_SLOTS
            && u_lagrange < LAGRANGE_CHANCE;

        let params = CelestialParams {
            key,
            age_gyr,
            mass,
            parent: frame_of(parent),
            forced_orbit_distance: Some(distance),
            forced_phase: None,
            forced_tilt_deg: None,
            orbit_budget: distance - used,
            seed: derive_seed(parent.seed(), index as u64 + 1),
            role: Role {
                has_lagrange_siblings: lagrange,
                ..Role::default()
            },
        };

        let blueprint = if is_binary {
            pair_blueprint(catalog, params)
        } else {
            Some(Blueprint::Body(params))
        };
        let staged = blueprint.map(|blueprint| (blueprint, catalog.stage(&blueprint)));

        let Some((blueprint, candidate)) = staged.filter(|(_, c)| c.footprint() <= budget) else {
            debug!(%key, budget_m = budget.to_m(), "candidate exceeds budget, rolling back");
            catalog.clear_celestial_cache(key);
            break;
        };

        let candidate = catalog.commit(candidate);
        trace!(%key, kind = %candidate.kind(), distance_m = distance.to_m(), "accepted child");
        used = candidate.footprint() * 1.2;
        children.push(blueprint);

        if lagrange {
            let points = if u_l5 < L5_CHANCE {
                &[LagrangePoint::L4, LagrangePoint::L5][..]
            } else {
                &[LagrangePoint::L4][..]
            };
            for &point in points {
                if children.len() >= capacity {
                    break;
                }
                let Some(params) = trojan_params(parent, &candidate, point, children.len()) else {
                    break;
                };
                let trojan = catalog.stage_celestial(params);
                if trojan.footprint() > budget {
                    debug!(key = %trojan.key(), "trojan exceeds budget, rolling back");
                    catalog.clear_celestial_cache(trojan.key());
                    break;
                }
                trace!(key = %trojan.key(), ?point, "accepted trojan");
                catalog.commit(trojan);
                children.push(Blueprint::Body(params));
            }
        }
    }

    debug!(key = %parent.key(), count = children.len(), target, "generated children");
    children
}

fn frame_of(parent: &Celestial) -> ParentFrame {
    ParentFrame {
        mass: parent.mass(),
        radius: parent.radius(),
        tilt_deg: parent.orbit().tilt_deg,
        seed: parent.seed(),
    }
}

/// Replaces a single candidate with a binary pair: a zero-mass centre on
/// the candidate's orbit and two members splitting the candidate's mass.
/// `None` when the members would overlap.
fn pair_blueprint(catalog: &Catalog, params: CelestialParams) -> Option<Blueprint> {
    let mut stream = SeedStream::new(derive_seed(params.seed, PAIR_SALT));
    let u_split: f64 = stream.random();
    let u_separation: f64 = stream.random();
    let u_phase: f64 = stream.random();
    let u_tilt: f64 = stream.random();

    let distance = params.forced_orbit_distance?;
    let (primary_mass, secondary_mass) = split_mass(params.mass, u_split);
    let separation = child_separation(distance, u_separation);
    let layout = BinaryLayout::new(primary_mass, secondary_mass, separation, u_phase * TAU);
    let tilt_deg = params.parent.tilt_deg + (center_distributed(u_tilt, 1) - 0.5) * 20.0;

    let members = [
        (BinaryMember::Primary, primary_mass, &layout.primary, 1),
        (BinaryMember::Secondary, secondary_mass, &layout.secondary, 2),
    ]
    .map(|(which, mass, orbit, salt)| {
        let key = params.key.child(salt - 1).ok()?;
        Some(CelestialParams {
            key,
            age_gyr: params.age_gyr,
            mass,
            parent: ParentFrame {
                mass: orbit.effective_parent_mass,
                radius: Length::zero(),
                tilt_deg,
                seed: params.seed,
            },
            forced_orbit_distance: Some(orbit.distance),
            forced_phase: Some(orbit.phase),
            forced_tilt_deg: Some(tilt_deg),
            orbit_budget: params.orbit_budget,
            seed: derive_seed(params.seed, u64::from(salt)),
            role: Role::binary(which),
        })
    });
    let [Some(primary), Some(secondary)] = members else {
        return None;
    };

    let radius = |member: CelestialParams| catalog.stage_celestial(member).radius();
    if !layout.members_fit(radius(primary), radius(secondary)) {
        debug!(key = %params.key, "binary members overlap");
        return None;
    }

    Some(Blueprint::Pair {
        center: CelestialParams {
            forced_tilt_deg: Some(tilt_deg),
            ..params
        },
        members: [primary, secondary],
    })
}

/// Parameters of a lightweight companion sharing `host`'s orbit at `point`
fn trojan_params(
    parent: &Celestial,
    host: &Celestial,
    point: LagrangePoint,
    index: usize,
) -> Option<CelestialParams> {
    let key: PositionKey = parent.key().child(index as u8).ok()?;
    let salt = match point {
        LagrangePoint::L4 => L4_SALT,
        LagrangePoint::L5 => L5_SALT,
    };
    // identity follows the host, not the slot the trojan lands in
    let seed = derive_seed(host.seed(), salt);
    let mut stream = SeedStream::new(seed);
    let u_mass: f64 = stream.random();
    let u_age: f64 = stream.random();

    let mass = Mass::from_kg(log_mix(1e12, host.mass().to_kg() * 1e-4, u_mass));
    let age_gyr = host.age_gyr() * log_mix(0.01, 0.9, u_age);

    Some(CelestialParams {
        key,
        age_gyr,
        mass,
        parent: frame_of(parent),
        forced_orbit_distance: Some(host.orbit_distance()),
        forced_phase: Some(host.orbit().initial_phase + point.phase_offset()),
        forced_tilt_deg: Some(host.orbit().tilt_deg),
        orbit_budget: Length::zero(),
        seed,
        role: Role::lagrange(point),
    })
}
