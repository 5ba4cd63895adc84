use std::sync::Arc;

use galactic_position::{GalacticCoordinate, PositionKey};
use units::{Length, Mass};

use crate::body::{Celestial, CelestialParams, ParentFrame};
use crate::catalog::Catalog;
use crate::orbit::Role;
use crate::star_system::StarSystem;

/// Middle of the galaxy, where the density field is highest
pub fn galactic_center() -> GalacticCoordinate {
    GalacticCoordinate::new(131_072, 2_048, 131_072).unwrap()
}

/// The first `count` populated systems along +x from the galactic centre
pub fn central_systems(catalog: &Catalog, count: usize) -> Vec<Arc<StarSystem>> {
    let systems = catalog.find_star_systems(galactic_center(), count, 5_000);
    assert_eq!(systems.len(), count, "not enough populated cells near the centre");
    systems
}

/// Depth-first walk over `body` and all of its descendants
pub fn visit_tree(body: &Arc<Celestial>, catalog: &Catalog, f: &mut dyn FnMut(&Arc<Celestial>)) {
    f(body);
    for child in body.children(catalog) {
        visit_tree(&child, catalog, f);
    }
}

pub fn sun_frame() -> ParentFrame {
    ParentFrame {
        mass: Mass::from_solar_masses(1.0),
        radius: Length::from_light_years(0.1),
        tilt_deg: 0.0,
        seed: 1,
    }
}

/// Parameters for a body orbiting a sun-like parent
pub fn params(levels: &[u8], mass: Mass, distance: Option<Length>) -> CelestialParams {
    CelestialParams {
        key: PositionKey::from_parts(1000, 100, 1000, levels).unwrap(),
        age_gyr: 4.5,
        mass,
        parent: sun_frame(),
        forced_orbit_distance: distance,
        forced_phase: None,
        forced_tilt_deg: None,
        orbit_budget: Length::from_au(10.0),
        seed: 42,
        role: Role::default(),
    }
}
