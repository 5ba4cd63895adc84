use std::sync::Arc;

use units::Mass;

use crate::body::Celestial;
use crate::catalog::Catalog;
use crate::config::UniverseConfig;
use crate::generation::{CHILD_MASS_FRACTION, MAX_CHILDREN, target_child_count};
use crate::kind::CelestialKind;
use crate::test_support::{central_systems, visit_tree};

fn all_bodies(catalog: &Catalog, systems: usize) -> Vec<Arc<Celestial>> {
    let mut bodies = Vec::new();
    for system in central_systems(catalog, systems) {
        for root in system.roots(catalog) {
            visit_tree(&root, catalog, &mut |body| bodies.push(Arc::clone(body)));
        }
    }
    bodies
}

#[test]
fn test_target_counts_per_level() {
    let sun = Mass::from_solar_masses(1.0);
    for i in 0..=100 {
        let u = f64::from(i) / 100.0;
        assert!(target_child_count(0, sun, u) <= MAX_CHILDREN[0]);
        assert!(target_child_count(1, sun, u) <= MAX_CHILDREN[1]);
        assert!(target_child_count(2, sun, u) <= MAX_CHILDREN[2]);
        assert_eq!(target_child_count(3, sun, u), 0);
    }
    assert_eq!(target_child_count(1, sun, 1.0), MAX_CHILDREN[1]);
    assert_eq!(target_child_count(1, sun, 0.0), 0);
}

#[test]
fn test_small_bodies_get_fewer_moons() {
    let pebble = Mass::from_kg(1e16);
    let giant = Mass::from_kg(1e27);
    assert_eq!(target_child_count(2, pebble, 0.99), 0);
    assert!(target_child_count(2, giant, 0.99) > 30);
}

#[test]
fn test_every_accepted_child_fits_its_budget() {
    let catalog = Catalog::default();
    for body in all_bodies(&catalog, 12) {
        if body.kind() == CelestialKind::BinaryCenter {
            continue;
        }
        let budget = body.child_budget();
        for child in body.children(&catalog) {
            assert!(
                child.footprint() <= budget,
                "{} footprint {:e} over budget {:e}",
                child.key(),
                child.footprint().to_m(),
                budget.to_m()
            );
        }
    }
}

#[test]
fn test_children_sit_one_level_deeper() {
    let catalog = Catalog::default();
    for body in all_bodies(&catalog, 8) {
        if body.depth() == 4 {
            assert!(body.children(&catalog).is_empty());
        }
        for (index, child) in body.children(&catalog).iter().enumerate() {
            assert_eq!(child.depth(), body.depth() + 1);
            assert_eq!(child.key(), body.key().child(index as u8).unwrap());
            assert!(body.key().is_ancestor_of(&child.key()));
        }
    }
}

#[test]
fn test_children_are_lighter_than_their_parent() {
    let catalog = Catalog::default();
    for body in all_bodies(&catalog, 8) {
        if body.kind() == CelestialKind::BinaryCenter {
            continue;
        }
        for child in body.children(&catalog) {
            if child.kind() == CelestialKind::BinaryCenter {
                let pair: Mass = child
                    .children(&catalog)
                    .iter()
                    .fold(Mass::zero(), |sum, m| sum + m.mass());
                assert!(pair <= body.mass() * CHILD_MASS_FRACTION * 1.000_001);
            } else {
                assert!(child.mass() <= body.mass() * CHILD_MASS_FRACTION * 1.000_001);
            }
        }
    }
}

#[test]
fn test_accepted_children_are_committed_and_rejected_slot_is_not() {
    let catalog = Catalog::default();
    for body in all_bodies(&catalog, 8) {
        let children = body.children(&catalog);
        for child in &children {
            assert!(catalog.is_cached(child.key()));
        }
        if let Ok(next) = body.key().child(children.len() as u8) {
            assert!(!catalog.is_cached(next), "rolled-back {next} still cached");
        }
    }
}

#[test]
fn test_children_are_ordered_outward() {
    let catalog = Catalog::default();
    for body in all_bodies(&catalog, 8) {
        if body.kind() == CelestialKind::BinaryCenter {
            continue;
        }
        let distances: Vec<f64> = body
            .children(&catalog)
            .iter()
            .filter(|c| c.role().lagrange_point.is_none())
            .map(|c| c.orbit_distance().to_m())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]), "{distances:?}");
    }
}

#[test]
fn test_trojans_share_their_host_orbit() {
    let catalog = Catalog::default();
    let bodies = all_bodies(&catalog, 30);
    for body in &bodies {
        let children = body.children(&catalog);
        for (i, child) in children.iter().enumerate() {
            let Some(point) = child.role().lagrange_point else {
                continue;
            };
            let host = children[..i]
                .iter()
                .rev()
                .find(|c| c.role().has_lagrange_siblings)
                .expect("trojan without host");
            assert_eq!(child.orbit_distance(), host.orbit_distance());
            assert_eq!(child.orbit().tilt_deg, host.orbit().tilt_deg);
            let offset = child.orbit().initial_phase - host.orbit().initial_phase;
            assert!((offset - point.phase_offset()).abs() < 1e-12);
            assert!(child.mass() <= host.mass() * 1e-4);
            assert!(child.children(&catalog).is_empty());
        }
    }
}

#[test]
fn test_generation_is_reproducible_across_catalogs() {
    let a = Catalog::new(UniverseConfig::default());
    let b = Catalog::new(UniverseConfig::default());
    let left: Vec<_> = all_bodies(&a, 6).iter().map(|c| c.summary()).collect();
    let right: Vec<_> = all_bodies(&b, 6).iter().map(|c| c.summary()).collect();
    assert!(!left.is_empty());
    assert_eq!(left, right);
}

#[test]
fn test_children_are_generated_once() {
    let catalog = Catalog::default();
    let system = &central_systems(&catalog, 1)[0];
    let root = system.roots(&catalog).remove(0);
    let first = root.children(&catalog);
    let count = root.generated_child_count();
    let second = root.children(&catalog);
    assert_eq!(root.generated_child_count(), count);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert!(Arc::ptr_eq(a, b));
    }
}
