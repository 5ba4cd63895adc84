//! End-to-end checks against the public catalog API

use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use celestial::body::Celestial;
use celestial::{Catalog, CelestialKind, UniverseConfig};
use galactic_position::{GalacticCoordinate, PositionKey};

fn walk(body: &Arc<Celestial>, catalog: &Catalog, out: &mut Vec<Arc<Celestial>>) {
    out.push(Arc::clone(body));
    for child in body.children(catalog) {
        walk(&child, catalog, out);
    }
}

fn all_bodies(catalog: &Catalog, coordinate: GalacticCoordinate) -> Vec<Arc<Celestial>> {
    let mut bodies = Vec::new();
    if let Some(system) = catalog.star_system(coordinate) {
        for root in system.roots(catalog) {
            walk(&root, catalog, &mut bodies);
        }
    }
    bodies
}

fn populated_near(catalog: &Catalog, from: GalacticCoordinate) -> GalacticCoordinate {
    catalog
        .find_star_systems(from, 1, 20_000)
        .first()
        .map(|system| system.coordinate())
        .expect("a populated cell")
}

#[test]
fn test_single_star_cell_snapshot() {
    let catalog = Catalog::new(UniverseConfig::default());
    let coordinate = GalacticCoordinate::new(100_000, 2_000, 100_000).unwrap();
    let system = catalog.star_system(coordinate).expect("populated cell");

    assert_eq!(system.orbit_count(), 1);
    assert_eq!(system.central_body_count(), 1);
    let slots = system.central_bodies(&catalog);
    assert_eq!(slots.iter().flatten().count(), 1);
    assert!(slots[0].is_none() && slots[2].is_none());

    let star = slots[1].as_ref().unwrap();
    assert_eq!(star.kind(), CelestialKind::Star);
    assert_eq!(star.key(), system.key().child(1).unwrap());
    assert_relative_eq!(star.mass().to_kg(), 1.902_018_019_248_066_4e29, max_relative = 1e-12);
    assert_relative_eq!(star.radius().to_m(), 1.064_090_266_056_571_8e8, max_relative = 1e-9);
}

#[test]
fn test_tree_structure_holds_everywhere() {
    let catalog = Catalog::new(UniverseConfig::default());
    let from = GalacticCoordinate::new(100_000, 2_000, 100_000).unwrap();
    let coordinate = populated_near(&catalog, from);
    let system = catalog.star_system(coordinate).unwrap();

    assert!((1..=2).contains(&system.central_body_count()));
    let roots = system.roots(&catalog);
    assert!(!roots.is_empty());

    for body in all_bodies(&catalog, coordinate) {
        let key = body.key();
        assert_eq!(key.coordinate(), Some(coordinate));
        assert!(body.depth() <= 4);
        if body.kind() == CelestialKind::BinaryCenter {
            assert!(body.mass().is_zero());
        } else {
            assert!(body.mass().to_kg() > 0.0);
            assert!(body.radius().to_m() > 0.0);
        }

        let children = body.children(&catalog);
        if body.depth() == 4 {
            assert!(children.is_empty());
        }
        for (i, child) in children.iter().enumerate() {
            assert_eq!(child.key(), key.child(i as u8).unwrap());
            assert!(child.mass() <= body.mass() || body.kind() == CelestialKind::BinaryCenter);
        }

        if body.kind() == CelestialKind::BinaryCenter {
            assert_eq!(children.len(), 2);
        }

        let fetched = catalog.celestial(key).unwrap();
        assert!(Arc::ptr_eq(&fetched, &body));
    }
}

#[test]
fn test_same_seed_reproduces_universe() {
    let from = GalacticCoordinate::new(100_000, 2_000, 100_000).unwrap();
    let a = Catalog::new(UniverseConfig::default());
    let b = Catalog::new(UniverseConfig::default());

    let coordinate = populated_near(&a, from);
    assert_eq!(coordinate, populated_near(&b, from));

    let left = all_bodies(&a, coordinate);
    let right = all_bodies(&b, coordinate);
    assert_eq!(left.len(), right.len());
    for (x, y) in left.iter().zip(&right) {
        assert_eq!(x.summary(), y.summary());
    }

    let sa = a.star_system(coordinate).unwrap().summary(&a);
    let sb = b.star_system(coordinate).unwrap().summary(&b);
    assert_eq!(sa, sb);
}

#[test]
fn test_different_seed_changes_universe() {
    let center = GalacticCoordinate::new(131_072, 2_048, 131_072).unwrap();
    let a = Catalog::new(UniverseConfig::with_seed(1));
    let b = Catalog::new(UniverseConfig::with_seed(2));

    let presence = |catalog: &Catalog| -> Vec<bool> {
        (0..400)
            .filter_map(|step| center.step_x(step))
            .map(|c| catalog.is_populated(c))
            .collect()
    };
    assert_ne!(presence(&a), presence(&b));
}

#[test]
fn test_concurrent_lookups_share_instances() {
    let catalog = Arc::new(Catalog::new(UniverseConfig::default()));
    let from = GalacticCoordinate::new(131_072, 2_048, 131_072).unwrap();
    let coordinate = populated_near(&catalog, from);
    let key = PositionKey::reference_frame(coordinate).unwrap().child(1).unwrap();
    catalog.clear_cache();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let system = catalog.star_system(coordinate).unwrap();
                let body = catalog.celestial(key);
                let children = body
                    .as_ref()
                    .map(|b| b.children(&catalog))
                    .unwrap_or_default();
                (system, body, children)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let (system, body, children) = &results[0];
    for (s, b, c) in &results[1..] {
        assert!(Arc::ptr_eq(system, s));
        match (body, b) {
            (Some(x), Some(y)) => assert!(Arc::ptr_eq(x, y)),
            (None, None) => {}
            _ => panic!("threads disagree on {key}"),
        }
        assert_eq!(children.len(), c.len());
        for (x, y) in children.iter().zip(c) {
            assert!(Arc::ptr_eq(x, y));
        }
    }
}
