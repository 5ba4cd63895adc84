use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use nalgebra::Vector3;
use units::{Length, Mass};

use crate::orbit::{
    BinaryMember, LagrangePoint, OrbitalElements, Role, canonical_position, orbital_period,
    position_in_orbit,
};

fn earth_orbit() -> OrbitalElements {
    OrbitalElements {
        distance: Length::from_au(1.0),
        parent_mass: Mass::from_solar_masses(1.0),
        tilt_deg: 0.0,
        initial_phase: 0.0,
    }
}

#[test]
fn test_earth_period_is_one_year() {
    let period = orbital_period(Length::from_au(1.0), Mass::from_solar_masses(1.0));
    assert_relative_eq!(period.to_days(), 365.25, max_relative = 0.002);
}

#[test]
fn test_degenerate_period_is_zero() {
    assert_eq!(orbital_period(Length::zero(), Mass::from_kg(1e30)).to_seconds(), 0.0);
    assert_eq!(orbital_period(Length::from_au(1.0), Mass::zero()).to_seconds(), 0.0);
}

#[test]
fn test_zero_distance_is_origin() {
    let elements = OrbitalElements {
        distance: Length::zero(),
        ..earth_orbit()
    };
    let role = Role::binary(BinaryMember::Secondary);
    assert_eq!(position_in_orbit(&elements, 1, &role, 0.0, 0.0), Vector3::zeros());
    assert_eq!(position_in_orbit(&elements, 1, &role, 1e6, 0.0), Vector3::zeros());
}

#[test]
fn test_canonical_layout_at_time_zero() {
    let d = Length::from_meters(100.0);

    let primary = canonical_position(d, 1, &Role::binary(BinaryMember::Primary));
    assert_eq!(primary, Vector3::new(100.0, 0.0, 0.0));

    let secondary = canonical_position(d, 1, &Role::binary(BinaryMember::Secondary));
    assert_eq!(secondary, Vector3::new(-100.0, 0.0, 0.0));

    let l4 = canonical_position(d, 2, &Role::lagrange(LagrangePoint::L4));
    assert_relative_eq!(l4.x, 50.0, epsilon = 1e-9);
    assert_relative_eq!(l4.z, 100.0 * (PI / 3.0).sin(), epsilon = 1e-9);

    let l5 = canonical_position(d, 2, &Role::lagrange(LagrangePoint::L5));
    assert_relative_eq!(l5.z, -l4.z, epsilon = 1e-9);

    assert_eq!(canonical_position(d, 3, &Role::default()), Vector3::new(100.0, 0.0, 0.0));
    assert_eq!(canonical_position(d, 2, &Role::default()), Vector3::new(0.0, 0.0, 100.0));
}

#[test]
fn test_time_zero_ignores_initial_phase() {
    let role = Role::binary(BinaryMember::Secondary);
    for phase in [0.0, 1.0, 2.5, 6.0] {
        let elements = OrbitalElements {
            initial_phase: phase,
            ..earth_orbit()
        };
        let p = position_in_orbit(&elements, 1, &role, 0.0, 12345.0);
        assert_eq!(p, Vector3::new(-Length::from_au(1.0).to_m(), 0.0, 0.0));
    }
}

#[test]
fn test_position_stays_on_circle() {
    let elements = OrbitalElements {
        tilt_deg: 23.0,
        initial_phase: 0.3,
        ..earth_orbit()
    };
    for t in [1.0, 1e5, 3e7, 9.9e8] {
        let p = elements.position_at(t, 0.0);
        assert_relative_eq!(p.norm(), Length::from_au(1.0).to_m(), max_relative = 1e-12);
    }
}

#[test]
fn test_quarter_period_moves_quarter_turn() {
    let elements = earth_orbit();
    let quarter = elements.period().to_seconds() / 4.0;
    let m = elements.mean_anomaly(quarter, 0.0);
    assert_relative_eq!(m, FRAC_PI_2, max_relative = 1e-9);

    let p = position_in_orbit(&elements, 1, &Role::default(), quarter, 0.0);
    assert_relative_eq!(p.z, Length::from_au(1.0).to_m(), max_relative = 1e-9);
}

#[test]
fn test_epoch_offset_shifts_time() {
    let elements = earth_orbit();
    let a = elements.position_at(1000.0, 500.0);
    let b = elements.position_at(1500.0, 0.0);
    assert_relative_eq!(a, b, max_relative = 1e-12);
}

#[test]
fn test_tilt_lifts_orbit_out_of_plane() {
    let elements = OrbitalElements {
        tilt_deg: 90.0,
        ..earth_orbit()
    };
    let p = elements.position_at(1.0, 0.0);
    assert!(p.x.abs() < 1e-3 * p.y.abs());
}
