use approx::assert_relative_eq;

use crate::{Density, Length, Mass};

#[test]
fn test_earth_density() {
    let earth = Density::of_sphere(Mass::from_earth_masses(1.0), Length::from_earth_radii(1.0));
    assert!(
        (earth.to_kg_per_m3() - 5514.0).abs() < 20.0,
        "Earth density {} should be ~5514 kg/m³",
        earth.to_kg_per_m3()
    );
}

#[test]
fn test_sphere_radius_inverts_density() {
    let mass = Mass::from_kg(7.342e22);
    let density = Density::from_grams_per_cm3(3.34);
    let radius = density.sphere_radius(mass);

    assert_relative_eq!(
        Density::of_sphere(mass, radius).to_kg_per_m3(),
        density.to_kg_per_m3(),
        max_relative = 1e-12
    );
}

#[test]
fn test_zero_radius_is_zero_density() {
    assert_eq!(
        Density::of_sphere(Mass::zero(), Length::zero()),
        Density::zero()
    );
    assert!(Density::zero().sphere_radius(Mass::from_kg(1.0)).is_zero());
}
