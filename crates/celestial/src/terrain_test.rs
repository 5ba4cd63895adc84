use nalgebra::Vector3;
use units::{Length, Mass};

use crate::body::Celestial;
use crate::kind::CelestialKind;
use crate::terrain::{
    SimplexTerrain, TerrainProfile, TerrainSampler, TerrainType, classify_height,
};
use crate::test_support::params;

/// Returns the same height everywhere
struct Flat(f64);

impl TerrainSampler for Flat {
    fn height(&self, _profile: &TerrainProfile, _direction: &Vector3<f64>) -> f64 {
        self.0
    }
}

fn planet() -> Celestial {
    let p = params(&[1, 0], Mass::from_earth_masses(1.0), Some(Length::from_au(1.0)));
    Celestial::new(p, CelestialKind::Planet, 0.0)
}

#[test]
fn test_only_solid_bodies_have_terrain() {
    assert!(planet().terrain_profile().is_some());

    let giant = Celestial::new(
        params(&[1, 1], Mass::from_jupiter_masses(1.0), Some(Length::from_au(5.0))),
        CelestialKind::GasGiant,
        0.0,
    );
    assert!(giant.terrain_profile().is_none());
    assert!(giant.terrain_height_at(&Vector3::x(), &Flat(0.0)).is_none());
}

#[test]
fn test_height_is_base_plus_scaled_sample() {
    let body = planet();
    let profile = body.terrain_profile().unwrap();
    assert_eq!(profile.base_radius, body.radius());

    let top = body.terrain_height_at(&Vector3::y(), &Flat(1.0)).unwrap();
    assert_eq!(top, profile.base_radius + profile.height_amplitude);

    let datum = body.terrain_height_at(&Vector3::y(), &Flat(0.0)).unwrap();
    assert_eq!(datum, profile.base_radius);

    // out-of-range samples are clamped
    let clamped = body.terrain_height_at(&Vector3::y(), &Flat(-4.0)).unwrap();
    assert_eq!(clamped, profile.base_radius - profile.height_amplitude);
}

#[test]
fn test_terrain_bands() {
    assert_eq!(classify_height(-0.5, 0.0), TerrainType::Ocean);
    assert_eq!(classify_height(0.1, 0.0), TerrainType::Lowland);
    assert_eq!(classify_height(0.5, 0.0), TerrainType::Highland);
    assert_eq!(classify_height(0.9, 0.0), TerrainType::Mountain);
    // asteroids have no ocean
    assert_eq!(classify_height(-1.0, -1.0), TerrainType::Lowland);
}

#[test]
fn test_simplex_terrain_is_deterministic_and_bounded() {
    let body = planet();
    let profile = body.terrain_profile().unwrap();
    let sampler = SimplexTerrain::default();

    for i in 0..200 {
        let t = f64::from(i) * 0.1;
        let dir = Vector3::new(t.cos(), (t * 0.7).sin(), t.sin());
        let h = sampler.height(&profile, &dir);
        assert!((-1.0..=1.0).contains(&h));
        // only the direction matters
        assert!((h - sampler.height(&profile, &(dir * 3.0))).abs() < 1e-9);
        assert!(body.terrain_type_at(&dir, &sampler).is_some());
    }
    assert_eq!(sampler.height(&profile, &Vector3::zeros()), 0.0);
}
