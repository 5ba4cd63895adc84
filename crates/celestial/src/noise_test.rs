use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::config::DensityFieldConfig;
use crate::noise::{GalaxyDensityField, Simplex3};

#[test]
fn test_simplex_is_deterministic_per_seed() {
    let a = Simplex3::new(1);
    let b = Simplex3::new(1);
    let c = Simplex3::new(2);
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut differs = false;
    for _ in 0..200 {
        let p: [f64; 3] = [
            rng.random::<f64>() * 50.0,
            rng.random::<f64>() * 50.0,
            rng.random::<f64>() * 50.0,
        ];
        assert_eq!(a.sample(p[0], p[1], p[2]), b.sample(p[0], p[1], p[2]));
        differs |= a.sample(p[0], p[1], p[2]) != c.sample(p[0], p[1], p[2]);
    }
    assert!(differs);
}

#[test]
fn test_simplex_is_bounded() {
    let noise = Simplex3::new(42);
    let mut rng = ChaChaRng::seed_from_u64(42);
    for _ in 0..5000 {
        let v = noise.sample(
            rng.random_range(-100.0..100.0),
            rng.random_range(-100.0..100.0),
            rng.random_range(-100.0..100.0),
        );
        assert!((-1.05..=1.05).contains(&v), "sample {v}");
    }
}

#[test]
fn test_simplex_is_continuous() {
    let noise = Simplex3::new(3);
    let a = noise.sample(1.25, 2.5, 3.75);
    let b = noise.sample(1.25 + 1e-6, 2.5, 3.75);
    assert!((a - b).abs() < 1e-3);
}

#[test]
fn test_density_zero_outside_domain() {
    let field = GalaxyDensityField::new(DensityFieldConfig::default(), 1);
    assert_eq!(field.sample([1.5, 0.0, 0.0]), 0.0);
    assert_eq!(field.sample([0.0, -1.1, 0.0]), 0.0);
    // inside the cube but beyond the disk radius
    assert_eq!(field.sample([0.9, 0.0, 0.9]), 0.0);
}

#[test]
fn test_density_peaks_at_center() {
    let field = GalaxyDensityField::new(DensityFieldConfig::default(), 1);
    let center = field.sample([0.0, 0.0, 0.0]);
    let rim = field.sample([0.0, 0.0, 0.95]);
    let halo = field.sample([0.0, 0.8, 0.0]);
    assert!(center > rim);
    assert!(center > halo);
    assert!(center > 0.5);
}

#[test]
fn test_density_is_clamped() {
    let field = GalaxyDensityField::new(DensityFieldConfig::default(), 9);
    let mut rng = ChaChaRng::seed_from_u64(42);
    for _ in 0..2000 {
        let p = [
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        ];
        let d = field.sample(p);
        assert!((0.0..=1.0).contains(&d));
    }
}
