//! Simplex noise and the galaxy density field

use std::f64::consts::TAU;

use crate::config::DensityFieldConfig;
use crate::seed::SeedStream;

const GRADIENTS: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

/// Seeded 3D simplex noise, output roughly in `[-1, 1]`
#[derive(Debug, Clone)]
pub struct Simplex3 {
    perm: [u8; 512],
}

impl Simplex3 {
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut stream = SeedStream::new(seed);
        for i in (1..table.len()).rev() {
            let j = stream.next_int() as usize % (i + 1);
            table.swap(i, j);
        }

        let perm = std::array::from_fn(|i| table[i & 255]);
        Self { perm }
    }

    fn gradient_index(&self, i: i64, j: i64, k: i64) -> usize {
        let p = |v: i64| i64::from(self.perm[(v & 511) as usize]);
        let ii = i & 255;
        let jj = j & 255;
        let kk = k & 255;
        (p(ii + p(jj + p(kk))) % 12) as usize
    }

    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        // skew into simplex cell space
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        let (o1, o2) = if x0 >= y0 {
            if y0 >= z0 {
                ([1, 0, 0], [1, 1, 0])
            } else if x0 >= z0 {
                ([1, 0, 0], [1, 0, 1])
            } else {
                ([0, 0, 1], [1, 0, 1])
            }
        } else if y0 < z0 {
            ([0, 0, 1], [0, 1, 1])
        } else if x0 < z0 {
            ([0, 1, 0], [0, 1, 1])
        } else {
            ([0, 1, 0], [1, 1, 0])
        };

        let corners = [
            ([0, 0, 0], 0.0),
            (o1, G3),
            (o2, 2.0 * G3),
            ([1, 1, 1], 3.0 * G3),
        ];

        let (i, j, k) = (i as i64, j as i64, k as i64);
        let total: f64 = corners
            .iter()
            .map(|(offset, g)| {
                let dx = x0 - f64::from(offset[0]) + g;
                let dy = y0 - f64::from(offset[1]) + g;
                let dz = z0 - f64::from(offset[2]) + g;
                let falloff = 0.6 - dx * dx - dy * dy - dz * dz;
                if falloff <= 0.0 {
                    return 0.0;
                }
                let grad = GRADIENTS[self.gradient_index(
                    i + i64::from(offset[0]),
                    j + i64::from(offset[1]),
                    k + i64::from(offset[2]),
                )];
                let f2 = falloff * falloff;
                f2 * f2 * (grad[0] * dx + grad[1] * dy + grad[2] * dz)
            })
            .sum();

        32.0 * total
    }
}

/// Galaxy-shaped density over the normalised cube `[-1, 1]^3`.
///
/// `y` is the axis perpendicular to the galactic plane. The field combines an
/// exponential disk modulated by logarithmic spiral arms, a gaussian bulge, and
/// multiplicative simplex noise. Values are clamped to `[0, 1]`; points outside
/// the cube or beyond the unit radius in the plane return 0.
#[derive(Debug, Clone)]
pub struct GalaxyDensityField {
    config: DensityFieldConfig,
    noise: Simplex3,
}

impl GalaxyDensityField {
    pub fn new(config: DensityFieldConfig, seed: u64) -> Self {
        Self {
            config,
            noise: Simplex3::new(seed),
        }
    }

    pub fn sample(&self, [x, y, z]: [f64; 3]) -> f64 {
        if [x, y, z].iter().any(|v| !(-1.0..=1.0).contains(v)) {
            return 0.0;
        }
        let r = (x * x + z * z).sqrt();
        if r > 1.0 {
            return 0.0;
        }

        let cfg = &self.config;
        let disk = (-r / cfg.disk_scale_length).exp() * (-y.abs() / cfg.disk_scale_height).exp();

        let arms = if cfg.arm_count == 0 {
            1.0
        } else {
            let theta = z.atan2(x);
            let spiral = cfg.arm_winding * r.max(1e-6).ln() / TAU;
            let phase = f64::from(cfg.arm_count) * (theta - spiral);
            let wave = 0.5 + 0.5 * phase.cos();
            1.0 - cfg.arm_strength + cfg.arm_strength * wave
        };

        let d2 = (r * r + y * y) / (cfg.bulge_radius * cfg.bulge_radius);
        let bulge = (-d2).exp();

        let freq = cfg.noise_frequency;
        let n = self.noise.sample(x * freq, y * freq, z * freq);
        let modulation = 1.0 - cfg.noise_strength + cfg.noise_strength * (0.5 + 0.5 * n);

        ((disk * arms + bulge) * modulation).clamp(0.0, 1.0)
    }
}
