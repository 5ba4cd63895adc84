//! Stateless sampling curves and coordinate hashing

use galactic_position::GalacticCoordinate;

use crate::seed::mix;

/// Hashes a coordinate together with a channel constant.
///
/// Pure: the result depends on nothing but the arguments, so system-level
/// attributes are stable across runs and independent of generation order.
pub fn hash_coordinate(coord: GalacticCoordinate, channel: u64) -> u64 {
    let mut h = mix(channel);
    h = mix(h ^ u64::from(coord.x));
    h = mix(h ^ (u64::from(coord.y) << 20));
    mix(h ^ (u64::from(coord.z) << 40))
}

/// Uniform float in `[0, 1)` for a coordinate and channel
pub fn uniform_from_coordinate(coord: GalacticCoordinate, channel: u64) -> f64 {
    // top 53 bits fill the f64 mantissa exactly
    (hash_coordinate(coord, channel) >> 11) as f64 / (1u64 << 53) as f64
}

/// Reshapes a uniform sample toward 0.5.
///
/// Each pass applies `0.5 + 4 (u - 0.5)^3`, which fixes 0, 0.5 and 1 and
/// flattens the curve around the centre. `depth` passes compound the bias;
/// a depth of 0 returns the input unchanged.
pub fn center_distributed(u: f64, depth: u32) -> f64 {
    (0..depth).fold(u.clamp(0.0, 1.0), |v, _| {
        let d = v - 0.5;
        0.5 + 4.0 * d * d * d
    })
}

/// Interpolates two positive bounds in log space.
///
/// `t = 0` yields `min`, `t = 1` yields `max`.
pub fn log_mix(min: f64, max: f64, t: f64) -> f64 {
    (min.ln() + (max.ln() - min.ln()) * t).exp()
}

/// Hermite step between `edge0` and `edge1`, clamped to `[0, 1]`
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
