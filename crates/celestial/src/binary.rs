//! Binary pair layout.
//!
//! Both members of a pair circle their common barycentre on the same plane,
//! with phases exactly π apart. Each member is placed at its barycentric
//! distance and given an *effective* parent mass chosen so that a single-body
//! circular orbit at that distance has the pair's angular velocity:
//!
//! ```text
//! ω² = G (m₁ + m₂) / s³
//! d₁ = s m₂ / (m₁ + m₂)          d₂ = s m₁ / (m₁ + m₂)
//! M_eff,i = (m₁ + m₂) (dᵢ / s)³  ⇒  G M_eff,i / dᵢ³ = ω²
//! ```
//!
//! That keeps the members on opposite sides of the barycentre at every
//! timestamp, not only at `t = 0`.

use std::f64::consts::PI;

use units::{Length, Mass};

use crate::sampling::log_mix;

/// Largest deviation of either member from half the total mass
pub const MASS_SPLIT_PERTURBATION: f64 = 0.17;

/// Splits `total` into `(primary, secondary)` with `primary >= secondary`.
///
/// `u` in `[0, 1)` picks the perturbation; the primary receives
/// `half * (1 + 0.17 u)`.
pub fn split_mass(total: Mass, u: f64) -> (Mass, Mass) {
    let half = total * 0.5;
    let delta = half * (MASS_SPLIT_PERTURBATION * u.clamp(0.0, 1.0));
    (half + delta, half - delta)
}

/// Separation for a root pair: between 10× and 20× the summed radii, widened
/// to 2% of the system radius when that is larger
pub fn root_separation(combined_radius: Length, system_radius: Length, u: f64) -> Length {
    let min = combined_radius * 10.0;
    let max = (system_radius * 0.02).max(combined_radius * 20.0);
    Length::from_meters(log_mix(min.to_m(), max.to_m(), u))
}

/// Separation for a pair generated as somebody's child, a small fraction of
/// the pair's own orbit distance
pub fn child_separation(orbit_distance: Length, u: f64) -> Length {
    orbit_distance * log_mix(0.002, 0.02, u)
}

/// Barycentric placement of one member
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberOrbit {
    pub distance: Length,
    pub effective_parent_mass: Mass,
    pub phase: f64,
}

/// Placement of both members of a pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryLayout {
    pub separation: Length,
    pub primary: MemberOrbit,
    pub secondary: MemberOrbit,
}

impl BinaryLayout {
    pub fn new(primary_mass: Mass, secondary_mass: Mass, separation: Length, phase: f64) -> Self {
        let total = primary_mass + secondary_mass;
        let member = |distance: Length, phase: f64| {
            let ratio = if separation.is_zero() {
                0.0
            } else {
                distance / separation
            };
            MemberOrbit {
                distance,
                effective_parent_mass: total * ratio.powi(3),
                phase,
            }
        };

        // the lighter member sits further out
        let (d1, d2) = if total.is_zero() {
            (separation * 0.5, separation * 0.5)
        } else {
            (
                separation * (secondary_mass / total),
                separation * (primary_mass / total),
            )
        };

        Self {
            separation,
            primary: member(d1, phase),
            secondary: member(d2, phase + PI),
        }
    }

    /// Whether two bodies of these radii fit side by side
    pub fn members_fit(&self, primary_radius: Length, secondary_radius: Length) -> bool {
        primary_radius + secondary_radius < self.separation
    }
}
