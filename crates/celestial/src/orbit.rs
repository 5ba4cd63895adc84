//! Closed-form circular orbits
//!
//! Orbits are tilted circles around the parent, not Keplerian ellipses. A
//! body's position only depends on its elements and the timestamp, so any
//! peer can place it without integrating anything.

use std::f64::consts::{FRAC_PI_3, TAU};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use units::{GRAVITATIONAL_CONSTANT, Length, Mass, Time};

/// Which member of a binary pair a body is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryMember {
    Primary,
    Secondary,
}

/// Trojan slot relative to a larger sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LagrangePoint {
    /// 60° ahead
    L4,
    /// 60° behind
    L5,
}

impl LagrangePoint {
    /// Phase offset from the host body, in radians
    pub fn phase_offset(&self) -> f64 {
        match self {
            Self::L4 => FRAC_PI_3,
            Self::L5 => -FRAC_PI_3,
        }
    }
}

/// Role flags a body is created with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub binary_member: Option<BinaryMember>,
    pub has_lagrange_siblings: bool,
    pub lagrange_point: Option<LagrangePoint>,
    pub center_star: bool,
}

impl Role {
    pub fn center_star() -> Self {
        Self {
            center_star: true,
            ..Self::default()
        }
    }

    pub fn binary(member: BinaryMember) -> Self {
        Self {
            binary_member: Some(member),
            ..Self::default()
        }
    }

    pub fn lagrange(point: LagrangePoint) -> Self {
        Self {
            lagrange_point: Some(point),
            ..Self::default()
        }
    }
}

/// Elements of a circular orbit around a parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub distance: Length,
    /// Mass the body orbits; for binary members the effective mass that
    /// reproduces the pair's shared angular velocity
    pub parent_mass: Mass,
    pub tilt_deg: f64,
    /// Phase at `timestamp + epoch = 0`, radians
    pub initial_phase: f64,
}

impl OrbitalElements {
    /// Angular velocity in rad/s, zero for unbound bodies
    pub fn mean_motion(&self) -> f64 {
        let d = self.distance.to_m();
        if d <= 0.0 || self.parent_mass.is_zero() {
            return 0.0;
        }
        (GRAVITATIONAL_CONSTANT * self.parent_mass.to_kg() / (d * d * d)).sqrt()
    }

    pub fn period(&self) -> Time {
        orbital_period(self.distance, self.parent_mass)
    }

    pub fn mean_anomaly(&self, timestamp_s: f64, epoch_offset_s: f64) -> f64 {
        self.mean_motion() * (timestamp_s + epoch_offset_s) + self.initial_phase
    }

    /// Offset from the parent at `timestamp_s`, metres
    ///
    /// Evaluates the tilted circle directly; the canonical `t = 0` layout is
    /// handled by [`position_in_orbit`].
    pub fn position_at(&self, timestamp_s: f64, epoch_offset_s: f64) -> Vector3<f64> {
        let d = self.distance.to_m();
        if d <= 0.0 {
            return Vector3::zeros();
        }
        let m = self.mean_anomaly(timestamp_s, epoch_offset_s);
        let tilt = self.tilt_deg.to_radians();
        d * Vector3::new(tilt.cos() * m.cos(), tilt.sin() * m.cos(), m.sin())
    }
}

/// Period of a circular orbit; zero when either side is degenerate
pub fn orbital_period(distance: Length, parent_mass: Mass) -> Time {
    let d = distance.to_m();
    if d <= 0.0 || parent_mass.is_zero() {
        return Time::zero();
    }
    Time::from_seconds(TAU * (d * d * d / (GRAVITATIONAL_CONSTANT * parent_mass.to_kg())).sqrt())
}

/// Fixed layout used at `timestamp == 0`.
///
/// Binary members sit on opposite ends of the primary axis, trojans 60°
/// ahead of and behind the primary axis, and everything else alternates
/// between the x and z axes by hierarchy depth.
pub fn canonical_position(distance: Length, depth: u8, role: &Role) -> Vector3<f64> {
    let d = distance.to_m();
    if let Some(member) = role.binary_member {
        return match member {
            BinaryMember::Primary => Vector3::new(d, 0.0, 0.0),
            BinaryMember::Secondary => Vector3::new(-d, 0.0, 0.0),
        };
    }
    if let Some(point) = role.lagrange_point {
        let angle = point.phase_offset();
        return Vector3::new(d * angle.cos(), 0.0, d * angle.sin());
    }
    if depth % 2 == 1 {
        Vector3::new(d, 0.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, d)
    }
}

/// Offset from the parent at `timestamp_s`.
///
/// Unbound bodies (zero distance) never move. At exactly `t = 0` the result
/// is the [`canonical_position`], independent of the initial phase.
pub fn position_in_orbit(
    elements: &OrbitalElements,
    depth: u8,
    role: &Role,
    timestamp_s: f64,
    epoch_offset_s: f64,
) -> Vector3<f64> {
    if elements.distance.to_m() <= 0.0 {
        return Vector3::zeros();
    }
    if timestamp_s == 0.0 {
        return canonical_position(elements.distance, depth, role);
    }
    elements.position_at(timestamp_s, epoch_offset_s)
}
