//! Text and JSON views of catalog lookups

use std::fmt::{self, Write};
use std::sync::Arc;

use celestial::{Catalog, Celestial, CelestialSummary, StarSystem, SystemParameters};
use galactic_position::{GalacticCoordinate, PositionKey};
use nalgebra::Vector3;
use serde::Serialize;
use units::{Length, Mass, Time};

const INDENT: &str = "  ";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyNode {
    #[serde(flatten)]
    pub summary: CelestialSummary,
    pub children: Vec<BodyNode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemReport {
    pub key: PositionKey,
    pub designation: String,
    pub coordinate: GalacticCoordinate,
    pub origin_m: [f64; 3],
    pub parameters: SystemParameters,
    pub bodies: Vec<BodyNode>,
}

/// Body tree down to hierarchy depth `max_depth`
fn node(body: &Arc<Celestial>, catalog: &Catalog, max_depth: usize) -> BodyNode {
    let children = if body.depth() < max_depth {
        body.children(catalog)
            .iter()
            .map(|child| node(child, catalog, max_depth))
            .collect()
    } else {
        Vec::new()
    };
    BodyNode {
        summary: body.summary(),
        children,
    }
}

pub fn system_tree(system: &StarSystem, catalog: &Catalog, max_depth: usize) -> SystemReport {
    let origin = system.origin(catalog.config());
    SystemReport {
        key: system.key(),
        designation: system.designation(),
        coordinate: system.coordinate(),
        origin_m: [origin.x, origin.y, origin.z],
        parameters: *system.parameters(),
        bodies: system
            .roots(catalog)
            .iter()
            .map(|root| node(root, catalog, max_depth))
            .collect(),
    }
}

pub fn render_system(system: &StarSystem, catalog: &Catalog, max_depth: usize) -> String {
    let report = system_tree(system, catalog, max_depth);
    let p = &report.parameters;
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", report.designation, report.coordinate);
    let _ = writeln!(
        out,
        "{INDENT}mass {:.3} M☉  radius {:.4} ly  age {:.2} Gyr  tilt {:.1}°",
        p.mass.to_solar_masses(),
        p.radius.to_light_years(),
        p.age_gyr,
        p.tilt_deg
    );
    let _ = writeln!(
        out,
        "{INDENT}central bodies {}  orbits {}",
        p.central_body_count, p.orbit_count
    );
    for body in &report.bodies {
        render_node(&mut out, body, 1);
    }
    out
}

fn render_node(out: &mut String, node: &BodyNode, indent: usize) {
    let s = &node.summary;
    let path = s.key.path().map(|p| p.to_string()).unwrap_or_default();
    let _ = writeln!(
        out,
        "{}[{}] {}  {}  r={}  a={}  P={}",
        INDENT.repeat(indent),
        path,
        s.kind,
        format_mass(Mass::from_kg(s.mass_kg)),
        format_length(Length::from_meters(s.radius_m)),
        format_length(Length::from_meters(s.orbit_distance_m)),
        format_time(Time::from_seconds(s.orbital_period_s)),
    );
    for child in &node.children {
        render_node(out, child, indent + 1);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyReport {
    #[serde(flatten)]
    pub summary: CelestialSummary,
    pub surface_gravity_m_s2: f64,
    pub escape_velocity_m_s: f64,
    pub hill_radius_m: f64,
    pub child_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_m: Option<[f64; 3]>,
}

impl BodyReport {
    pub fn new(body: &Celestial, time_s: Option<f64>, offset: Option<Vector3<f64>>) -> Self {
        Self {
            summary: body.summary(),
            surface_gravity_m_s2: body.surface_gravity(),
            escape_velocity_m_s: body.escape_velocity().to_meters_per_sec(),
            hill_radius_m: body.hill_radius().to_m(),
            child_count: body.generated_child_count().unwrap_or(0),
            time_s,
            offset_m: offset.map(|v| [v.x, v.y, v.z]),
        }
    }
}

pub fn render_body(body: &Celestial, time_s: Option<f64>, offset: Option<Vector3<f64>>) -> String {
    let report = BodyReport::new(body, time_s, offset);
    let s = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", s.kind, s.key);
    let _ = writeln!(out, "{INDENT}mass      {}", format_mass(body.mass()));
    let _ = writeln!(out, "{INDENT}radius    {}", format_length(body.radius()));
    let _ = writeln!(out, "{INDENT}density   {:.1} kg/m³", s.density_kg_m3);
    let _ = writeln!(out, "{INDENT}age       {:.2} Gyr", s.age_gyr);
    let _ = writeln!(
        out,
        "{INDENT}orbit     {} every {} (tilt {:.1}°)",
        format_length(body.orbit_distance()),
        format_time(body.orbital_period()),
        s.orbit_tilt_deg
    );
    let _ = writeln!(
        out,
        "{INDENT}rotation  {}{}  axial tilt {:.1}°",
        format_time(Time::from_seconds(s.rotation_period_s)),
        if s.tidally_locked { " (locked)" } else { "" },
        s.axial_tilt_deg
    );
    let _ = writeln!(
        out,
        "{INDENT}gravity   {:.2} m/s²  escape {:.2} km/s",
        report.surface_gravity_m_s2,
        report.escape_velocity_m_s / 1_000.0
    );
    if let (Some(t), Some([x, y, z])) = (report.time_s, report.offset_m) {
        let _ = writeln!(out, "{INDENT}offset    ({x:.4e}, {y:.4e}, {z:.4e}) m at t={t}s");
    }
    out
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyReport {
    pub packed: u64,
    pub text: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<GalacticCoordinate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u64>,
}

impl KeyReport {
    pub fn new(key: PositionKey) -> Self {
        Self {
            packed: key.raw(),
            text: key.to_string(),
            kind: format!("{:?}", key.kind()),
            coordinate: key.coordinate(),
            path: key.path().map(|p| p.indices().to_vec()).unwrap_or_default(),
            target: key.parent_id(),
        }
    }
}

pub fn render_key(key: PositionKey) -> String {
    let report = KeyReport::new(key);
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.packed);
    let _ = writeln!(out, "{INDENT}{} {}", report.kind, report.text);
    out
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRow {
    pub key: PositionKey,
    pub designation: String,
    pub coordinate: GalacticCoordinate,
    pub mass_solar: f64,
    pub central_body_count: u8,
}

impl ScanRow {
    pub fn new(system: &StarSystem) -> Self {
        Self {
            key: system.key(),
            designation: system.designation(),
            coordinate: system.coordinate(),
            mass_solar: system.mass().to_solar_masses(),
            central_body_count: system.central_body_count(),
        }
    }
}

impl fmt::Display for ScanRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:<9} {:>8.3} M☉  {} star(s)",
            self.coordinate.to_string(),
            self.designation,
            self.mass_solar,
            self.central_body_count
        )
    }
}

fn format_mass(mass: Mass) -> String {
    if mass.to_solar_masses() >= 0.01 {
        format!("{:.3} M☉", mass.to_solar_masses())
    } else if mass.to_earth_masses() >= 0.001 {
        format!("{:.3} M⊕", mass.to_earth_masses())
    } else {
        format!("{:.3e} kg", mass.to_kg())
    }
}

fn format_length(length: Length) -> String {
    if length.to_light_years() >= 0.01 {
        format!("{:.4} ly", length.to_light_years())
    } else if length.to_au() >= 0.01 {
        format!("{:.3} AU", length.to_au())
    } else {
        format!("{:.1} km", length.to_km())
    }
}

fn format_time(time: Time) -> String {
    if time.to_years() >= 1.0 {
        format!("{:.2} yr", time.to_years())
    } else if time.to_days() >= 1.0 {
        format!("{:.2} d", time.to_days())
    } else {
        format!("{:.2} h", time.to_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_scales() {
        assert_eq!(format_mass(Mass::from_solar_masses(1.0)), "1.000 M☉");
        assert_eq!(format_mass(Mass::from_earth_masses(1.0)), "1.000 M⊕");
        assert_eq!(format_length(Length::from_au(1.0)), "1.000 AU");
        assert_eq!(format_length(Length::from_km(10.0)), "10.0 km");
        assert_eq!(format_time(Time::from_days(2.0)), "2.00 d");
    }

    #[test]
    fn test_key_report_for_alias() {
        let target = PositionKey::from_parts(5, 6, 7, &[1, 0]).unwrap();
        let alias = PositionKey::parent(target.raw()).unwrap();
        let report = KeyReport::new(alias);
        assert_eq!(report.target, Some(target.raw()));
        assert!(report.coordinate.is_none());
        assert!(report.path.is_empty());
        assert!(report.text.starts_with('@'));
    }
}
