//! Memoizing store of generated star systems and bodies
//!
//! The [`Catalog`] is the one context object every generation call goes
//! through. It maps packed [`PositionKey`]s to shared handles:
//!
//! - reference-frame keys to [`StarSystem`]s
//! - celestial keys to [`Celestial`]s
//!
//! No lock is held while anything is generated, so generation may recurse
//! into the same catalog (a body's children requesting their own bodies).
//! Generation is transactional: a candidate is staged outside the store,
//! checked against its parent's orbital budget, and only then committed.
//! A rejected candidate is evicted by key so no stale entry can survive it.
//!
//! The catalog is the sole owner of every body. Parents and star systems
//! keep only blueprints for their children, so an evicted body is released
//! once callers drop their handles, and the next lookup rebuilds it.

use std::collections::HashMap;
use std::sync::Arc;

use galactic_position::{GalacticCoordinate, PositionKey};
use nalgebra::Vector3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::body::{Blueprint, Celestial, CelestialParams};
use crate::config::{SeedChannel, UniverseConfig};
use crate::kind::CelestialKind;
use crate::noise::GalaxyDensityField;
use crate::sampling::uniform_from_coordinate;
use crate::star_system::StarSystem;

type Store<T> = RwLock<HashMap<PositionKey, Arc<T>>>;

/// Number of cached entries per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub star_systems: usize,
    pub celestials: usize,
}

pub struct Catalog {
    config: UniverseConfig,
    density: GalaxyDensityField,
    star_systems: Store<StarSystem>,
    celestials: Store<Celestial>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(UniverseConfig::default())
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("seed", &self.config.seed)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Catalog {
    pub fn new(config: UniverseConfig) -> Self {
        let density = GalaxyDensityField::new(
            config.density_field.clone(),
            config.channel(SeedChannel::DensityNoise),
        );
        Self {
            config,
            density,
            star_systems: RwLock::new(HashMap::new()),
            celestials: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Galaxy density at a cell, in `[0, 1]`
    pub fn density_at(&self, coordinate: GalacticCoordinate) -> f64 {
        self.density.sample(coordinate.normalized())
    }

    /// Deterministic presence test for a cell.
    ///
    /// A pure function of the coordinate and the configuration; neither the
    /// cache nor call order affect it.
    pub fn is_populated(&self, coordinate: GalacticCoordinate) -> bool {
        if !coordinate.is_in_range() {
            return false;
        }
        let threshold = self.density_at(coordinate) * self.config.star_density;
        uniform_from_coordinate(coordinate, self.config.channel(SeedChannel::Presence)) < threshold
    }

    /// The star system occupying a cell, constructed on first request.
    ///
    /// `None` when the coordinate is out of range or the cell is empty.
    pub fn star_system(&self, coordinate: GalacticCoordinate) -> Option<Arc<StarSystem>> {
        let key = PositionKey::reference_frame(coordinate).ok()?;
        if let Some(system) = self.star_systems.read().get(&key) {
            return Some(Arc::clone(system));
        }
        if !self.is_populated(coordinate) {
            return None;
        }

        let system = Arc::new(StarSystem::new(coordinate, &self.config).ok()?);
        debug!(%key, designation = %system.designation(), "created star system");
        Some(Arc::clone(
            self.star_systems.write().entry(key).or_insert(system),
        ))
    }

    /// The star system owning any key; aliases resolve first
    pub fn star_system_at(&self, key: PositionKey) -> Option<Arc<StarSystem>> {
        let key = self.resolve(key)?;
        self.star_system(key.coordinate()?)
    }

    /// The body at `key`, generating every level above it on the way.
    ///
    /// Parent-alias keys resolve one hop. Returns `None` for reference-frame
    /// keys, empty cells and paths that run past the generated tree.
    pub fn celestial(&self, key: PositionKey) -> Option<Arc<Celestial>> {
        let key = self.resolve(key)?;
        if let Some(body) = self.celestials.read().get(&key) {
            return Some(Arc::clone(body));
        }

        let path = key.path()?;
        let system = self.star_system(key.coordinate()?)?;
        let mut indices = path.indices().iter();
        let root = *indices.next()?;
        let mut node = system.central_body(root, self)?;
        for &index in indices {
            node = node.child(index, self)?;
        }
        Some(node)
    }

    fn resolve(&self, key: PositionKey) -> Option<PositionKey> {
        if key.is_parent() {
            key.target().filter(|target| !target.is_parent())
        } else {
            Some(key)
        }
    }

    /// Returns the cached body at `params.key`, or constructs, caches and
    /// returns a new one whose kind is chosen from its mass
    pub fn make_celestial(&self, params: CelestialParams) -> Arc<Celestial> {
        let staged = self.stage_celestial(params);
        self.commit(staged)
    }

    /// Always constructs a fresh binary centre over `members` and caches it,
    /// replacing any entry under the same key
    pub fn make_binary_center(
        &self,
        params: CelestialParams,
        members: [Arc<Celestial>; 2],
    ) -> Arc<Celestial> {
        for member in &members {
            self.commit(Arc::clone(member));
        }
        let center = self.stage_binary_center(params, members.map(|m| *m.params()));
        self.celestials
            .write()
            .insert(center.key(), Arc::clone(&center));
        center
    }

    /// Cached body or a new, uncommitted one
    pub(crate) fn stage_celestial(&self, params: CelestialParams) -> Arc<Celestial> {
        if let Some(body) = self.celestials.read().get(&params.key) {
            return Arc::clone(body);
        }
        let kind = CelestialKind::from_mass(params.mass, params.seed);
        Arc::new(Celestial::new(params, kind, self.config.epoch_offset_s))
    }

    pub(crate) fn stage_binary_center(
        &self,
        params: CelestialParams,
        members: [CelestialParams; 2],
    ) -> Arc<Celestial> {
        Arc::new(Celestial::binary_center(
            params,
            members,
            self.config.epoch_offset_s,
        ))
    }

    /// Cached body for a blueprint, or a new, uncommitted one
    pub(crate) fn stage(&self, blueprint: &Blueprint) -> Arc<Celestial> {
        match blueprint {
            Blueprint::Body(params) => self.stage_celestial(*params),
            Blueprint::Pair { center, members } => {
                if let Some(body) = self.celestials.read().get(&center.key) {
                    return Arc::clone(body);
                }
                self.stage_binary_center(*center, *members)
            }
        }
    }

    /// The body a blueprint describes, rebuilt and cached if it was evicted
    pub(crate) fn realize(&self, blueprint: &Blueprint) -> Arc<Celestial> {
        if let Some(body) = self.celestials.read().get(&blueprint.key()) {
            return Arc::clone(body);
        }
        self.commit(self.stage(blueprint))
    }

    /// Inserts a staged body unless its key is already taken, returning the
    /// body now cached under the key
    pub(crate) fn commit(&self, body: Arc<Celestial>) -> Arc<Celestial> {
        Arc::clone(self.celestials.write().entry(body.key()).or_insert(body))
    }

    /// Drops every cached star system and body
    pub fn clear_cache(&self) {
        self.star_systems.write().clear();
        self.celestials.write().clear();
        debug!("cleared catalog");
    }

    /// Drops the star system in a cell together with every cached body in it
    pub fn clear_star_system_cache(&self, coordinate: GalacticCoordinate) {
        let Ok(frame) = PositionKey::reference_frame(coordinate) else {
            return;
        };
        self.star_systems.write().remove(&frame);
        let mut celestials = self.celestials.write();
        let before = celestials.len();
        celestials.retain(|key, _| key.reference_frame_key() != Some(frame));
        debug!(%frame, evicted = before - celestials.len(), "cleared star system");
    }

    /// Drops a body and every cached descendant
    pub fn clear_celestial_cache(&self, key: PositionKey) {
        let mut celestials = self.celestials.write();
        let before = celestials.len();
        celestials.retain(|cached, _| *cached != key && !key.is_ancestor_of(cached));
        let evicted = before - celestials.len();
        if evicted > 0 {
            debug!(%key, evicted, "cleared celestial");
        }
    }

    /// Whether a body is currently cached, without generating it
    pub fn is_cached(&self, key: PositionKey) -> bool {
        self.celestials.read().contains_key(&key)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            star_systems: self.star_systems.read().len(),
            celestials: self.celestials.read().len(),
        }
    }

    /// Offset of a body from its star system's centre at `timestamp_s`,
    /// summing the orbit offsets of the body and every ancestor
    pub fn position_in_system(&self, key: PositionKey, timestamp_s: f64) -> Option<Vector3<f64>> {
        let key = self.resolve(key)?;
        let path = key.path()?;
        let system = self.star_system(key.coordinate()?)?;

        let mut indices = path.indices().iter();
        let mut node = system.central_body(*indices.next()?, self)?;
        let mut position = node.position_in_orbit(timestamp_s);
        for &index in indices {
            node = node.child(index, self)?;
            position += node.position_in_orbit(timestamp_s);
        }
        Some(position)
    }

    /// Galactic position of a body in metres at `timestamp_s`
    pub fn absolute_position(&self, key: PositionKey, timestamp_s: f64) -> Option<Vector3<f64>> {
        let system = self.star_system_at(key)?;
        let local = self.position_in_system(key, timestamp_s)?;
        Some(system.origin(&self.config) + local)
    }

    /// Scans cells along +x starting at `from`, returning up to `count`
    /// populated systems among the first `limit` cells
    pub fn find_star_systems(
        &self,
        from: GalacticCoordinate,
        count: usize,
        limit: u32,
    ) -> Vec<Arc<StarSystem>> {
        (0..limit)
            .map_while(|step| from.step_x(step))
            .filter_map(|coordinate| self.star_system(coordinate))
            .take(count)
            .collect()
    }
}
