//! Packed galactic position keys.
//!
//! A [`PositionKey`] identifies either a grid cell of the galaxy (a
//! *reference frame*), a body inside that cell (a *celestial*), or acts as
//! an alias to another key (a *parent* key). The three interpretations are
//! distinguished purely by bit pattern, see [`PositionKey::is_reference_frame`],
//! [`PositionKey::is_celestial`] and [`PositionKey::is_parent`].

pub mod coordinate;
pub mod error;
pub mod key;
pub mod path;

#[cfg(test)]
mod key_test;
#[cfg(test)]
mod path_test;

pub use coordinate::{GalacticCoordinate, MAX_X, MAX_Y, MAX_Z};
pub use error::{Axis, KeyError};
pub use key::{KeyKind, PositionKey};
pub use path::{HierarchyPath, LEVEL_CAPACITY, MAX_DEPTH};
