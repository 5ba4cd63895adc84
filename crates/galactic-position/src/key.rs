//! The packed 64-bit position key.
//!
//! ```text
//! bit 63      parent-alias flag; bits 0..63 then hold the referenced key
//! bits 48..63 celestial id (level1:2, level2:2, level3:5, level4:6)
//! bits 30..48 z (18 bits)
//! bits 18..30 y (12 bits)
//! bits  0..18 x (18 bits)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::{GalacticCoordinate, MAX_X, MAX_Y, MAX_Z};
use crate::error::KeyError;
use crate::path::{HierarchyPath, ID_BITS};

const Y_SHIFT: u32 = 18;
const Z_SHIFT: u32 = 30;
const ID_SHIFT: u32 = 48;
const PARENT_FLAG: u64 = 1 << 63;
const ID_MASK: u64 = ((1 << ID_BITS) - 1) << ID_SHIFT;
const COORDINATE_MASK: u64 = (1 << ID_SHIFT) - 1;

/// The three mutually exclusive interpretations of a non-zero key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    /// Alias to another key; carries no coordinate
    Parent,
    /// A galaxy cell with no body path
    ReferenceFrame,
    /// A body inside a galaxy cell
    Celestial,
}

impl KeyKind {
    /// Classifies a raw value. Returns `None` for every invalid pattern: zero,
    /// a zero or out-of-range coordinate, a gapped body path, or an alias
    /// whose target is itself invalid or another alias.
    pub fn of(raw: u64) -> Option<Self> {
        if raw & PARENT_FLAG != 0 {
            let target = raw & !PARENT_FLAG;
            return match Self::of(target) {
                Some(Self::ReferenceFrame | Self::Celestial) => Some(Self::Parent),
                _ => None,
            };
        }

        let coordinate = unpack_coordinate(raw);
        if !coordinate.is_in_range() {
            return None;
        }

        match id_bits(raw) {
            0 => Some(Self::ReferenceFrame),
            id => HierarchyPath::decode(id).map(|_| Self::Celestial),
        }
    }
}

/// Packed coordinate + hierarchy key. Always holds a valid value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PositionKey(u64);

impl PositionKey {
    /// Validates a raw packed value
    pub fn from_raw(raw: u64) -> Result<Self, KeyError> {
        match KeyKind::of(raw) {
            Some(_) => Ok(Self(raw)),
            None => Err(KeyError::Invalid(raw)),
        }
    }

    pub fn is_valid_raw(raw: u64) -> bool {
        KeyKind::of(raw).is_some()
    }

    /// Key of a galaxy cell
    pub fn reference_frame(coordinate: GalacticCoordinate) -> Result<Self, KeyError> {
        let coordinate = GalacticCoordinate::new(coordinate.x, coordinate.y, coordinate.z)?;
        Self::checked(pack_coordinate(&coordinate), KeyKind::ReferenceFrame)
    }

    /// Key of a body inside a galaxy cell
    pub fn celestial(
        coordinate: GalacticCoordinate,
        path: &HierarchyPath,
    ) -> Result<Self, KeyError> {
        let coordinate = GalacticCoordinate::new(coordinate.x, coordinate.y, coordinate.z)?;
        let raw = pack_coordinate(&coordinate) | u64::from(path.encode()) << ID_SHIFT;
        Self::checked(raw, KeyKind::Celestial)
    }

    /// Convenience form of [`PositionKey::celestial`] taking raw coordinates
    /// and 0-based level indices
    pub fn from_parts(x: u32, y: u32, z: u32, levels: &[u8]) -> Result<Self, KeyError> {
        let coordinate = GalacticCoordinate::new(x, y, z)?;
        if levels.is_empty() {
            return Self::reference_frame(coordinate);
        }
        Self::celestial(coordinate, &HierarchyPath::new(levels)?)
    }

    /// Alias key referencing another (non-alias) key
    pub fn parent(id: u64) -> Result<Self, KeyError> {
        match KeyKind::of(id) {
            Some(KeyKind::ReferenceFrame | KeyKind::Celestial) => {
                Self::checked(id | PARENT_FLAG, KeyKind::Parent)
            }
            _ => Err(KeyError::ParentIdInvalid(id)),
        }
    }

    fn checked(raw: u64, expected: KeyKind) -> Result<Self, KeyError> {
        match KeyKind::of(raw) {
            Some(kind) if kind == expected => Ok(Self(raw)),
            _ => Err(KeyError::AmbiguousEncoding(raw)),
        }
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn kind(&self) -> KeyKind {
        // Constructors guarantee validity
        KeyKind::of(self.0).unwrap_or(KeyKind::ReferenceFrame)
    }

    pub fn is_valid(&self) -> bool {
        Self::is_valid_raw(self.0)
    }

    pub fn is_parent(&self) -> bool {
        self.kind() == KeyKind::Parent
    }

    pub fn is_reference_frame(&self) -> bool {
        self.kind() == KeyKind::ReferenceFrame
    }

    pub fn is_celestial(&self) -> bool {
        self.kind() == KeyKind::Celestial
    }

    /// Grid coordinate; `None` for alias keys
    pub fn coordinate(&self) -> Option<GalacticCoordinate> {
        (!self.is_parent()).then(|| unpack_coordinate(self.0))
    }

    /// Body path; `None` unless this is a celestial key
    pub fn path(&self) -> Option<HierarchyPath> {
        if self.is_parent() {
            return None;
        }
        HierarchyPath::decode(id_bits(self.0))
    }

    /// The raw id an alias key references
    pub fn parent_id(&self) -> Option<u64> {
        self.is_parent().then_some(self.0 & !PARENT_FLAG)
    }

    /// The key an alias key references
    pub fn target(&self) -> Option<PositionKey> {
        self.parent_id().map(PositionKey)
    }

    /// Coordinate-only projection, used to key star systems
    pub fn reference_frame_key(&self) -> Option<PositionKey> {
        (!self.is_parent()).then_some(PositionKey(self.0 & COORDINATE_MASK))
    }

    /// Number of hierarchy levels; 0 for reference frames and aliases
    pub fn depth(&self) -> usize {
        self.path().map(|p| p.depth()).unwrap_or(0)
    }

    /// Child index at a 1-based level
    pub fn level_index(&self, level: usize) -> Option<u8> {
        self.path().and_then(|p| p.index(level))
    }

    /// Key of the `index`-th child one level deeper
    pub fn child(&self, index: u8) -> Result<PositionKey, KeyError> {
        let coordinate = self
            .coordinate()
            .ok_or(KeyError::AmbiguousEncoding(self.0))?;
        let path = match self.path() {
            Some(path) => path.child(index)?,
            None => HierarchyPath::root(index)?,
        };
        Self::celestial(coordinate, &path)
    }

    /// Key one level up; a root body's parent is its reference frame
    pub fn parent_key(&self) -> Option<PositionKey> {
        let path = self.path()?;
        match path.parent() {
            Some(parent) => Some(PositionKey(
                self.0 & COORDINATE_MASK | u64::from(parent.encode()) << ID_SHIFT,
            )),
            None => self.reference_frame_key(),
        }
    }

    /// True when `other` lies strictly below this key in the same cell
    pub fn is_ancestor_of(&self, other: &PositionKey) -> bool {
        if self == other || self.reference_frame_key() != other.reference_frame_key() {
            return false;
        }
        match (self.path(), other.path()) {
            (None, Some(_)) => self.is_reference_frame(),
            (Some(mine), Some(theirs)) => mine.is_prefix_of(&theirs),
            _ => false,
        }
    }
}

fn pack_coordinate(coordinate: &GalacticCoordinate) -> u64 {
    u64::from(coordinate.x)
        | u64::from(coordinate.y) << Y_SHIFT
        | u64::from(coordinate.z) << Z_SHIFT
}

fn unpack_coordinate(raw: u64) -> GalacticCoordinate {
    GalacticCoordinate {
        x: (raw & u64::from(MAX_X)) as u32,
        y: ((raw >> Y_SHIFT) & u64::from(MAX_Y)) as u32,
        z: ((raw >> Z_SHIFT) & u64::from(MAX_Z)) as u32,
    }
}

fn id_bits(raw: u64) -> u16 {
    ((raw & ID_MASK) >> ID_SHIFT) as u16
}

impl TryFrom<u64> for PositionKey {
    type Error = KeyError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<PositionKey> for u64 {
    fn from(key: PositionKey) -> u64 {
        key.0
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.parent_id() {
            return write!(f, "@{}", id);
        }
        let coordinate = unpack_coordinate(self.0);
        match self.path() {
            Some(path) => write!(f, "{}/{}", coordinate, path),
            None => write!(f, "{}", coordinate),
        }
    }
}

impl fmt::Debug for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionKey({} = {:#x})", self, self.0)
    }
}

/// Accepts a packed decimal integer, `@<id>` for aliases, or
/// `x:y:z[/i.j.k]`.
impl FromStr for PositionKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_err = || KeyError::Parse(s.to_string());

        if let Some(id) = s.strip_prefix('@') {
            return Self::parent(id.parse().map_err(|_| parse_err())?);
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return Self::from_raw(s.parse().map_err(|_| parse_err())?);
        }

        let (coordinate, path) = match s.split_once('/') {
            Some((coordinate, path)) => (coordinate, Some(path)),
            None => (s, None),
        };

        let axes: Vec<u32> = coordinate
            .split(':')
            .map(|part| part.trim().parse().map_err(|_| parse_err()))
            .collect::<Result<_, _>>()?;
        let &[x, y, z] = axes.as_slice() else {
            return Err(parse_err());
        };

        let levels: Vec<u8> = match path {
            Some(path) => path
                .split('.')
                .map(|part| part.trim().parse().map_err(|_| parse_err()))
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };
        Self::from_parts(x, y, z, &levels)
    }
}
