//! Body hierarchy path inside a star system.
//!
//! Level 1 is the star system root slot, level 4 the deepest moon level.
//! Each level is packed as `index + 1` so that a zero field means "absent";
//! the per-level capacity is one less than the field's value range.

use std::fmt;

use crate::error::KeyError;

/// Maximum path depth
pub const MAX_DEPTH: usize = 4;

/// Number of bits reserved for each level in the packed celestial id
pub const LEVEL_BITS: [u32; MAX_DEPTH] = [2, 2, 5, 6];

/// Number of distinct child indices each level can hold
pub const LEVEL_CAPACITY: [u8; MAX_DEPTH] = [3, 3, 31, 63];

const LEVEL_SHIFT: [u32; MAX_DEPTH] = [0, 2, 4, 9];

/// Total width of the packed celestial id
pub const ID_BITS: u32 = 15;

/// A gap-free sequence of 1 to 4 child indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HierarchyPath {
    levels: [u8; MAX_DEPTH],
    depth: u8,
}

impl HierarchyPath {
    /// Path to a star system root slot
    pub fn root(slot: u8) -> Result<Self, KeyError> {
        Self::new(&[slot])
    }

    pub fn new(indices: &[u8]) -> Result<Self, KeyError> {
        if indices.is_empty() {
            return Err(KeyError::EmptyPath);
        }
        if indices.len() > MAX_DEPTH {
            return Err(KeyError::PathTooDeep(indices.len()));
        }

        let mut levels = [0u8; MAX_DEPTH];
        for (level, &index) in indices.iter().enumerate() {
            let capacity = LEVEL_CAPACITY[level];
            if index >= capacity {
                return Err(KeyError::LevelOutOfRange {
                    level: level + 1,
                    index,
                    capacity,
                });
            }
            levels[level] = index;
        }

        Ok(Self {
            levels,
            depth: indices.len() as u8,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    /// Child index at a 1-based level, `None` past the path's depth
    pub fn index(&self, level: usize) -> Option<u8> {
        (1..=self.depth()).contains(&level).then(|| self.levels[level - 1])
    }

    pub fn indices(&self) -> &[u8] {
        &self.levels[..self.depth()]
    }

    /// Index of the last level
    pub fn last(&self) -> u8 {
        self.levels[self.depth() - 1]
    }

    pub fn child(&self, index: u8) -> Result<Self, KeyError> {
        let mut indices = self.indices().to_vec();
        indices.push(index);
        Self::new(&indices)
    }

    /// The path one level up, or `None` for a root slot
    pub fn parent(&self) -> Option<Self> {
        if self.depth == 1 {
            return None;
        }
        let mut parent = *self;
        parent.depth -= 1;
        parent.levels[parent.depth()] = 0;
        Some(parent)
    }

    /// True when `self` is `other` or one of its ancestors
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.depth <= other.depth && self.indices() == &other.indices()[..self.depth()]
    }

    /// Capacity of the level a child of this path would occupy
    pub fn child_capacity(&self) -> Option<u8> {
        LEVEL_CAPACITY.get(self.depth()).copied()
    }

    /// Packs the path into a non-zero 15-bit celestial id
    pub fn encode(&self) -> u16 {
        self.indices()
            .iter()
            .enumerate()
            .fold(0u16, |id, (level, &index)| {
                id | (u16::from(index) + 1) << LEVEL_SHIFT[level]
            })
    }

    /// Unpacks a celestial id. Returns `None` for the zero id (a reference
    /// frame) and for ids with a gap, which are not valid paths.
    pub fn decode(id: u16) -> Option<Self> {
        if id == 0 || u32::from(id) >> ID_BITS != 0 {
            return None;
        }

        let mut levels = [0u8; MAX_DEPTH];
        let mut depth = 0u8;
        for level in 0..MAX_DEPTH {
            let mask = (1u16 << LEVEL_BITS[level]) - 1;
            let stored = (id >> LEVEL_SHIFT[level]) & mask;
            match (stored, depth as usize == level) {
                (0, _) => {}
                (_, true) => {
                    levels[level] = (stored - 1) as u8;
                    depth += 1;
                }
                // a present level after an absent one
                (_, false) => return None,
            }
        }

        Some(Self { levels, depth })
    }
}

impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.indices().iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}
