//! Errors raised while building or parsing position keys.
//!
//! Every variant describes malformed caller input. None of them can be
//! produced by the generator itself, so callers usually treat them as fatal.

use std::fmt;

use thiserror::Error;

/// Coordinate axis, used for range errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("{axis} coordinate {value} is outside 1..={max}")]
    CoordinateOutOfRange { axis: Axis, value: u32, max: u32 },

    #[error("level {level} index {index} exceeds capacity {capacity}")]
    LevelOutOfRange {
        level: usize,
        index: u8,
        capacity: u8,
    },

    #[error("hierarchy path depth {0} exceeds the maximum of 4 levels")]
    PathTooDeep(usize),

    #[error("a celestial key needs at least one hierarchy level")]
    EmptyPath,

    #[error("parent id {0:#x} is not a valid non-alias key")]
    ParentIdInvalid(u64),

    #[error("raw value {0:#x} does not match the requested interpretation")]
    AmbiguousEncoding(u64),

    #[error("raw value {0:#x} is not a valid position key")]
    Invalid(u64),

    #[error("cannot parse position key: {0}")]
    Parse(String),
}
