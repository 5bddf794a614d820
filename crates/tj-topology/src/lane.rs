//! One-way lanes.
//!
//! Outside the junction every road cell belongs to exactly one lane, and the
//! lane fixes the travel heading there.  Only the interior cells sit on two
//! lanes at once, which is why heading changes are confined to the interior.

use std::fmt;

use tj_core::{GridPosition, Heading};

/// A full grid row or column.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneLine {
    Row(i32),
    Col(i32),
}

impl LaneLine {
    #[inline]
    pub fn contains(self, position: GridPosition) -> bool {
        match self {
            LaneLine::Row(r) => position.row == r,
            LaneLine::Col(c) => position.col == c,
        }
    }
}

impl fmt::Display for LaneLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneLine::Row(r) => write!(f, "row {r}"),
            LaneLine::Col(c) => write!(f, "col {c}"),
        }
    }
}

/// A one-way lane: every cell on `line` is travelled in `heading`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub line:    LaneLine,
    pub heading: Heading,
}

impl Lane {
    pub fn new(line: LaneLine, heading: Heading) -> Self {
        Self { line, heading }
    }
}
