//! Discrete grid geometry: positions, headings, and axes.
//!
//! # Coordinate convention
//!
//! `GridPosition { row, col }` with `row` growing southwards and `col`
//! growing eastwards, so `(0, 0)` is the north-west corner.  Coordinates are
//! signed: a predicted next cell may fall off the grid, and that must not be
//! an arithmetic error.
//!
//! # Cyclic ordering
//!
//! Headings are numbered 0–3 in the fixed counter-clockwise cycle
//! `South → East → North → West`.  The same numbering is used for the
//! approach cells of a junction: the vehicle waiting at approach `i` travels
//! with heading `i`, and its cyclic-right neighbour sits at approach
//! `(i + 1) % 4`.

use std::fmt;

/// A cell on the simulation grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub row: i32,
    pub col: i32,
}

impl GridPosition {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell one step in `heading`'s direction.
    #[inline]
    pub fn step(self, heading: Heading) -> GridPosition {
        let (dr, dc) = heading.offset();
        GridPosition::new(self.row + dr, self.col + dc)
    }

    /// `true` if the cell lies on a `size × size` grid.
    #[inline]
    pub fn in_bounds(self, size: usize) -> bool {
        let size = size as i32;
        (0..size).contains(&self.row) && (0..size).contains(&self.col)
    }

    /// Chebyshev distance (king moves) to `other`.
    #[inline]
    pub fn chebyshev(self, other: GridPosition) -> u32 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ── Axis ──────────────────────────────────────────────────────────────────────

/// Grouping of two opposite headings, used to aggregate wait-time priority.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical   => "vertical",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Heading ───────────────────────────────────────────────────────────────────

/// One of the four cardinal travel directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heading {
    South,
    East,
    North,
    West,
}

impl Heading {
    /// All headings in counter-clockwise order (index = cyclic index).
    pub const CCW: [Heading; 4] = [Heading::South, Heading::East, Heading::North, Heading::West];

    /// Position of this heading in the counter-clockwise cycle.
    #[inline]
    pub fn ccw_index(self) -> usize {
        match self {
            Heading::South => 0,
            Heading::East  => 1,
            Heading::North => 2,
            Heading::West  => 3,
        }
    }

    /// Heading at `index` of the counter-clockwise cycle (taken mod 4).
    #[inline]
    pub fn from_ccw_index(index: usize) -> Heading {
        Self::CCW[index % 4]
    }

    /// Rotate `steps` positions counter-clockwise.
    #[inline]
    pub fn rotate_ccw(self, steps: usize) -> Heading {
        Self::from_ccw_index(self.ccw_index() + steps)
    }

    /// A left turn is one counter-clockwise step.
    #[inline]
    pub fn turn_left(self) -> Heading {
        self.rotate_ccw(1)
    }

    /// A right turn is one clockwise step, i.e. three counter-clockwise steps.
    #[inline]
    pub fn turn_right(self) -> Heading {
        self.rotate_ccw(3)
    }

    /// `(d_row, d_col)` of one step in this heading.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Heading::South => (1, 0),
            Heading::East  => (0, 1),
            Heading::North => (-1, 0),
            Heading::West  => (0, -1),
        }
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Heading::South | Heading::North => Axis::Vertical,
            Heading::East | Heading::West   => Axis::Horizontal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Heading::South => "south",
            Heading::East  => "east",
            Heading::North => "north",
            Heading::West  => "west",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
