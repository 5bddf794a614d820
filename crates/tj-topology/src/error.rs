//! Topology misconfiguration errors.
//!
//! All of these are fatal at start-up: an inconsistent table would produce
//! silently wrong right-of-way decisions.

use thiserror::Error;

use tj_core::{GridPosition, Heading};

/// Errors produced by `tj-topology`.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("expected 4 {kind} cells, got {got}")]
    WrongCount { kind: &'static str, got: usize },

    #[error("{kind} cyclic index {index} is duplicated or outside 0..4")]
    BadIndex { kind: &'static str, index: usize },

    #[error("cell {0} is declared more than once")]
    Overlap(GridPosition),

    #[error("approach {index} travels {heading}, which is not cyclic heading {index}")]
    HeadingMismatch { index: usize, heading: Heading },

    #[error("approach cell {0} does not lead directly into the junction interior")]
    DetachedApproach(GridPosition),

    #[error("interior cells do not form a 2×2 block")]
    ScatteredInterior,

    #[error("lane {line} is declared with two different headings")]
    ConflictingLane { line: String },

    #[error("cell {position} lies outside a {grid_size}×{grid_size} grid")]
    OutOfBounds { position: GridPosition, grid_size: usize },
}

pub type TopologyResult<T> = Result<T, TopologyError>;
