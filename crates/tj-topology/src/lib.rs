//! `tj-topology` — the static description of a four-way grid junction.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`topology`] | `JunctionTopology`, `JunctionTopologyBuilder`, `Classification` |
//! | [`lane`]     | `Lane`, `LaneLine` — one-way road lines and their headings      |
//! | [`error`]    | `TopologyError`, `TopologyResult<T>`                            |
//!
//! # Layout of the standard junction
//!
//! ```text
//!            col c   col c+1
//!              │ ↓     ↑ │
//!   row c-1    │ A0      │
//!   row c    ← │ I0    I3│ A3 ←   (westbound lane)
//!   row c+1  A1│ I1    I2│  →     (eastbound lane)
//!   row c+2    │       A2│
//! ```
//!
//! `A*` are approach cells and `I*` interior cells, numbered in the fixed
//! counter-clockwise cycle.  The topology is built once at start-up and is
//! immutable afterwards; any inconsistency is rejected by
//! [`JunctionTopologyBuilder::build`].

pub mod error;
pub mod lane;
pub mod topology;

#[cfg(test)]
mod tests;

pub use error::{TopologyError, TopologyResult};
pub use lane::{Lane, LaneLine};
pub use topology::{
    ApproachCell, Classification, InteriorCell, JunctionTopology, JunctionTopologyBuilder,
};
