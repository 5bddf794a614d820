//! `tj-core` — foundational types for the traffic-junction simulator.
//!
//! This crate is a dependency of every other `tj-*` crate.  It intentionally
//! has no `tj-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `EpisodeId`                                |
//! | [`grid`]        | `GridPosition`, `Heading`, `Axis`                     |
//! | [`intent`]      | `RouteIntent`, `Action`                               |
//! | [`time`]        | `Tick`, `SimConfig`                                   |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `TjError`, `TjResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `SimConfig` from TOML.                    |

pub mod error;
pub mod grid;
pub mod ids;
pub mod intent;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TjError, TjResult};
pub use grid::{Axis, GridPosition, Heading};
pub use ids::{AgentId, EpisodeId};
pub use intent::{Action, RouteIntent};
pub use rng::{AgentRng, SimRng};
pub use time::{SimConfig, Tick};
