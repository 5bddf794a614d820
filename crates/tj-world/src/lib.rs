//! `tj-world` — the discrete grid world the agents drive in.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`route`]   | `Route`, `RouteTable` — the twelve (approach, intent) cell paths  |
//! | [`vehicle`] | `VehicleState`, `VehicleStatus`                                   |
//! | [`store`]   | `VehicleStore` — `Vec<VehicleState>` + cell occupancy index       |
//! | [`engine`]  | `GridWorld`, `StepOutcome` — spawning, movement, collisions       |
//! | [`error`]   | `WorldError`, `WorldResult<T>`                                    |
//!
//! # Movement model
//!
//! One cell per tick along a fixed route.  The world is the source of truth
//! for collisions: it never prevents two vehicles from entering the same
//! cell, it only detects that they did and removes both.

pub mod engine;
pub mod error;
pub mod route;
pub mod store;
pub mod vehicle;


pub use engine::{GridWorld, StepOutcome};
pub use error::{WorldError, WorldResult};
pub use route::{Route, RouteTable};
pub use store::VehicleStore;
pub use vehicle::{VehicleState, VehicleStatus};
