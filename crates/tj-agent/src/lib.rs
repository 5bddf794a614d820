//! `tj-agent` — the state one vehicle-agent carries between ticks.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`state`]   | `AgentState` — everything a driver owns across ticks         |
//! | [`tracker`] | `TurnTracker`, `TurnPhase`, `next_position`                  |
//! | [`wait`]    | `WaitAccumulator`, `WaitClaim`, `WaitSample`                 |
//!
//! # Ownership
//!
//! An `AgentState` is owned by exactly one driver.  During the decision phase
//! each driver is borrowed mutably by one worker while the communication
//! registry is shared read-only, so no state here ever needs a lock.

pub mod state;
pub mod tracker;
pub mod wait;


pub use state::AgentState;
pub use tracker::{TurnPhase, TurnTracker, next_position};
pub use wait::{WaitAccumulator, WaitClaim, WaitSample};
