//! `tj-behavior` — how an agent sees, talks, and decides.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                     |
//! |-------------------|--------------------------------------------------------------|
//! | [`observation`]   | `ObservationWindow`, `CellObservation`, `LocalView`, `extract` |
//! | [`channel`]       | `CommunicationChannel` — per-tick position → agent relay     |
//! | [`arbitration`]   | `ArbitrationEngine`, `ArbitrationConfig`, `Policy`           |
//! | [`driver`]        | `Driver` trait, `JunctionAgent`, `GreedyDriver`, `RandomDriver` |
//! | [`error`]         | `ObserveError`, `ObserveResult<T>`                           |
//!
//! # Design notes
//!
//! The simulator runs each tick in two halves:
//!
//! 1. **Exchange** (sequential): drivers latch observations, update headings,
//!    register in the channel and queue wait claims, which are then merged
//!    into recipients in ascending `AgentId` order.
//!
//! 2. **Decide** (parallel-safe): every driver reads the channel and its own
//!    state only.  `ArbitrationEngine` holds no mutable state, so one
//!    `Arc<ArbitrationEngine>` is shared by a whole team.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | Use `FxHashMap` for the channel registry.                |

pub mod arbitration;
pub mod channel;
pub mod driver;
pub mod error;
pub mod observation;

#[cfg(test)]
mod tests;

pub use arbitration::{ArbitrationConfig, ArbitrationEngine, ArbitrationInput, Policy};
pub use channel::{CommunicationChannel, Delivery};
pub use driver::{Decision, Driver, GreedyDriver, JunctionAgent, Perception, RandomDriver};
pub use error::{ObserveError, ObserveResult};
pub use observation::{CellObservation, LocalView, ObservationWindow, Peer, extract};
