//! `tj-sim` — episode and tick loop for the traffic-junction simulator.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.max_steps (or until every agent is terminal):
//!   ① Observe   — each driver latches its window and updates its heading.
//!   ② Register  — the channel maps every placed agent's cell to its heading.
//!   ③ Broadcast — communicating drivers at an approach send their wait to
//!                 each visible peer; deliveries merge in AgentId order.
//!   ④ Decide    — every driver picks advance / yield against the read-only
//!                 channel (parallel with the `parallel` feature).
//!   ⑤ Step      — the world moves, resolves collisions and spawns arrivals.
//!   ⑥ Teardown  — the channel and every claim are cleared.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the decision phase on Rayon's thread pool.        |
//! | `fx-hash`  | FxHash for the channel's position registry.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tj_core::SimConfig;
//! use tj_sim::{NoopObserver, SimBuilder, Team};
//!
//! let mut sim = SimBuilder::new(SimConfig::default())
//!     .team(Team::Communicating)
//!     .build()?;
//! let episodes = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod team;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{EpisodeSummary, NoopObserver, SimObserver, TickSummary};
pub use sim::Sim;
pub use team::Team;
