//! Per-tick communication channel.
//!
//! # Lifecycle
//!
//! ```text
//!   register ──▶ query_heading / broadcast_wait ──▶ take_inbox ──▶ clear
//! ```
//!
//! The registry is rebuilt from scratch by [`register`](CommunicationChannel::register)
//! every tick and emptied by [`clear`](CommunicationChannel::clear) after the
//! world step, so nothing read in one tick can originate from another.
//! Broadcasts do not touch recipients directly: they are queued in an inbox
//! the simulator drains and delivers before the decision phase, which keeps
//! the registry read-only while drivers decide.

use tj_agent::WaitClaim;
use tj_core::{AgentId, GridPosition, Heading};

#[cfg(feature = "fx-hash")]
type PositionMap<V> = rustc_hash::FxHashMap<GridPosition, V>;
#[cfg(not(feature = "fx-hash"))]
type PositionMap<V> = std::collections::HashMap<GridPosition, V>;

#[derive(Copy, Clone, Debug)]
struct Registration {
    agent:   AgentId,
    heading: Option<Heading>,
}

/// A wait claim waiting to be merged into its recipient.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Delivery {
    pub to:    AgentId,
    pub claim: WaitClaim,
}

/// Position → agent relay.
#[derive(Debug, Default)]
pub struct CommunicationChannel {
    registry: PositionMap<Registration>,
    inbox:    Vec<Delivery>,
}

impl CommunicationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the registry from this tick's `(agent, position, heading)`
    /// triples.  Any previous registration and undelivered claim is dropped.
    pub fn register<I>(&mut self, agents: I)
    where
        I: IntoIterator<Item = (AgentId, GridPosition, Option<Heading>)>,
    {
        self.clear();
        for (agent, position, heading) in agents {
            self.registry.insert(position, Registration { agent, heading });
        }
    }

    /// Heading of the agent at `position`; `None` when no agent is there or
    /// its heading is not yet known.
    #[inline]
    pub fn query_heading(&self, position: GridPosition) -> Option<Heading> {
        self.registry.get(&position).and_then(|r| r.heading)
    }

    #[inline]
    pub fn agent_at(&self, position: GridPosition) -> Option<AgentId> {
        self.registry.get(&position).map(|r| r.agent)
    }

    /// Queue `claim` for the agent at `to`.
    ///
    /// Returns `false` (and drops the claim) when nobody is registered there.
    pub fn broadcast_wait(&mut self, to: GridPosition, claim: WaitClaim) -> bool {
        match self.agent_at(to) {
            Some(agent) => {
                self.inbox.push(Delivery { to: agent, claim });
                true
            }
            None => false,
        }
    }

    /// Drain queued claims, ordered by recipient.  Claims to the same
    /// recipient keep their send order.
    pub fn take_inbox(&mut self) -> Vec<Delivery> {
        let mut out = std::mem::take(&mut self.inbox);
        out.sort_by_key(|d| d.to);
        out
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Tear down after the tick.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.inbox.clear();
    }
}
