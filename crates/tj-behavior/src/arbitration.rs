//! The right-of-way arbitration engine.
//!
//! # Decision order (first match wins)
//!
//! 1. Inside the junction → advance.
//! 2. On ordinary road → yield iff a visible peer occupies the next cell.
//! 3. At an approach cell, over **every** visible peer:
//!    - a. peer inside the junction, not turning right, and still inside
//!      next tick → yield;
//!    - b. peer at another approach → wait-time priority if a claim is held,
//!      else the static rule (3c).
//! 4. Otherwise → advance.
//!
//! # Static rule
//!
//! Approach `i` yields to a peer at approach `(i + 1) % 4`, except that the
//! approach with maximum fixed priority never yields statically and the
//! approach with minimum fixed priority yields to any other approacher.
//! Without a claim every other approacher also yields to an occupied
//! maximum-priority approach, so each pair of approaches admits one agent.
//! The static rule applies whenever no wait claim is in force: always under
//! [`Policy::StaticOnly`], and on claim-free ticks under
//! [`Policy::StaticWithCommunication`].

use std::sync::Arc;

use tj_agent::{WaitClaim, next_position};
use tj_core::{Action, Axis, GridPosition, Heading, RouteIntent};
use tj_topology::{ApproachCell, Classification, JunctionTopology};
use tracing::debug;

use crate::{CommunicationChannel, Peer};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Which layers of the right-of-way logic are active.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Policy {
    /// Static counter-clockwise order only; no wait-time broadcasts.
    StaticOnly,
    /// Static order overridden by communicated wait-time priority.
    #[default]
    StaticWithCommunication,
}

impl Policy {
    #[inline]
    pub fn communicates(self) -> bool {
        self == Policy::StaticWithCommunication
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Policy::StaticOnly              => "static",
            Policy::StaticWithCommunication => "communicating",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ArbitrationConfig {
    pub policy:             Policy,
    /// Approach cyclic index that never yields by the static rule.
    pub max_priority_index: usize,
    /// Approach cyclic index that yields to every other approacher.
    pub min_priority_index: usize,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            policy:             Policy::default(),
            max_priority_index: 0,
            min_priority_index: 1,
        }
    }
}

impl ArbitrationConfig {
    pub fn with_policy(policy: Policy) -> Self {
        Self { policy, ..Self::default() }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Everything one agent brings to a decision.
#[derive(Copy, Clone, Debug)]
pub struct ArbitrationInput<'a> {
    pub position: GridPosition,
    pub heading:  Option<Heading>,
    pub intent:   Option<RouteIntent>,
    pub peers:    &'a [Peer],
    /// The agent's `highest_reported_wait` this tick.
    pub claim:    Option<WaitClaim>,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Stateless decision function shared by every agent of a team.
#[derive(Clone, Debug)]
pub struct ArbitrationEngine {
    config:   ArbitrationConfig,
    topology: Arc<JunctionTopology>,
}

impl ArbitrationEngine {
    pub fn new(topology: Arc<JunctionTopology>, config: ArbitrationConfig) -> Self {
        Self { config, topology }
    }

    #[inline]
    pub fn config(&self) -> &ArbitrationConfig {
        &self.config
    }

    #[inline]
    pub fn policy(&self) -> Policy {
        self.config.policy
    }

    #[inline]
    pub fn topology(&self) -> &Arc<JunctionTopology> {
        &self.topology
    }

    /// Decide advance or yield for one agent.
    ///
    /// `channel` is only read (peer heading queries).
    pub fn decide(&self, input: &ArbitrationInput<'_>, channel: &CommunicationChannel) -> Action {
        match self.topology.classify(input.position) {
            Classification::Interior(_) => Action::Advance,
            Classification::Other => self.decide_on_road(input),
            Classification::Approach(approach) => self.decide_at_approach(&approach, input, channel),
        }
    }

    fn decide_on_road(&self, input: &ArbitrationInput<'_>) -> Action {
        let Some(heading) = input.heading else {
            return Action::Advance;
        };
        let ahead = next_position(input.position, heading);
        if input.peers.iter().any(|p| p.position == ahead) {
            Action::Yield
        } else {
            Action::Advance
        }
    }

    fn decide_at_approach(
        &self,
        me:      &ApproachCell,
        input:   &ArbitrationInput<'_>,
        channel: &CommunicationChannel,
    ) -> Action {
        let claim = if self.config.policy.communicates() { input.claim } else { None };

        // No early exit: every peer is checked.
        let mut must_yield = false;
        for peer in input.peers {
            must_yield |= match self.topology.classify(peer.position) {
                Classification::Interior(_) => self.blocks_junction(peer, channel),
                Classification::Approach(other) => match claim {
                    Some(claim) => self.yields_by_priority(me, &other, claim),
                    None => {
                        self.yields_statically(me, &other) || self.yields_to_max_priority(me, &other)
                    }
                },
                Classification::Other => false,
            };
        }

        if must_yield { Action::Yield } else { Action::Advance }
    }

    /// Rule 3a.  A peer whose heading is unknown is skipped.
    fn blocks_junction(&self, peer: &Peer, channel: &CommunicationChannel) -> bool {
        if peer.intent == Some(RouteIntent::TurnRight) {
            return false;
        }
        channel
            .query_heading(peer.position)
            .is_some_and(|h| self.topology.is_interior(next_position(peer.position, h)))
    }

    /// Rule 3b with a wait claim in force.
    fn yields_by_priority(&self, me: &ApproachCell, other: &ApproachCell, claim: WaitClaim) -> bool {
        let my_axis: Axis = me.axis();
        if my_axis != claim.axis {
            debug!(
                approach = me.cyclic_index,
                priority_axis = %claim.axis,
                wait = claim.value,
                "yielding to priority axis"
            );
            return true;
        }
        // On the priority axis: exempt from yielding to the other axis.
        if other.axis() != claim.axis {
            return false;
        }
        self.yields_statically(me, other)
    }

    /// Rules 3b/3c without a claim.
    fn yields_statically(&self, me: &ApproachCell, other: &ApproachCell) -> bool {
        let i = me.cyclic_index;
        if i == self.config.max_priority_index {
            return false;
        }
        if i == self.config.min_priority_index {
            return other.cyclic_index != i;
        }
        other.cyclic_index == JunctionTopology::cyclic_neighbor_right(i)
    }

    /// Rule 3c, claim-free ticks only: the maximum-priority approach, when
    /// occupied, holds back every other approacher.  With the cyclic rule
    /// this admits exactly one agent from any pair of approaches.
    fn yields_to_max_priority(&self, me: &ApproachCell, other: &ApproachCell) -> bool {
        let max = self.config.max_priority_index;
        me.cyclic_index != max && other.cyclic_index == max
    }
}
