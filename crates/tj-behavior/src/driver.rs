//! The `Driver` trait and the drivers that implement it.
//!
//! Every driver wraps a [`Perception`], which owns the agent's
//! [`AgentState`] and performs the steps common to all of them: latching
//! the observation, tracking heading, and accounting wait time.  Drivers
//! differ only in how they pick an [`Action`].

use std::sync::Arc;

use tj_agent::{AgentState, WaitClaim, WaitSample};
use tj_core::{Action, AgentId, AgentRng, Axis, GridPosition, Heading};
use tj_topology::JunctionTopology;
use tracing::warn;

use crate::{ArbitrationEngine, ArbitrationInput, CommunicationChannel, LocalView, ObservationWindow, extract};

/// Output of [`Driver::decide`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Decision {
    pub action:      Action,
    /// Wait-time sample of the traversal that entered the junction this tick.
    pub wait_sample: Option<WaitSample>,
}

/// Per-agent decision maker driven by the simulator.
///
/// # Call order within a tick
///
/// ```text
///   see → update_moving_direction → broadcast → receive_wait* → decide → end_tick
/// ```
///
/// `broadcast` and `decide` only read the channel, so the decision phase may
/// run on several workers at once.
pub trait Driver: Send {
    fn id(&self) -> AgentId;

    /// Latch this tick's observation.
    fn see(&mut self, window: &ObservationWindow);

    /// Bring the heading up to date.  Must precede `decide`.
    fn update_moving_direction(&mut self);

    fn position(&self) -> Option<GridPosition>;

    fn heading(&self) -> Option<Heading>;

    /// Queue outgoing wait claims.  Default: silent.
    fn broadcast(&self, _channel: &mut CommunicationChannel) {}

    /// Merge a claim delivered this tick.  Default: ignored.
    fn receive_wait(&mut self, _claim: WaitClaim) {}

    fn decide(&mut self, channel: &CommunicationChannel) -> Decision;

    /// Drop per-tick state once the world has stepped.
    fn end_tick(&mut self) {}

    /// Clear all episode state.  Idempotent.
    fn reset_episode(&mut self);
}

// ── Perception ────────────────────────────────────────────────────────────────

/// Shared per-agent bookkeeping.
#[derive(Clone, Debug)]
pub struct Perception {
    state:     AgentState,
    topology:  Arc<JunctionTopology>,
    view:      LocalView,
    malformed: bool,
}

impl Perception {
    pub fn new(id: AgentId, topology: Arc<JunctionTopology>) -> Self {
        Self {
            state: AgentState::new(id),
            topology,
            view: LocalView::empty(),
            malformed: false,
        }
    }

    #[inline]
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    #[inline]
    pub fn view(&self) -> &LocalView {
        &self.view
    }

    #[inline]
    pub fn topology(&self) -> &JunctionTopology {
        &self.topology
    }

    /// `true` when the last observation could not be decoded.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    pub fn see(&mut self, window: &ObservationWindow) {
        let me = window.center().map(|c| c.position);
        match extract(window, me) {
            Ok(view) => {
                self.state.observe(view.self_position, view.self_intent);
                self.view = view;
                self.malformed = false;
            }
            Err(error) => {
                warn!(agent = %self.state.id, %error, "malformed observation, defaulting to advance");
                self.state.observe(None, None);
                self.view = LocalView::empty();
                self.malformed = true;
            }
        }
    }

    pub fn update_heading(&mut self) -> Option<Heading> {
        self.state.update_heading(&self.topology)
    }

    /// The agent's axis while it waits at an approach cell.
    pub fn approach_axis(&self) -> Option<Axis> {
        let position = self.state.position?;
        self.topology.approach_at(position).map(|a| a.axis())
    }

    pub fn receive_wait(&mut self, claim: WaitClaim) {
        let own_axis = self.approach_axis();
        self.state.receive_wait(claim, own_axis);
    }

    pub fn tick_wait(&mut self) -> Option<WaitSample> {
        self.state.tick_wait(&self.topology)
    }

    pub fn end_tick(&mut self) {
        self.state.clear_claims();
    }

    pub fn reset_episode(&mut self) {
        self.state.reset_episode();
        self.view = LocalView::empty();
        self.malformed = false;
    }
}

/// Forward the bookkeeping half of [`Driver`] to a `perception` field.
macro_rules! delegate_perception {
    () => {
        fn id(&self) -> AgentId {
            self.perception.state().id
        }

        fn see(&mut self, window: &ObservationWindow) {
            self.perception.see(window);
        }

        fn update_moving_direction(&mut self) {
            self.perception.update_heading();
        }

        fn position(&self) -> Option<GridPosition> {
            self.perception.state().position
        }

        fn heading(&self) -> Option<Heading> {
            self.perception.state().heading()
        }

        fn end_tick(&mut self) {
            self.perception.end_tick();
        }
    };
}

// ── JunctionAgent ─────────────────────────────────────────────────────────────

/// Driver that follows the arbitration engine.
pub struct JunctionAgent {
    perception: Perception,
    engine:     Arc<ArbitrationEngine>,
}

impl JunctionAgent {
    pub fn new(id: AgentId, engine: Arc<ArbitrationEngine>) -> Self {
        let perception = Perception::new(id, Arc::clone(engine.topology()));
        Self { perception, engine }
    }

    pub fn perception(&self) -> &Perception {
        &self.perception
    }
}

impl Driver for JunctionAgent {
    delegate_perception!();

    /// At an approach cell, tell every visible peer how long this agent has
    /// waited.
    fn broadcast(&self, channel: &mut CommunicationChannel) {
        if !self.engine.policy().communicates() {
            return;
        }
        let Some(axis) = self.perception.approach_axis() else {
            return;
        };
        let claim = WaitClaim::new(self.perception.state().waiting_time(), axis);
        for peer in &self.perception.view().peers {
            channel.broadcast_wait(peer.position, claim);
        }
    }

    fn receive_wait(&mut self, claim: WaitClaim) {
        self.perception.receive_wait(claim);
    }

    fn decide(&mut self, channel: &CommunicationChannel) -> Decision {
        let wait_sample = self.perception.tick_wait();
        let state = self.perception.state();
        let action = match state.position {
            Some(position) if !self.perception.is_malformed() => {
                let input = ArbitrationInput {
                    position,
                    heading: state.heading(),
                    intent:  state.intent,
                    peers:   &self.perception.view().peers,
                    claim:   state.highest_reported_wait(),
                };
                self.engine.decide(&input, channel)
            }
            _ => Action::Advance,
        };
        Decision { action, wait_sample }
    }

    fn reset_episode(&mut self) {
        self.perception.reset_episode();
    }
}

// ── Baselines ─────────────────────────────────────────────────────────────────

/// Always advances.
pub struct GreedyDriver {
    perception: Perception,
}

impl GreedyDriver {
    pub fn new(id: AgentId, topology: Arc<JunctionTopology>) -> Self {
        Self { perception: Perception::new(id, topology) }
    }
}

impl Driver for GreedyDriver {
    delegate_perception!();

    fn decide(&mut self, _channel: &CommunicationChannel) -> Decision {
        Decision { action: Action::Advance, wait_sample: self.perception.tick_wait() }
    }

    fn reset_episode(&mut self) {
        self.perception.reset_episode();
    }
}

/// Advances or yields uniformly at random.
///
/// The stream restarts from `seed` on every episode reset.
pub struct RandomDriver {
    perception: Perception,
    seed:       u64,
    rng:        AgentRng,
}

impl RandomDriver {
    pub fn new(id: AgentId, topology: Arc<JunctionTopology>, seed: u64) -> Self {
        Self { perception: Perception::new(id, topology), seed, rng: AgentRng::new(seed, id) }
    }
}

impl Driver for RandomDriver {
    delegate_perception!();

    fn decide(&mut self, _channel: &CommunicationChannel) -> Decision {
        let action = if self.rng.gen_bool(0.5) { Action::Advance } else { Action::Yield };
        Decision { action, wait_sample: self.perception.tick_wait() }
    }

    fn reset_episode(&mut self) {
        self.perception.reset_episode();
        self.rng = AgentRng::new(self.seed, self.id());
    }
}
