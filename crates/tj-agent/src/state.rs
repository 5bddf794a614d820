//! `AgentState` — everything one vehicle-agent carries between ticks.

use tj_core::{AgentId, Axis, GridPosition, Heading, RouteIntent};
use tj_topology::JunctionTopology;

use crate::{TurnTracker, WaitAccumulator, WaitClaim, WaitSample};

/// Per-agent mutable state.
///
/// `position` and `intent` are latched from the latest observation; the
/// tracker and wait accumulator persist across ticks; `highest_reported_wait`
/// lives for exactly one tick.
#[derive(Clone, Debug)]
pub struct AgentState {
    pub id:                    AgentId,
    pub position:              Option<GridPosition>,
    pub intent:                Option<RouteIntent>,
    tracker:                   TurnTracker,
    wait:                      WaitAccumulator,
    highest_reported_wait:     Option<WaitClaim>,
}

impl AgentState {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            position:              None,
            intent:                None,
            tracker:               TurnTracker::new(),
            wait:                  WaitAccumulator::new(),
            highest_reported_wait: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn heading(&self) -> Option<Heading> {
        self.tracker.heading()
    }

    #[inline]
    pub fn visited(&self) -> &[GridPosition] {
        self.tracker.visited()
    }

    #[inline]
    pub fn tracker(&self) -> &TurnTracker {
        &self.tracker
    }

    #[inline]
    pub fn waiting_time(&self) -> u32 {
        self.wait.waiting_time()
    }

    #[inline]
    pub fn has_entered_junction(&self) -> bool {
        self.wait.has_entered_junction()
    }

    #[inline]
    pub fn highest_reported_wait(&self) -> Option<WaitClaim> {
        self.highest_reported_wait
    }

    // ── Per-tick updates ──────────────────────────────────────────────────

    /// Latch the agent's own cell and intent from this tick's observation.
    pub fn observe(&mut self, position: Option<GridPosition>, intent: Option<RouteIntent>) {
        self.position = position;
        self.intent = intent;
    }

    /// Run the turn tracker for the latched position.
    ///
    /// Leaving the interior re-arms the wait accumulator for the next
    /// traversal.  Does nothing while the agent is not on the grid.
    pub fn update_heading(&mut self, topology: &JunctionTopology) -> Option<Heading> {
        let Some(position) = self.position else {
            return self.heading();
        };
        let was_inside = !self.tracker.visited().is_empty();
        let heading = self.tracker.update(position, self.intent, topology);
        if was_inside && self.tracker.visited().is_empty() {
            self.wait.on_junction_exit();
        }
        heading
    }

    /// Account one tick of waiting; yields the traversal's sample on the tick
    /// of junction entry.
    pub fn tick_wait(&mut self, topology: &JunctionTopology) -> Option<WaitSample> {
        let in_interior = self.position.is_some_and(|p| topology.is_interior(p));
        self.wait.tick(self.position.is_some(), in_interior)
    }

    /// Merge a claim received this tick.
    ///
    /// `own_axis` is the agent's axis when it sits at an approach cell, else
    /// `None`.
    pub fn receive_wait(&mut self, claim: WaitClaim, own_axis: Option<Axis>) {
        self.highest_reported_wait =
            WaitClaim::merge(self.highest_reported_wait, claim, self.wait.waiting_time(), own_axis);
    }

    /// Drop this tick's received claim.
    pub fn clear_claims(&mut self) {
        self.highest_reported_wait = None;
    }

    /// Zero everything that belongs to an episode.  Idempotent.
    pub fn reset_episode(&mut self) {
        self.position = None;
        self.intent = None;
        self.tracker.reset();
        self.wait.reset();
        self.highest_reported_wait = None;
    }
}
