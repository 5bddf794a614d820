//! Direction & turn tracking.
//!
//! # State machine
//!
//! ```text
//!   ForwardOnly ──(approach cell)──▶ PendingIntent ──(1st interior cell)──┐
//!        ▲                                                                │
//!        │                          ┌── right turn / forward ──▶ Settled  │
//!        └──(leaves interior)───────┤                                     │
//!                                   └── left turn ──▶ InTurn ──(2nd)──▶ Settled
//! ```
//!
//! Turns settle against the heading recorded at the approach cell, never
//! against the current heading, so re-observing the same interior cell on a
//! later tick cannot rotate twice.
//!
//! A right turn is one clockwise step applied on the first interior cell; a
//! left turn is one counter-clockwise step applied once the second distinct
//! interior cell has been visited.  Forward never rotates.

use tj_core::{GridPosition, Heading, RouteIntent};
use tj_topology::{Classification, JunctionTopology};
use tracing::debug;

/// Where the agent is in its junction traversal.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum TurnPhase {
    /// On ordinary road; heading follows the lane.
    #[default]
    ForwardOnly,
    /// At an approach cell; intent recorded, nothing applied yet.
    PendingIntent,
    /// Inside the junction with a turn still to settle.
    InTurn,
    /// Inside the junction with the exit heading fixed.
    Settled,
}

/// Per-agent heading inference.
#[derive(Clone, Debug, Default)]
pub struct TurnTracker {
    heading:       Option<Heading>,
    entry_heading: Option<Heading>,
    visited:       Vec<GridPosition>,
    phase:         TurnPhase,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current inferred heading.  `None` until the agent has been seen on a
    /// lane or approach cell.
    #[inline]
    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    /// Distinct interior cells visited in the current traversal, in order.
    #[inline]
    pub fn visited(&self) -> &[GridPosition] {
        &self.visited
    }

    #[inline]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Advance the state machine for the agent observed at `position`.
    ///
    /// Returns the heading after the update.
    pub fn update(
        &mut self,
        position: GridPosition,
        intent:   Option<RouteIntent>,
        topology: &JunctionTopology,
    ) -> Option<Heading> {
        match topology.classify(position) {
            Classification::Interior(_) => self.update_interior(position, intent),

            Classification::Approach(approach) => {
                self.leave_junction();
                self.entry_heading = Some(approach.heading);
                self.heading = Some(approach.heading);
                self.phase = TurnPhase::PendingIntent;
            }

            Classification::Other => {
                self.leave_junction();
                self.phase = TurnPhase::ForwardOnly;
                if let Some(lane) = topology.lane_heading(position) {
                    self.heading = Some(lane);
                }
            }
        }
        self.heading
    }

    fn update_interior(&mut self, position: GridPosition, intent: Option<RouteIntent>) {
        if !self.visited.contains(&position) {
            self.visited.push(position);
        }
        // Spawned inside the junction: the current heading is the best
        // available entry heading.
        let Some(entry) = self.entry_heading.or(self.heading) else {
            return;
        };
        self.entry_heading = Some(entry);

        let (heading, phase) = match intent {
            Some(RouteIntent::TurnRight) => (entry.turn_right(), TurnPhase::Settled),
            Some(RouteIntent::TurnLeft) if self.visited.len() >= 2 => {
                (entry.turn_left(), TurnPhase::Settled)
            }
            Some(RouteIntent::TurnLeft) => (entry, TurnPhase::InTurn),
            Some(RouteIntent::Forward) => (entry, TurnPhase::Settled),
            None => (self.heading.unwrap_or(entry), self.phase),
        };

        if self.heading != Some(heading) {
            debug!(%position, from = ?self.heading, to = %heading, "heading changed in junction");
        }
        self.heading = Some(heading);
        self.phase = phase;
    }

    /// Forget the finished traversal once the agent is outside the interior.
    fn leave_junction(&mut self) {
        self.visited.clear();
        self.entry_heading = None;
    }

    /// Return to the freshly-constructed state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The cell one step ahead of `position` in `heading`.
///
/// Used only for collision prediction; moving agents is the environment's
/// job.
#[inline]
pub fn next_position(position: GridPosition, heading: Heading) -> GridPosition {
    position.step(heading)
}
