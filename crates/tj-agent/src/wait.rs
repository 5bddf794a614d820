//! Wait-time accounting and wait claims.

use tj_core::Axis;

/// Ticks an agent spent before entering the junction, reported once per
/// traversal.
pub type WaitSample = u32;

/// A wait-time claim exchanged between neighbours: "someone on `axis` has
/// been waiting `value` ticks".
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct WaitClaim {
    pub value: u32,
    pub axis:  Axis,
}

impl WaitClaim {
    pub fn new(value: u32, axis: Axis) -> Self {
        Self { value, axis }
    }

    /// Merge `incoming` into the claim currently held by an agent.
    ///
    /// - A larger incoming value replaces the held claim.
    /// - An equal value resolves to [`Axis::Vertical`].
    /// - With no claim held yet, the incoming value is compared against the
    ///   agent's own `own_wait`; if the agent has waited longer and is at an
    ///   approach cell (`own_axis` is `Some`), its own claim is held instead.
    pub fn merge(
        held:     Option<WaitClaim>,
        incoming: WaitClaim,
        own_wait: u32,
        own_axis: Option<Axis>,
    ) -> Option<WaitClaim> {
        let baseline = match held {
            Some(h) => h.value,
            None    => own_wait,
        };
        if incoming.value > baseline {
            Some(incoming)
        } else if incoming.value == baseline {
            Some(WaitClaim::new(incoming.value, Axis::Vertical))
        } else if held.is_some() {
            held
        } else {
            own_axis.map(|axis| WaitClaim::new(own_wait, axis))
        }
    }
}

/// Counts ticks spent on the grid before first entering the junction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitAccumulator {
    waiting_time:         u32,
    has_entered_junction: bool,
}

impl WaitAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn waiting_time(&self) -> u32 {
        self.waiting_time
    }

    #[inline]
    pub fn has_entered_junction(&self) -> bool {
        self.has_entered_junction
    }

    /// Account for one tick.
    ///
    /// `placed` is `false` while the agent is not on the grid.  Returns the
    /// traversal's sample on the tick the agent is first seen in the
    /// interior, and resets the counter at that moment.
    pub fn tick(&mut self, placed: bool, in_interior: bool) -> Option<WaitSample> {
        if !placed || self.has_entered_junction {
            return None;
        }
        if in_interior {
            self.has_entered_junction = true;
            let sample = self.waiting_time;
            self.waiting_time = 0;
            return Some(sample);
        }
        self.waiting_time += 1;
        None
    }

    /// Arm the accumulator for another traversal after a junction exit.
    pub fn on_junction_exit(&mut self) {
        self.has_entered_junction = false;
        self.waiting_time = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
