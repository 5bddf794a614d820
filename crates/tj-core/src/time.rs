//! Simulation time and run configuration.
//!
//! Time is a per-episode `Tick` counter.  Every agent observes the snapshot
//! taken at the start of a tick, and all actions are applied together at its
//! end, so there is no finer notion of time inside a tick.

use std::fmt;

use crate::{TjError, TjResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A tick counter, restarted at zero for every episode.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level experiment configuration.
///
/// Loaded from TOML by the harness (with the `serde` feature) and overridden
/// field-by-field from the command line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Side length of the square grid.  The junction sits at its centre.
    pub grid_size: usize,

    /// Side length of each agent's observation window.  Must be odd so the
    /// agent's own cell is the centre.
    pub window_size: usize,

    /// Number of vehicle-agents per episode.
    pub n_agents: usize,

    /// Step budget; an episode is cut off after this many ticks.
    pub max_steps: u64,

    /// Per-tick probability that an unspawned agent enters the grid.
    pub arrive_prob: f64,

    /// Reward added per active agent per tick (negative = cost).
    pub step_cost: f64,

    /// Reward added per collision.
    pub collision_reward: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Episodes per team.
    pub episodes: u32,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size:        14,
            window_size:      5,
            n_agents:         4,
            max_steps:        100,
            arrive_prob:      0.5,
            step_cost:        -0.01,
            collision_reward: -10.0,
            seed:             42,
            episodes:         20,
            num_threads:      None,
        }
    }
}

impl SimConfig {
    /// The tick at which an episode is cut off (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.max_steps)
    }

    /// Reject configurations the simulator cannot run.
    pub fn validate(&self) -> TjResult<()> {
        if self.grid_size < 6 {
            return Err(TjError::Config(format!(
                "grid_size {} is too small for a four-way junction (minimum 6)",
                self.grid_size
            )));
        }
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(TjError::Config(format!(
                "window_size {} must be odd and at least 3",
                self.window_size
            )));
        }
        if self.n_agents == 0 {
            return Err(TjError::Config("n_agents must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.arrive_prob) {
            return Err(TjError::Config(format!(
                "arrive_prob {} is outside [0, 1]",
                self.arrive_prob
            )));
        }
        Ok(())
    }
}
