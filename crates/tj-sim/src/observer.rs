//! Simulation observer trait and the summaries it receives.

use tj_agent::WaitSample;
use tj_core::{AgentId, EpisodeId, Tick};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub tick:       Tick,
    /// Agents on the grid when the tick began.
    pub active:     usize,
    pub advanced:   usize,
    pub yielded:    usize,
    pub collisions: u32,
    pub reward:     f64,
}

/// Aggregates for one finished episode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeSummary {
    pub episode:      EpisodeId,
    /// Ticks until every agent was terminal or the budget ran out.
    pub steps:        u64,
    pub collisions:   u32,
    pub reward:       f64,
    pub arrived:      usize,
    pub crashed:      usize,
    /// One sample per junction traversal, in report order.
    pub wait_samples: Vec<WaitSample>,
}

impl EpisodeSummary {
    /// Mean junction wait over the episode's traversals; `0.0` with none.
    pub fn mean_wait(&self) -> f64 {
        if self.wait_samples.is_empty() {
            return 0.0;
        }
        let total: u64 = self.wait_samples.iter().map(|&w| w as u64).sum();
        total as f64 / self.wait_samples.len() as f64
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points of the
/// episode loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — collision printer
///
/// ```rust,ignore
/// struct CollisionPrinter;
///
/// impl SimObserver for CollisionPrinter {
///     fn on_tick_end(&mut self, episode: EpisodeId, tick: &TickSummary) {
///         if tick.collisions > 0 {
///             println!("{episode} {}: {} collisions", tick.tick, tick.collisions);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    fn on_episode_start(&mut self, _episode: EpisodeId) {}

    /// Called after the world has applied the tick's joint action.
    fn on_tick_end(&mut self, _episode: EpisodeId, _tick: &TickSummary) {}

    /// Called when an agent reports the wait of a completed approach.
    fn on_wait_sample(&mut self, _episode: EpisodeId, _agent: AgentId, _ticks: WaitSample) {}

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}

    /// Called once after the final episode.
    fn on_run_end(&mut self, _episodes: u32) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
