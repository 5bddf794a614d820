//! The `Sim` struct and its episode / tick loop.

use std::sync::Arc;

use tj_agent::WaitSample;
use tj_behavior::{CommunicationChannel, Decision, Driver, ObservationWindow};
use tj_core::{Action, AgentId, EpisodeId, SimConfig, SimRng, Tick};
use tj_topology::JunctionTopology;
use tj_world::{GridWorld, VehicleStatus};
use tracing::{info, trace};

use crate::{EpisodeSummary, SimObserver, SimResult, Team, TickSummary};

/// The main simulation runner.
///
/// `Sim` owns the world, one driver per agent, and the per-tick
/// communication channel, and drives the tick loop:
///
/// 1. **Observe**: every driver latches its window and updates its heading.
/// 2. **Exchange** (sequential): the channel is rebuilt from the drivers'
///    positions and headings, drivers queue wait claims, and the claims are
///    merged into their recipients in ascending `AgentId` order.
/// 3. **Decide** (optionally parallel with the `parallel` feature): every
///    driver decides against the now read-only channel.
/// 4. **Step**: the world applies the joint action vector; the channel is
///    torn down.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    /// `None` when the drivers were supplied by hand.
    pub team: Option<Team>,

    pub topology: Arc<JunctionTopology>,

    pub world: GridWorld,

    /// Indexed by `AgentId`.
    pub drivers: Vec<Box<dyn Driver>>,

    pub(crate) channel:      CommunicationChannel,
    pub(crate) observations: Vec<ObservationWindow>,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run `config.episodes` episodes.
    ///
    /// Episode `k` seeds its world from `(config.seed, k)` alone and every
    /// driver restarts its own random stream on reset, so any episode can be
    /// replayed on its own.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Vec<EpisodeSummary>> {
        let mut summaries = Vec::with_capacity(self.config.episodes as usize);
        for k in 0..self.config.episodes {
            summaries.push(self.run_episode(EpisodeId(k), observer)?);
        }
        observer.on_run_end(self.config.episodes);
        Ok(summaries)
    }

    /// Reset the world and every driver, then tick until the episode ends.
    pub fn run_episode<O: SimObserver>(
        &mut self,
        episode:  EpisodeId,
        observer: &mut O,
    ) -> SimResult<EpisodeSummary> {
        self.begin_episode(episode);
        observer.on_episode_start(episode);

        let mut summary = EpisodeSummary { episode, ..EpisodeSummary::default() };
        while !self.world.is_done() {
            let (tick, samples) = self.process_tick()?;
            for (agent, ticks) in samples {
                observer.on_wait_sample(episode, agent, ticks);
                summary.wait_samples.push(ticks);
            }
            summary.collisions += tick.collisions;
            summary.reward += tick.reward;
            observer.on_tick_end(episode, &tick);
        }

        summary.steps = self.world.tick().0;
        for state in &self.world.store().states {
            match state.status {
                VehicleStatus::Arrived => summary.arrived += 1,
                VehicleStatus::Crashed => summary.crashed += 1,
                _ => {}
            }
        }
        info!(
            team = self.team.map(Team::as_str).unwrap_or("custom"),
            %episode,
            steps = summary.steps,
            collisions = summary.collisions,
            mean_wait = summary.mean_wait(),
            "episode finished"
        );
        observer.on_episode_end(&summary);
        Ok(summary)
    }

    /// Start `episode` without ticking it.  Resets are idempotent.
    pub fn begin_episode(&mut self, episode: EpisodeId) {
        let rng = SimRng::new(self.config.seed).child(episode.0 as u64);
        self.observations = self.world.reset(rng);
        self.channel.clear();
        for driver in &mut self.drivers {
            driver.reset_episode();
        }
    }

    /// Run one tick of the current episode.
    ///
    /// Returns the tick summary and the wait samples reported this tick.
    pub fn process_tick(&mut self) -> SimResult<(TickSummary, Vec<(AgentId, WaitSample)>)> {
        let now: Tick = self.world.tick();

        // ── Observe ───────────────────────────────────────────────────────
        for (driver, window) in self.drivers.iter_mut().zip(&self.observations) {
            driver.see(window);
            driver.update_moving_direction();
        }

        // ── Exchange ──────────────────────────────────────────────────────
        self.channel.register(
            self.drivers
                .iter()
                .filter_map(|d| Some((d.id(), d.position()?, d.heading()))),
        );
        for driver in &self.drivers {
            driver.broadcast(&mut self.channel);
        }
        for delivery in self.channel.take_inbox() {
            self.drivers[delivery.to.index()].receive_wait(delivery.claim);
        }

        // ── Decide ────────────────────────────────────────────────────────
        let decisions = self.decide_all();
        let actions: Vec<Action> = decisions.iter().map(|d| d.action).collect();
        let samples: Vec<(AgentId, WaitSample)> = decisions
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.wait_sample.map(|w| (AgentId(i as u32), w)))
            .collect();

        // ── Step & teardown ───────────────────────────────────────────────
        let (active, advanced) = self
            .world
            .store()
            .active()
            .fold((0, 0), |(n, adv), (agent, _)| {
                (n + 1, adv + usize::from(actions[agent.index()] == Action::Advance))
            });
        let outcome = self.world.step(&actions)?;
        self.channel.clear();
        for driver in &mut self.drivers {
            driver.end_tick();
        }
        self.observations = outcome.observations;

        let summary = TickSummary {
            tick: now,
            active,
            advanced,
            yielded: active - advanced,
            collisions: outcome.collisions,
            reward: outcome.reward,
        };
        trace!(tick = %now, active, advanced, collisions = outcome.collisions, "tick");
        Ok((summary, samples))
    }

    /// Every driver decides against the read-only channel.
    #[cfg(not(feature = "parallel"))]
    fn decide_all(&mut self) -> Vec<Decision> {
        let channel = &self.channel;
        self.drivers.iter_mut().map(|d| d.decide(channel)).collect()
    }

    #[cfg(feature = "parallel")]
    fn decide_all(&mut self) -> Vec<Decision> {
        use rayon::prelude::*;

        let channel = &self.channel;
        let drivers = &mut self.drivers;
        let decide = move || -> Vec<Decision> {
            drivers.par_iter_mut().map(|d| d.decide(channel)).collect()
        };
        match &self.pool {
            Some(pool) => pool.install(decide),
            None => decide(),
        }
    }
}
