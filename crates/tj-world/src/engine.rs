//! The grid-world transition engine.

use std::sync::Arc;

use tj_behavior::{CellObservation, ObservationWindow};
use tj_core::{Action, AgentId, RouteIntent, SimConfig, SimRng, Tick};
use tj_topology::JunctionTopology;
use tracing::{debug, trace};

use crate::{RouteTable, VehicleStatus, VehicleStore, WorldError, WorldResult};

/// Result of one [`GridWorld::step`].
#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// One window per agent, indexed by `AgentId`.
    pub observations: Vec<ObservationWindow>,
    pub reward:       f64,
    /// Per-agent terminal flag (arrived or crashed).
    pub terminal:     Vec<bool>,
    /// Cells in which two or more vehicles ended up this tick.
    pub collisions:   u32,
    /// Every agent terminal or the step budget spent.
    pub done:         bool,
}

/// Square grid with one junction, stepped with a joint action vector.
///
/// # Step order
///
/// 1. Every active vehicle whose action is `Advance` moves one cell along
///    its route; `Yield` stays put.  Driving off the route's end arrives.
/// 2. Vehicles sharing a cell crash; each such cell is one collision.
/// 3. Each waiting vehicle spawns with probability `arrive_prob` at a random
///    free entry cell with a random intent.
pub struct GridWorld {
    config:   SimConfig,
    topology: Arc<JunctionTopology>,
    routes:   RouteTable,
    store:    VehicleStore,
    rng:      SimRng,
    tick:     Tick,
}

impl GridWorld {
    /// # Errors
    ///
    /// Invalid `config`, junction cells off the grid, or a topology whose
    /// routes cannot be traced.
    pub fn new(config: SimConfig, topology: Arc<JunctionTopology>) -> WorldResult<Self> {
        config.validate()?;
        topology.check_bounds(config.grid_size)?;
        let routes = RouteTable::build(&topology, config.grid_size)?;
        Ok(Self {
            store: VehicleStore::new(config.n_agents),
            rng: SimRng::new(config.seed),
            tick: Tick::ZERO,
            config,
            topology,
            routes,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn topology(&self) -> &Arc<JunctionTopology> {
        &self.topology
    }

    #[inline]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[inline]
    pub fn store(&self) -> &VehicleStore {
        &self.store
    }

    pub fn is_done(&self) -> bool {
        self.store.all_terminal() || self.tick >= self.config.end_tick()
    }

    // ── Episode control ───────────────────────────────────────────────────

    /// Start a fresh episode driven by `rng` and return the first
    /// observations.
    pub fn reset(&mut self, rng: SimRng) -> Vec<ObservationWindow> {
        self.rng = rng;
        self.tick = Tick::ZERO;
        self.store.reset();
        self.spawn_arrivals();
        self.observations()
    }

    /// Put `agent` on the entry cell of route `(approach, intent)` without
    /// drawing from the RNG.
    pub fn place(&mut self, agent: AgentId, approach: usize, intent: RouteIntent) {
        self.store.spawn(agent, approach % 4, intent, &self.routes);
    }

    /// Apply the joint action vector, one action per agent.
    ///
    /// Actions of vehicles that are not active are ignored.
    pub fn step(&mut self, actions: &[Action]) -> WorldResult<StepOutcome> {
        if actions.len() != self.store.len() {
            return Err(WorldError::ActionCount { expected: self.store.len(), got: actions.len() });
        }

        let present = self.store.active_count();
        for (i, action) in actions.iter().enumerate() {
            if *action == Action::Advance && self.store.advance(AgentId(i as u32), &self.routes) {
                trace!(agent = i, tick = %self.tick, "vehicle arrived");
            }
        }

        let collisions = self.store.resolve_collisions();
        if collisions > 0 {
            debug!(tick = %self.tick, collisions, "collision");
        }
        let reward = self.config.step_cost * present as f64 + self.config.collision_reward * collisions as f64;

        self.tick = self.tick + 1;
        self.spawn_arrivals();

        Ok(StepOutcome {
            observations: self.observations(),
            reward,
            terminal: self.store.states.iter().map(|s| s.status.is_terminal()).collect(),
            collisions,
            done: self.is_done(),
        })
    }

    /// [`step`](Self::step) with actions in their integer encoding
    /// (`0` advance, `1` yield).
    pub fn step_codes(&mut self, codes: &[u8]) -> WorldResult<StepOutcome> {
        let actions = codes
            .iter()
            .map(|&c| Action::from_code(c))
            .collect::<Result<Vec<_>, _>>()?;
        self.step(&actions)
    }

    // ── Observation ───────────────────────────────────────────────────────

    pub fn observations(&self) -> Vec<ObservationWindow> {
        (0..self.store.len()).map(|i| self.observe(AgentId(i as u32))).collect()
    }

    /// Window centred on `agent`.  Empty when the agent is not on the grid.
    pub fn observe(&self, agent: AgentId) -> ObservationWindow {
        let size = self.config.window_size;
        let mut window = ObservationWindow::empty(size);
        let Some(center) = self.store.get(agent).position else {
            return window;
        };
        let half = (size / 2) as i32;
        for (other, state) in self.store.active() {
            let Some(position) = state.position else { continue };
            let r = position.row - center.row + half;
            let c = position.col - center.col + half;
            if (0..size as i32).contains(&r) && (0..size as i32).contains(&c) {
                window.set(r as usize, c as usize, CellObservation {
                    agent: Some(other),
                    position,
                    intent: state.intent,
                });
            }
        }
        window
    }

    // ── Spawning ──────────────────────────────────────────────────────────

    fn spawn_arrivals(&mut self) {
        for i in 0..self.store.len() {
            let agent = AgentId(i as u32);
            if self.store.get(agent).status != VehicleStatus::Waiting {
                continue;
            }
            if !self.rng.gen_bool(self.config.arrive_prob) {
                continue;
            }
            let free: Vec<usize> = (0..4)
                .filter(|&a| !self.store.is_occupied(self.routes.entry(a)))
                .collect();
            let (Some(&approach), Some(&intent)) = (self.rng.choose(&free), self.rng.choose(&RouteIntent::ALL))
            else {
                continue;
            };
            self.store.spawn(agent, approach, intent, &self.routes);
            trace!(%agent, approach, %intent, tick = %self.tick, "vehicle spawned");
        }
    }
}
