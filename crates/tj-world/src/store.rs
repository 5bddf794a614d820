//! The `VehicleStore` — per-vehicle state plus the cell occupancy index.

use std::collections::HashMap;

use tj_core::{AgentId, GridPosition, RouteIntent};

use crate::{RouteTable, VehicleState, VehicleStatus};

/// Holds world state for every vehicle.
///
/// `states` is indexed by `AgentId` and always has one entry per agent.
/// `occupancy` is sparse: it maps each occupied cell to its vehicles and is
/// rebuilt after every move, so a cell with two entries is a collision.
#[derive(Debug)]
pub struct VehicleStore {
    pub states: Vec<VehicleState>,
    occupancy:  HashMap<GridPosition, Vec<AgentId>>,
}

impl VehicleStore {
    /// All vehicles waiting to spawn.
    pub fn new(agent_count: usize) -> Self {
        Self {
            states:    vec![VehicleState::default(); agent_count],
            occupancy: HashMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> &VehicleState {
        &self.states[agent.index()]
    }

    pub fn reset(&mut self) {
        self.states.fill(VehicleState::default());
        self.occupancy.clear();
    }

    /// Put `agent` on the entry cell of route `(approach, intent)`.
    pub fn spawn(&mut self, agent: AgentId, approach: usize, intent: RouteIntent, routes: &RouteTable) {
        let entry = routes.entry(approach);
        self.states[agent.index()] = VehicleState::spawned(approach, intent, entry);
        self.occupancy.entry(entry).or_default().push(agent);
    }

    /// Move `agent` one cell along its route.  Returns `true` when the
    /// vehicle drove off the end of the route.
    pub fn advance(&mut self, agent: AgentId, routes: &RouteTable) -> bool {
        let state = &mut self.states[agent.index()];
        if !state.is_active() {
            return false;
        }
        let Some(intent) = state.intent else {
            return false;
        };
        state.cursor += 1;
        match routes.route(state.approach, intent).cell(state.cursor) {
            Some(cell) => {
                state.position = Some(cell);
                false
            }
            None => {
                state.status = VehicleStatus::Arrived;
                state.position = None;
                true
            }
        }
    }

    /// Rebuild the occupancy index from active vehicles and crash every
    /// vehicle sharing a cell.  Returns the number of collided cells.
    pub fn resolve_collisions(&mut self) -> u32 {
        self.reindex();
        let mut collisions = 0;
        for agents in self.occupancy.values().filter(|a| a.len() > 1) {
            collisions += 1;
            for agent in agents {
                let state = &mut self.states[agent.index()];
                state.status = VehicleStatus::Crashed;
                state.position = None;
            }
        }
        if collisions > 0 {
            self.reindex();
        }
        collisions
    }

    fn reindex(&mut self) {
        self.occupancy.clear();
        for (i, state) in self.states.iter().enumerate() {
            if let (true, Some(position)) = (state.is_active(), state.position) {
                self.occupancy.entry(position).or_default().push(AgentId(i as u32));
            }
        }
    }

    #[inline]
    pub fn is_occupied(&self, position: GridPosition) -> bool {
        self.occupancy.get(&position).is_some_and(|a| !a.is_empty())
    }

    pub fn active(&self) -> impl Iterator<Item = (AgentId, &VehicleState)> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_active())
            .map(|(i, s)| (AgentId(i as u32), s))
    }

    pub fn active_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_active()).count()
    }

    pub fn all_terminal(&self) -> bool {
        self.states.iter().all(|s| s.status.is_terminal())
    }
}
