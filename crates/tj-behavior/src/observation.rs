//! Local observer: turning an observation window into a local view.
//!
//! # Window layout
//!
//! A window is a `size × size` square (row-major) centred on the observing
//! agent.  Each cell is either empty or carries the occupant's grid position
//! and declared intent.  The flat feature encoding used by external
//! environments packs every cell as
//!
//! ```text
//!   [ id_0 … id_{n-1} | row col | fwd right left ]
//! ```
//!
//! A cell is occupied when any id flag is set.

use tj_core::{AgentId, GridPosition, RouteIntent};

use crate::{ObserveError, ObserveResult};

/// Values per cell besides the `n_agents` id flags: two coordinates and
/// three route flags.
const CELL_TAIL: usize = 5;

/// One occupied window cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CellObservation {
    /// Occupant identity, when the environment exposes it.
    pub agent:    Option<AgentId>,
    pub position: GridPosition,
    /// `None` when the route flags were not a valid one-hot triple.
    pub intent:   Option<RouteIntent>,
}

/// A square observation window.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationWindow {
    size:  usize,
    cells: Vec<Option<CellObservation>>,
}

impl ObservationWindow {
    /// An all-empty window.
    pub fn empty(size: usize) -> Self {
        Self { size, cells: vec![None; size * size] }
    }

    /// Build from raw cells without validation.  [`extract`] checks the
    /// shape.
    pub fn from_cells(size: usize, cells: Vec<Option<CellObservation>>) -> Self {
        Self { size, cells }
    }

    /// Decode the flat per-cell feature vector.
    pub fn from_features(size: usize, n_agents: usize, features: &[f32]) -> ObserveResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(ObserveError::BadWindowSize(size));
        }
        let stride = n_agents + CELL_TAIL;
        let expected = size * size * stride;
        if features.len() != expected {
            return Err(ObserveError::ShapeMismatch { expected, got: features.len() });
        }

        let cells = features
            .chunks_exact(stride)
            .map(|cell| {
                let ids = &cell[..n_agents];
                let agent = ids.iter().position(|&v| v >= 0.5)?;
                let position = GridPosition::new(
                    cell[n_agents].round() as i32,
                    cell[n_agents + 1].round() as i32,
                );
                Some(CellObservation {
                    agent: AgentId::try_from(agent).ok(),
                    position,
                    intent: RouteIntent::from_one_hot(&cell[n_agents + 2..]),
                })
            })
            .collect();
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellObservation> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col)?.as_ref()
    }

    pub fn set(&mut self, row: usize, col: usize, cell: CellObservation) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = Some(cell);
        }
    }

    /// The centre cell, i.e. the observing agent itself when it is on the
    /// grid.
    pub fn center(&self) -> Option<&CellObservation> {
        let mid = self.size / 2;
        self.get(mid, mid)
    }

    pub fn occupied(&self) -> impl Iterator<Item = &CellObservation> {
        self.cells.iter().flatten()
    }
}

// ── Local view ────────────────────────────────────────────────────────────────

/// Another agent visible in the window.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Peer {
    pub position: GridPosition,
    pub intent:   Option<RouteIntent>,
}

/// What one agent knows about its surroundings this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalView {
    pub self_position: Option<GridPosition>,
    pub self_intent:   Option<RouteIntent>,
    pub peers:         Vec<Peer>,
}

impl LocalView {
    /// View of an agent not on the grid: no intent, no peers.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Extract the agent's own intent and every visible peer.
///
/// With `self_position == None` (agent not spawned) the result is an empty
/// view.  Pure function of its inputs.
///
/// # Errors
///
/// [`ObserveError`] when the window shape is inconsistent or the agent's own
/// cell is not in it.
pub fn extract(window: &ObservationWindow, self_position: Option<GridPosition>) -> ObserveResult<LocalView> {
    if window.size == 0 || window.size % 2 == 0 {
        return Err(ObserveError::BadWindowSize(window.size));
    }
    let expected = window.size * window.size;
    if window.cells.len() != expected {
        return Err(ObserveError::ShapeMismatch { expected, got: window.cells.len() });
    }
    let Some(me) = self_position else {
        return Ok(LocalView::empty());
    };

    let mut self_cell = None;
    let mut peers = Vec::new();
    for cell in window.occupied() {
        if cell.position == me {
            self_cell = Some(cell);
        } else {
            peers.push(Peer { position: cell.position, intent: cell.intent });
        }
    }

    let self_cell = self_cell.ok_or(ObserveError::MissingSelf(me))?;
    Ok(LocalView { self_position: Some(me), self_intent: self_cell.intent, peers })
}
