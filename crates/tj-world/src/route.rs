//! Fixed vehicle routes through the junction.
//!
//! One route per (approach, intent): the cells from the lane's entry cell on
//! the grid border, through the approach and interior cells, to the last
//! in-bounds cell of the exit lane.  Routes are generated by walking a
//! [`TurnTracker`], so vehicles turn exactly where the agents' own heading
//! inference expects them to.

use tj_agent::{TurnTracker, next_position};
use tj_core::{GridPosition, Heading, RouteIntent};
use tj_topology::JunctionTopology;

use crate::{WorldError, WorldResult};

/// The cell sequence a vehicle follows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub approach: usize,
    pub intent:   RouteIntent,
    cells:        Vec<GridPosition>,
}

impl Route {
    #[inline]
    pub fn cells(&self) -> &[GridPosition] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cell(&self, cursor: usize) -> Option<GridPosition> {
        self.cells.get(cursor).copied()
    }
}

/// All twelve routes of a four-approach junction.
#[derive(Clone, Debug)]
pub struct RouteTable {
    entries: [GridPosition; 4],
    /// Indexed by `approach * 3 + intent`.
    routes:  Vec<Route>,
}

impl RouteTable {
    /// Build every route for `topology` on a `grid_size × grid_size` grid.
    ///
    /// # Errors
    ///
    /// [`WorldError::NoEntry`] when an approach cannot be traced back to the
    /// border along its own lane, [`WorldError::UnboundedRoute`] when a route
    /// loops without leaving the grid.
    pub fn build(topology: &JunctionTopology, grid_size: usize) -> WorldResult<Self> {
        let mut entries = [GridPosition::new(0, 0); 4];
        let mut routes = Vec::with_capacity(12);

        for approach in topology.approaches() {
            let entry = trace_entry(topology, approach.position, approach.heading, grid_size)?;
            entries[approach.cyclic_index] = entry;
            for intent in RouteIntent::ALL {
                let cells = walk(topology, entry, intent, grid_size)?;
                routes.push(Route { approach: approach.cyclic_index, intent, cells });
            }
        }
        routes.sort_by_key(|r| r.approach * 3 + r.intent as usize);
        Ok(Self { entries, routes })
    }

    /// Border cell where vehicles bound for `approach` appear.
    #[inline]
    pub fn entry(&self, approach: usize) -> GridPosition {
        self.entries[approach % 4]
    }

    #[inline]
    pub fn entries(&self) -> &[GridPosition; 4] {
        &self.entries
    }

    #[inline]
    pub fn route(&self, approach: usize, intent: RouteIntent) -> &Route {
        &self.routes[(approach % 4) * 3 + intent as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

/// Walk backwards from an approach cell to the grid border.
fn trace_entry(
    topology:  &JunctionTopology,
    approach:  GridPosition,
    heading:   Heading,
    grid_size: usize,
) -> WorldResult<GridPosition> {
    let back = heading.rotate_ccw(2);
    let mut cell = approach;
    loop {
        let prev = cell.step(back);
        if !prev.in_bounds(grid_size) {
            break;
        }
        cell = prev;
    }
    if cell != approach && topology.lane_heading(cell) != Some(heading) {
        return Err(WorldError::NoEntry(approach));
    }
    Ok(cell)
}

fn walk(
    topology:  &JunctionTopology,
    entry:     GridPosition,
    intent:    RouteIntent,
    grid_size: usize,
) -> WorldResult<Vec<GridPosition>> {
    let mut tracker = TurnTracker::new();
    let Some(mut heading) = tracker.update(entry, Some(intent), topology) else {
        return Err(WorldError::NoEntry(entry));
    };
    let mut cells = vec![entry];
    let mut position = entry;

    for _ in 0..grid_size * 4 {
        position = next_position(position, heading);
        if !position.in_bounds(grid_size) {
            return Ok(cells);
        }
        cells.push(position);
        if let Some(h) = tracker.update(position, Some(intent), topology) {
            heading = h;
        }
    }
    Err(WorldError::UnboundedRoute { entry, intent })
}
