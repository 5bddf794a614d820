//! Per-vehicle world state.

use tj_core::{GridPosition, RouteIntent};

/// Where a vehicle is in its life cycle.
///
/// ```text
///   Waiting ──(spawn)──▶ Active ──(route end)──▶ Arrived
///                          │
///                          └──(collision)──▶ Crashed
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum VehicleStatus {
    /// Not yet on the grid.
    #[default]
    Waiting,
    Active,
    Arrived,
    Crashed,
}

impl VehicleStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, VehicleStatus::Arrived | VehicleStatus::Crashed)
    }
}

/// The world's view of one vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct VehicleState {
    pub status:   VehicleStatus,
    /// Approach cyclic index of the assigned route.
    pub approach: usize,
    pub intent:   Option<RouteIntent>,
    /// Index into the route's cells.
    pub cursor:   usize,
    /// Current cell; `Some` only while `Active`.
    pub position: Option<GridPosition>,
}

impl VehicleState {
    /// A freshly-spawned vehicle at its route's entry cell.
    #[inline]
    pub fn spawned(approach: usize, intent: RouteIntent, entry: GridPosition) -> Self {
        Self {
            status:   VehicleStatus::Active,
            approach,
            intent:   Some(intent),
            cursor:   0,
            position: Some(entry),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == VehicleStatus::Active
    }
}
