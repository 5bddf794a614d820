use thiserror::Error;

use tj_core::{GridPosition, RouteIntent, TjError};
use tj_topology::TopologyError;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("expected {expected} actions, got {got}")]
    ActionCount { expected: usize, got: usize },

    #[error("route from {entry} with intent {intent} never leaves the grid")]
    UnboundedRoute { entry: GridPosition, intent: RouteIntent },

    #[error("approach {0} has no lane leading to the grid border")]
    NoEntry(GridPosition),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Core(#[from] TjError),
}

pub type WorldResult<T> = Result<T, WorldError>;
