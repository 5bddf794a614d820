use thiserror::Error;

use tj_core::{AgentId, TjError};
use tj_topology::TopologyError;
use tj_world::WorldError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] TjError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("driver at index {index} reports id {id}")]
    DriverOrder { index: usize, id: AgentId },

    #[error("junction topology rejected: {0}")]
    Topology(#[from] TopologyError),

    #[error("world error: {0}")]
    World(#[from] WorldError),

    #[error("thread pool: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
