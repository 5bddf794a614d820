use thiserror::Error;

use tj_core::GridPosition;

/// A malformed observation.
///
/// Never fatal: drivers log it and fall back to [`Action::Advance`][tj_core::Action].
#[derive(Debug, Error, PartialEq)]
pub enum ObserveError {
    #[error("observation window must be a positive odd size, got {0}")]
    BadWindowSize(usize),

    #[error("observation shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("own position {0} not present in the observation window")]
    MissingSelf(GridPosition),
}

pub type ObserveResult<T> = Result<T, ObserveError>;
