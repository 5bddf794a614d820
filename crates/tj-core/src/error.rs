//! Framework error type.
//!
//! Sub-crates define their own error enums and either wrap `TjError` as one
//! variant or convert into it via `From`.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `tj-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum TjError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("action code {0} is not 0 (advance) or 1 (yield)")]
    InvalidAction(u8),
}

/// Shorthand result type for all `tj-*` crates.
pub type TjResult<T> = Result<T, TjError>;
