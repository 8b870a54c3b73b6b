//! Core error types

use crate::Hash;
use thiserror::Error;

/// Structural errors raised by the DAG store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError {
    /// A vertex with this id is already present
    #[error("vertex already exists: {0}")]
    DuplicateId(Hash),

    /// A declared parent is not present in the graph
    #[error("unknown parent vertex: {0}")]
    UnknownParent(Hash),
}

pub type Result<T> = std::result::Result<T, DagError>;

/// Natural-law parameter sets under which the birth rules degenerate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The quarter window `min_lifetime / 4` would be zero
    #[error("min_lifetime must be at least 4, got {0}")]
    LifetimeTooShort(u64),

    #[error("genesis_lifetime ({genesis}) is below min_lifetime ({min_lifetime})")]
    GenesisBelowMinimum { genesis: u64, min_lifetime: u64 },
}
