//! Core functionality for the Kinship causal identity network.
//!
//! This crate provides the fundamental types used across the Kinship
//! workspace: content hashes, the generic append-only DAG store, and the
//! configuration and logging plumbing shared by every other crate.

pub mod config;
pub mod dag;
pub mod error;
pub mod hash;
pub mod logging;
pub mod serde_hex;

pub use config::{Config, LoggingConfig, NaturalLawConfig, GENESIS_LIFETIME_FACTOR};
pub use dag::{Dag, Vertex};
pub use error::{ConfigError, DagError, Result};
pub use hash::{Hash, HASH_LEN};
