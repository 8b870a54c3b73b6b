//! Error types for account admission.
//!
//! [`BirthError`] names the birth rule a candidate account violated. A
//! rejected candidate is never inserted; the reason is surfaced to the
//! caller, which may broadcast it as evidence against the parents.

use kinship_core::{ConfigError, DagError, Hash};
use kinship_crypto::SchemeError;
use thiserror::Error;

/// Reasons a proposed account fails the birth rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BirthError {
    /// Only genesis accounts may be parentless
    #[error("account has no parents")]
    MissingParents,

    /// Birth content must carry exactly two parent signatures
    #[error("birth carries {0} parent signatures, expected 2")]
    ParentCount(usize),

    #[error("parents have the same parity")]
    ParityMismatch,

    #[error("both parent slots name account {0}")]
    SameParent(Hash),

    #[error("parent {0} is not a valid account")]
    UnknownParent(Hash),

    #[error("parents {0} and {1} are ancestor and descendant")]
    AncestorConflict(Hash, Hash),

    #[error("signature of parent {0} does not verify")]
    SignatureInvalid(Hash),

    /// The second signature does not cover the first one
    #[error("signature of parent {0} does not cover the first parent's signature")]
    SignatureOrder(Hash),

    #[error("parent {0} is not a member of the time proof")]
    ParentNotInTimeProof(Hash),

    #[error("parent {parent} is {age} steps old, needs {required}")]
    ParentTooYoung {
        parent: Hash,
        age: u64,
        required: u64,
    },

    #[error("parent {parent} expired: born at {born}, lifecycle {lifecycle}, now {now}")]
    ParentExpired {
        parent: Hash,
        born: u64,
        lifecycle: u64,
        now: u64,
    },

    #[error("parent {parent} co-signed a birth at {last}, too close to {now}")]
    CosignRateLimited { parent: Hash, last: u64, now: u64 },

    #[error("signature scheme error: {0}")]
    Scheme(#[from] SchemeError),
}

/// Errors returned by the account graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("account already exists: {0}")]
    AlreadyExists(Hash),

    #[error("invalid birth: {0}")]
    InvalidBirth(#[from] BirthError),

    #[error("account graph error: {0}")]
    Dag(#[from] DagError),

    #[error("invalid natural law configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors building the genesis pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenesisError {
    #[error("genesis accounts must have opposite parity")]
    SameParity,

    #[error("genesis account {0} has parents")]
    HasParents(Hash),

    #[error("no key of the requested parity after {attempts} attempts")]
    KeyGeneration { attempts: usize },

    #[error("signature scheme error: {0}")]
    Scheme(#[from] SchemeError),
}

pub type Result<T> = std::result::Result<T, GroupError>;
