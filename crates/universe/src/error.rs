//! Universe errors and their taxonomy.

use kinship_core::{ConfigError, DagError, Hash};
use kinship_crypto::SchemeError;
use kinship_domain::DomainError;
use kinship_identity::{BirthError, GroupError};
use thiserror::Error;

/// Error classes callers use to decide on penalization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Duplicate id, unknown reference, malformed payload
    Structural,
    /// Sender not a valid account, bad message signature
    Authorization,
    /// Birth rejected; the carrying message is kept as evidence
    BirthValidation,
    /// Unsupported or malformed signature material
    Scheme,
    /// Natural-law parameters rejected at construction
    Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniverseError {
    #[error("message already exists: {0}")]
    DuplicateMessage(Hash),

    #[error("message id {0} does not match its content")]
    MalformedMessage(Hash),

    #[error("sender {0} is not a valid account")]
    InvalidSender(Hash),

    #[error("signature of message {0} does not verify")]
    InvalidSignature(Hash),

    #[error("message {message} references unknown message {reference}")]
    UnknownReference { message: Hash, reference: Hash },

    #[error("message {message} names the wrong sender for reference {reference}")]
    ReferenceMismatch { message: Hash, reference: Hash },

    #[error("message not found: {0}")]
    MessageNotFound(Hash),

    #[error("no messages from sender {0}")]
    NoMessagesFromSender(Hash),

    #[error("sender {0} already roots a time proof")]
    TimeProofAlreadyExists(Hash),

    #[error("birth in message {message_id} rejected: {reason}")]
    BirthRejected {
        message_id: Hash,
        reason: BirthError,
    },

    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("account graph error: {0}")]
    Group(#[from] GroupError),

    #[error("graph error: {0}")]
    Dag(#[from] DagError),

    #[error("invalid natural law configuration: {0}")]
    Config(#[from] ConfigError),
}

impl UniverseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UniverseError::InvalidSender(_) | UniverseError::InvalidSignature(_) => {
                ErrorKind::Authorization
            }
            UniverseError::BirthRejected { reason, .. } => birth_kind(reason),
            UniverseError::Group(GroupError::InvalidBirth(reason)) => birth_kind(reason),
            UniverseError::Domain(DomainError::Scheme(_)) => ErrorKind::Scheme,
            UniverseError::Config(_) | UniverseError::Group(GroupError::Config(_)) => {
                ErrorKind::Configuration
            }
            _ => ErrorKind::Structural,
        }
    }
}

fn birth_kind(reason: &BirthError) -> ErrorKind {
    match reason {
        BirthError::Scheme(_) => ErrorKind::Scheme,
        _ => ErrorKind::BirthValidation,
    }
}

impl From<SchemeError> for UniverseError {
    fn from(err: SchemeError) -> Self {
        UniverseError::Domain(DomainError::Scheme(err))
    }
}

pub type Result<T> = std::result::Result<T, UniverseError>;
