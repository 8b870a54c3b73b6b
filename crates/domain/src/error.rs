//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use kinship_crypto::SchemeError;
use kinship_identity::BirthError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Signature scheme error: {0}")]
    Scheme(#[from] SchemeError),

    #[error("Invalid birth content: {0}")]
    InvalidBirth(#[from] BirthError),
}

pub type Result<T> = std::result::Result<T, DomainError>;
