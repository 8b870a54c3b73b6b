//! Signature engine errors.
//!
//! Every variant is a hard local failure: nothing here is retried.

use crate::Scheme;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeError {
    #[error("unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    #[error("key source mismatch: expected {expected}, found {found}")]
    SourceMismatch { expected: String, found: String },

    #[error("scheme mismatch: key is {expected}, signature is {found}")]
    SchemeMismatch { expected: Scheme, found: Scheme },

    #[error("malformed signature: length {len} is not a non-zero multiple of {width}")]
    MalformedSignature { len: usize, width: usize },

    #[error("threshold signature carries {signatures} signatures for {keys} keys")]
    KeyCountMismatch { keys: usize, signatures: usize },

    #[error("missing scheme parameter: {0}")]
    ParamsMissing(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

pub type Result<T> = std::result::Result<T, SchemeError>;
