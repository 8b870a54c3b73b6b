//! Signature engine for the Kinship network.
//!
//! Every message and every parent approval of a birth is signed with ECDSA
//! over NIST P-256. Accounts may hold a single key pair or a k-of-k
//! threshold set of independent key pairs:
//!
//! - **Single**: one 64-byte `r || s` signature
//! - **Threshold(n)**: `n` concatenated 64-byte signatures, one per key, in
//!   key order. Verification is all-or-nothing.
//!
//! The engine is purely functional over byte buffers. Callers hash their
//! payload with [`payload_hash`] and sign or verify the digest.
//!
//! # Security Principles
//!
//! - Never roll custom cryptographic primitives
//! - Key generation uses the operating system CSPRNG
//! - Secret key buffers are zeroized after use

pub mod error;
pub mod keys;
pub mod signing;

pub use error::{Result, SchemeError};
pub use keys::{EcPoint, PrivateKeyMaterial, PublicKeyMaterial, Scheme, SOURCE_NAME};
pub use signing::{
    generate_keys, payload_hash, sign, verify, PayloadHash, Signature, SIGNATURE_LEN,
};
