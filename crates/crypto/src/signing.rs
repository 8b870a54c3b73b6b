//! Key generation, signing and verification.
//!
//! Signatures are produced over a 32-byte SHA-256 payload digest using the
//! ECDSA prehash API, so one digest can be checked by every key of a
//! threshold set without re-hashing.

use crate::keys::{EcPoint, PrivateKeyMaterial, PublicKeyMaterial, Scheme};
use crate::{Result, SchemeError};
use p256::ecdsa::{Signature as EcdsaSignature, SigningKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use signature::hazmat::{PrehashSigner, PrehashVerifier};

/// Fixed width of one `r || s` component signature.
pub const SIGNATURE_LEN: usize = 64;

/// SHA-256 digest handed to the signing primitives.
pub type PayloadHash = [u8; 32];

/// Hash an arbitrary payload for signing.
pub fn payload_hash(payload: &[u8]) -> PayloadHash {
    Sha256::digest(payload).into()
}

/// A signature together with the public material it claims to verify under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub public_key: PublicKeyMaterial,
    #[serde(with = "kinship_core::serde_hex")]
    pub bytes: Vec<u8>,
}

/// Generate fresh key material for `scheme` from the OS CSPRNG.
pub fn generate_keys(scheme: Scheme) -> Result<(PrivateKeyMaterial, PublicKeyMaterial)> {
    let private = match scheme {
        Scheme::Single => PrivateKeyMaterial::Single(SigningKey::random(&mut OsRng)),
        Scheme::Threshold(0) => {
            return Err(SchemeError::ParamsMissing(
                "threshold key count".to_string(),
            ))
        }
        Scheme::Threshold(n) => PrivateKeyMaterial::Threshold(
            (0..n).map(|_| SigningKey::random(&mut OsRng)).collect(),
        ),
    };
    let public = private.public_key()?;
    tracing::debug!(scheme = %scheme, "generated key material");
    Ok((private, public))
}

/// Sign a payload digest with every key of `private`, preserving key order.
pub fn sign(hash: &PayloadHash, private: &PrivateKeyMaterial) -> Result<Signature> {
    let mut bytes = Vec::with_capacity(private.keys().len() * SIGNATURE_LEN);
    for key in private.keys() {
        let signature: EcdsaSignature = key
            .sign_prehash(hash)
            .map_err(|e| SchemeError::Signing(e.to_string()))?;
        bytes.extend_from_slice(&signature.to_bytes());
    }
    Ok(Signature {
        public_key: private.public_key()?,
        bytes,
    })
}

/// Verify a [`Signature`] against a payload digest.
pub fn verify(hash: &PayloadHash, signature: &Signature) -> Result<bool> {
    signature.public_key.verify(hash, &signature.bytes)
}

impl PublicKeyMaterial {
    /// Verify raw signature bytes against this key material.
    ///
    /// Returns `Ok(false)` when a well-formed signature does not verify.
    /// For threshold material a single bad component fails the whole check.
    pub fn verify(&self, hash: &PayloadHash, bytes: &[u8]) -> Result<bool> {
        if bytes.is_empty() || bytes.len() % SIGNATURE_LEN != 0 {
            return Err(SchemeError::MalformedSignature {
                len: bytes.len(),
                width: SIGNATURE_LEN,
            });
        }
        let count = bytes.len() / SIGNATURE_LEN;

        match self {
            PublicKeyMaterial::Single(_) if count != 1 => Err(SchemeError::SchemeMismatch {
                expected: Scheme::Single,
                found: Scheme::Threshold(count),
            }),
            PublicKeyMaterial::Threshold(points) if points.len() != count => {
                Err(SchemeError::KeyCountMismatch {
                    keys: points.len(),
                    signatures: count,
                })
            }
            _ => {
                for (point, chunk) in self.points().iter().zip(bytes.chunks(SIGNATURE_LEN)) {
                    if !verify_component(point, hash, chunk)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

fn verify_component(point: &EcPoint, hash: &PayloadHash, chunk: &[u8]) -> Result<bool> {
    let key = point.verifying_key()?;
    // r or s out of range is a forged signature, not a format error
    let Ok(signature) = EcdsaSignature::from_slice(chunk) else {
        return Ok(false);
    };
    Ok(key.verify_prehash(hash, &signature).is_ok())
}
