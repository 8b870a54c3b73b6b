//! Key material for the single and threshold schemes.
//!
//! Public keys are carried as affine coordinate pairs. On the wire they
//! are tagged with a source name and a scheme identifier so that single and
//! threshold material deserializes unambiguously:
//!
//! ```json
//! {"source":"KINSHIP","sigType":"MS","pubKey":["<x0>","<y0>","<x1>","<y1>"]}
//! ```
//!
//! Coordinates are 64-character big-endian hex strings, so integer values
//! survive a text round-trip exactly.

use crate::{Result, SchemeError};
use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::{EncodedPoint, FieldBytes};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Source tag written into serialized public keys.
pub const SOURCE_NAME: &str = "KINSHIP";

/// Scheme identifier for a single key pair.
const SIG_TYPE_SINGLE: &str = "S2PK";

/// Scheme identifier for k-of-k threshold key sets.
const SIG_TYPE_THRESHOLD: &str = "MS";

const COORD_LEN: usize = 32;

/// Signing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    Single,
    /// `n` independent key pairs, all of which must sign
    Threshold(usize),
}

impl Scheme {
    /// Number of key pairs the scheme uses.
    pub fn key_count(&self) -> usize {
        match self {
            Scheme::Single => 1,
            Scheme::Threshold(n) => *n,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Single => write!(f, "Single"),
            Scheme::Threshold(n) => write!(f, "Threshold({})", n),
        }
    }
}

/// A validated P-256 public point in affine coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EcPoint {
    x: [u8; COORD_LEN],
    y: [u8; COORD_LEN],
}

impl EcPoint {
    /// Build a point from big-endian coordinates, rejecting points off the curve.
    pub fn from_coordinates(x: [u8; COORD_LEN], y: [u8; COORD_LEN]) -> Result<Self> {
        let point = Self { x, y };
        point.verifying_key()?;
        Ok(point)
    }

    pub(crate) fn from_verifying_key(key: &VerifyingKey) -> Result<Self> {
        let encoded = key.to_encoded_point(false);
        let (Some(x), Some(y)) = (encoded.x(), encoded.y()) else {
            return Err(SchemeError::InvalidKey("identity point".to_string()));
        };
        let mut point = Self {
            x: [0u8; COORD_LEN],
            y: [0u8; COORD_LEN],
        };
        point.x.copy_from_slice(x.as_slice());
        point.y.copy_from_slice(y.as_slice());
        Ok(point)
    }

    pub(crate) fn verifying_key(&self) -> Result<VerifyingKey> {
        let encoded = EncodedPoint::from_affine_coordinates(
            &FieldBytes::from(self.x),
            &FieldBytes::from(self.y),
            false,
        );
        VerifyingKey::from_encoded_point(&encoded)
            .map_err(|e| SchemeError::InvalidKey(e.to_string()))
    }

    pub fn x(&self) -> &[u8; COORD_LEN] {
        &self.x
    }

    pub fn y(&self) -> &[u8; COORD_LEN] {
        &self.y
    }

    fn parse_coordinate(text: &str) -> Result<[u8; COORD_LEN]> {
        let mut out = [0u8; COORD_LEN];
        hex::decode_to_slice(text, &mut out)
            .map_err(|e| SchemeError::InvalidKey(format!("bad coordinate {:?}: {}", text, e)))?;
        Ok(out)
    }
}

impl fmt::Debug for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcPoint({}..)", hex::encode(&self.x[..6]))
    }
}

/// Public half of an account's key material.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyWire", into = "PublicKeyWire")]
pub enum PublicKeyMaterial {
    Single(EcPoint),
    Threshold(Vec<EcPoint>),
}

impl PublicKeyMaterial {
    pub fn scheme(&self) -> Scheme {
        match self {
            PublicKeyMaterial::Single(_) => Scheme::Single,
            PublicKeyMaterial::Threshold(points) => Scheme::Threshold(points.len()),
        }
    }

    /// Points in signing order.
    pub fn points(&self) -> &[EcPoint] {
        match self {
            PublicKeyMaterial::Single(point) => std::slice::from_ref(point),
            PublicKeyMaterial::Threshold(points) => points,
        }
    }

    /// Low-order bit of the X coordinate of the first key.
    pub fn low_bit(&self) -> u8 {
        self.points()
            .first()
            .map(|p| p.x[COORD_LEN - 1] & 1)
            .unwrap_or(0)
    }
}

/// Private half of an account's key material.
pub enum PrivateKeyMaterial {
    Single(SigningKey),
    Threshold(Vec<SigningKey>),
}

impl PrivateKeyMaterial {
    pub fn scheme(&self) -> Scheme {
        match self {
            PrivateKeyMaterial::Single(_) => Scheme::Single,
            PrivateKeyMaterial::Threshold(keys) => Scheme::Threshold(keys.len()),
        }
    }

    pub(crate) fn keys(&self) -> &[SigningKey] {
        match self {
            PrivateKeyMaterial::Single(key) => std::slice::from_ref(key),
            PrivateKeyMaterial::Threshold(keys) => keys,
        }
    }

    /// Rebuild key material from raw 32-byte scalars.
    ///
    /// # Security
    /// The input buffers are zeroized before returning.
    pub fn from_secret_bytes(scheme: Scheme, mut secrets: Vec<[u8; 32]>) -> Result<Self> {
        let result = Self::keys_from_secrets(scheme, &secrets);
        secrets.zeroize();
        result
    }

    fn keys_from_secrets(scheme: Scheme, secrets: &[[u8; 32]]) -> Result<Self> {
        if secrets.len() != scheme.key_count() {
            return Err(SchemeError::KeyCountMismatch {
                keys: scheme.key_count(),
                signatures: secrets.len(),
            });
        }
        let mut keys = secrets
            .iter()
            .map(|bytes| {
                SigningKey::from_bytes(&FieldBytes::from(*bytes))
                    .map_err(|e| SchemeError::InvalidKey(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        match scheme {
            Scheme::Single => keys
                .pop()
                .map(PrivateKeyMaterial::Single)
                .ok_or_else(|| SchemeError::ParamsMissing("secret key".to_string())),
            Scheme::Threshold(0) => Err(SchemeError::ParamsMissing(
                "threshold key count".to_string(),
            )),
            Scheme::Threshold(_) => Ok(PrivateKeyMaterial::Threshold(keys)),
        }
    }

    /// Export the raw scalars.
    ///
    /// # Security
    /// The returned buffer zeroizes itself on drop.
    pub fn to_secret_bytes(&self) -> Zeroizing<Vec<[u8; 32]>> {
        Zeroizing::new(self.keys().iter().map(|k| k.to_bytes().into()).collect())
    }

    /// Derive the matching public material.
    pub fn public_key(&self) -> Result<PublicKeyMaterial> {
        let points = self
            .keys()
            .iter()
            .map(|k| EcPoint::from_verifying_key(k.verifying_key()))
            .collect::<Result<Vec<_>>>()?;
        match self {
            PrivateKeyMaterial::Single(_) => points
                .into_iter()
                .next()
                .map(PublicKeyMaterial::Single)
                .ok_or_else(|| SchemeError::ParamsMissing("public key".to_string())),
            PrivateKeyMaterial::Threshold(_) => Ok(PublicKeyMaterial::Threshold(points)),
        }
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyMaterial")
            .field("scheme", &self.scheme())
            .finish_non_exhaustive()
    }
}

/// Serialized form of [`PublicKeyMaterial`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyWire {
    source: String,
    sig_type: String,
    pub_key: Vec<String>,
}

impl From<PublicKeyMaterial> for PublicKeyWire {
    fn from(material: PublicKeyMaterial) -> Self {
        let sig_type = match material {
            PublicKeyMaterial::Single(_) => SIG_TYPE_SINGLE,
            PublicKeyMaterial::Threshold(_) => SIG_TYPE_THRESHOLD,
        };
        let pub_key = material
            .points()
            .iter()
            .flat_map(|p| [hex::encode(p.x), hex::encode(p.y)])
            .collect();
        Self {
            source: SOURCE_NAME.to_string(),
            sig_type: sig_type.to_string(),
            pub_key,
        }
    }
}

impl TryFrom<PublicKeyWire> for PublicKeyMaterial {
    type Error = SchemeError;

    fn try_from(wire: PublicKeyWire) -> Result<Self> {
        if wire.source != SOURCE_NAME {
            return Err(SchemeError::SourceMismatch {
                expected: SOURCE_NAME.to_string(),
                found: wire.source,
            });
        }
        if wire.pub_key.len() % 2 != 0 {
            return Err(SchemeError::InvalidKey(format!(
                "odd coordinate count {}",
                wire.pub_key.len()
            )));
        }
        let points = wire
            .pub_key
            .chunks(2)
            .map(|pair| {
                EcPoint::from_coordinates(
                    EcPoint::parse_coordinate(&pair[0])?,
                    EcPoint::parse_coordinate(&pair[1])?,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        match wire.sig_type.as_str() {
            SIG_TYPE_SINGLE => match points.as_slice() {
                [point] => Ok(PublicKeyMaterial::Single(*point)),
                _ => Err(SchemeError::KeyCountMismatch {
                    keys: 1,
                    signatures: points.len(),
                }),
            },
            SIG_TYPE_THRESHOLD if points.is_empty() => {
                Err(SchemeError::ParamsMissing("threshold keys".to_string()))
            }
            SIG_TYPE_THRESHOLD => Ok(PublicKeyMaterial::Threshold(points)),
            other => Err(SchemeError::UnsupportedScheme(other.to_string())),
        }
    }
}
