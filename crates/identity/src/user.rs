//! Accounts and the material parents sign at birth.

use kinship_core::Hash;
use kinship_crypto::{payload_hash, PayloadHash, PublicKeyMaterial};
use serde::{Deserialize, Serialize};
use std::fmt;

const USER_ID_TAG: &[u8] = b"kinship/user/v1";

/// Binary classifier of accounts derived from key material.
///
/// The two parents of every birth must have opposite parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Parity of the low-order bit of the first public key's X coordinate.
    pub fn of(auth: &PublicKeyMaterial) -> Self {
        if auth.low_bit() == 1 {
            Parity::Odd
        } else {
            Parity::Even
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}

/// Public identity of an account: what both parents sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub birth_extra: String,
    pub auth: PublicKeyMaterial,
}

impl UserIdentity {
    pub fn new(
        name: impl Into<String>,
        birth_extra: impl Into<String>,
        auth: PublicKeyMaterial,
    ) -> Self {
        Self {
            name: name.into(),
            birth_extra: birth_extra.into(),
            auth,
        }
    }

    /// Canonical serialization covered by the parent signatures.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Digest signed by the first parent.
    pub fn first_payload(&self) -> PayloadHash {
        payload_hash(&self.canonical_bytes())
    }

    /// Digest signed by the second parent: the identity followed by the
    /// first parent's signature.
    pub fn second_payload(&self, first_signature: &[u8]) -> PayloadHash {
        let mut bytes = self.canonical_bytes();
        bytes.extend_from_slice(first_signature);
        payload_hash(&bytes)
    }
}

/// One parent's approval of a birth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSig {
    pub parent_id: Hash,
    #[serde(with = "kinship_core::serde_hex")]
    pub signature: Vec<u8>,
}

/// An account.
///
/// Immutable once created. Genesis accounts have neither parents nor a
/// birth message; every other account was admitted by a birth message and
/// carries both parent signatures in signing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub identity: UserIdentity,
    pub parents: Option<[ParentSig; 2]>,
    pub birth_msg: Option<Hash>,
}

impl User {
    /// A parentless genesis account.
    pub fn genesis(identity: UserIdentity) -> Self {
        Self {
            identity,
            parents: None,
            birth_msg: None,
        }
    }

    /// Content-derived account id.
    ///
    /// The birth message is part of the hashed content, so the same public
    /// identity born twice yields two distinct accounts.
    pub fn id(&self) -> Hash {
        Hash::digest(USER_ID_TAG, &serde_json::to_vec(self).unwrap_or_default())
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn auth(&self) -> &PublicKeyMaterial {
        &self.identity.auth
    }

    pub fn parity(&self) -> Parity {
        Parity::of(&self.identity.auth)
    }

    pub fn is_genesis(&self) -> bool {
        self.parents.is_none()
    }

    pub fn parent_ids(&self) -> Option<[Hash; 2]> {
        self.parents
            .as_ref()
            .map(|[first, second]| [first.parent_id, second.parent_id])
    }
}
