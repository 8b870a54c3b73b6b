//! Genesis accounts.
//!
//! A universe is bootstrapped from exactly two parentless accounts of
//! opposite parity. This is the only point where accounts are accepted
//! without birth validation.

use crate::error::GenesisError;
use crate::user::{Parity, User, UserIdentity};
use kinship_core::Hash;
use kinship_crypto::{generate_keys, PrivateKeyMaterial, Scheme};

/// Key generation attempts before giving up on a parity.
pub const MAX_KEYGEN_ATTEMPTS: usize = 128;

/// The two genesis accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisPair {
    users: [User; 2],
}

impl GenesisPair {
    pub fn new(first: User, second: User) -> Result<Self, GenesisError> {
        for user in [&first, &second] {
            if !user.is_genesis() || user.birth_msg.is_some() {
                return Err(GenesisError::HasParents(user.id()));
            }
        }
        if first.parity() == second.parity() {
            return Err(GenesisError::SameParity);
        }
        Ok(Self {
            users: [first, second],
        })
    }

    pub fn users(&self) -> &[User; 2] {
        &self.users
    }

    pub fn ids(&self) -> [Hash; 2] {
        [self.users[0].id(), self.users[1].id()]
    }

    /// The genesis account of the given parity.
    pub fn by_parity(&self, parity: Parity) -> &User {
        if self.users[0].parity() == parity {
            &self.users[0]
        } else {
            &self.users[1]
        }
    }

    pub fn into_users(self) -> [User; 2] {
        self.users
    }
}

/// Generate a parentless account whose key material has `parity`.
///
/// Parity is a property of the public key, so keys are drawn until one
/// matches.
pub fn create_root_user(
    name: &str,
    scheme: Scheme,
    parity: Parity,
) -> Result<(User, PrivateKeyMaterial), GenesisError> {
    for _ in 0..MAX_KEYGEN_ATTEMPTS {
        let (private, public) = generate_keys(scheme)?;
        if Parity::of(&public) == parity {
            tracing::debug!(name, %parity, "generated root account");
            return Ok((User::genesis(UserIdentity::new(name, "", public)), private));
        }
    }
    Err(GenesisError::KeyGeneration {
        attempts: MAX_KEYGEN_ATTEMPTS,
    })
}
