//! Birth content: a proposed account plus the two parent approvals.
//!
//! The candidate publishes its identity, then the two parents sign in turn.
//! The first parent signs the identity; the second signs the identity
//! followed by the first signature, fixing the co-sign order.

use crate::error::BirthError;
use crate::user::{ParentSig, User, UserIdentity};
use kinship_core::Hash;
use kinship_crypto::{PrivateKeyMaterial, PublicKeyMaterial};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthContent {
    pub identity: UserIdentity,
    /// Parent approvals in signing order
    pub parents: Vec<ParentSig>,
}

impl BirthContent {
    /// Unsigned birth content for a new identity.
    pub fn new(
        name: impl Into<String>,
        birth_extra: impl Into<String>,
        auth: PublicKeyMaterial,
    ) -> Self {
        Self {
            identity: UserIdentity::new(name, birth_extra, auth),
            parents: Vec::new(),
        }
    }

    /// Add the next parent signature.
    ///
    /// The first call signs the identity, the second signs the identity
    /// together with the first signature.
    pub fn sign_by_parent(
        &mut self,
        parent_id: Hash,
        key: &PrivateKeyMaterial,
    ) -> Result<(), BirthError> {
        let payload = match self.parents.as_slice() {
            [] => self.identity.first_payload(),
            [first] => self.identity.second_payload(&first.signature),
            signed => return Err(BirthError::ParentCount(signed.len() + 1)),
        };
        let signature = kinship_crypto::sign(&payload, key)?;
        self.parents.push(ParentSig {
            parent_id,
            signature: signature.bytes,
        });
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.parents.len() == 2
    }

    /// The account this content creates when carried by `birth_msg`.
    pub fn into_user(self, birth_msg: Hash) -> Result<User, BirthError> {
        let count = self.parents.len();
        let parents: [ParentSig; 2] = self
            .parents
            .try_into()
            .map_err(|_| BirthError::ParentCount(count))?;
        Ok(User {
            identity: self.identity,
            parents: Some(parents),
            birth_msg: Some(birth_msg),
        })
    }
}
