//! Universe groups: per-time-proof snapshots of valid accounts.

use kinship_core::Hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Accounts considered valid when a time proof was rooted.
///
/// Stored in a DAG keyed by the time proof's root sender; a group's parents
/// are the groups of the time proofs that already existed at that point.
/// Snapshots are never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniverseGroup {
    members: BTreeSet<Hash>,
}

impl UniverseGroup {
    pub fn new(members: impl IntoIterator<Item = Hash>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    pub fn contains(&self, account: &Hash) -> bool {
        self.members.contains(account)
    }

    pub fn members(&self) -> impl Iterator<Item = &Hash> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
