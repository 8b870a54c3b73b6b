//! Account graph.
//!
//! Accounts are vertices of an append-only DAG whose edges point from a
//! child to its two parents. A candidate account is admitted only if its
//! birth satisfies the structural birth rules checked here:
//!
//! 1. the two parents have opposite parity
//! 2. both parent signatures verify against the parents' key material
//! 3. both parents are existing accounts
//! 4. the parents are not ancestor and descendant of each other
//! 5. the second signature covers the first
//!
//! The lifecycle-window rules depend on a time proof. Callers that evaluate
//! them split admission in two: [`Group::verify_birth`] runs the structural
//! rules once and yields a [`CheckedBirth`], the caller applies
//! [`NaturalLaw`](crate::NaturalLaw), then [`Group::insert`] admits the
//! account.

use crate::error::{BirthError, GroupError, Result};
use crate::genesis::GenesisPair;
use crate::user::{ParentSig, User};
use kinship_core::{Dag, Hash, NaturalLawConfig, Vertex};

/// An admitted account with its derived lifecycle length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user: User,
    /// Time-proof steps the account stays alive after birth
    pub lifecycle: u64,
}

/// A candidate account that passed the structural birth rules.
///
/// Accounts are never removed, so a check against an earlier state of the
/// same group stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedBirth {
    user: User,
    parents: [Hash; 2],
}

impl CheckedBirth {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn parents(&self) -> &[Hash; 2] {
        &self.parents
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    accounts: Dag<Account>,
    genesis: [Hash; 2],
    config: NaturalLawConfig,
}

impl Group {
    /// Create the graph holding the two genesis accounts.
    pub fn new(genesis: GenesisPair, config: NaturalLawConfig) -> Result<Self> {
        config.validate()?;
        let genesis_ids = genesis.ids();
        let mut accounts = Dag::new();
        for user in genesis.into_users() {
            let id = user.id();
            accounts.add_vertex(Vertex::new(
                id,
                Account {
                    user,
                    lifecycle: config.genesis_lifecycle(),
                },
                [],
            ))?;
        }
        Ok(Self {
            accounts,
            genesis: genesis_ids,
            config,
        })
    }

    pub fn lookup(&self, id: &Hash) -> Option<&User> {
        self.accounts.value(id).map(|account| &account.user)
    }

    pub fn contains(&self, id: &Hash) -> bool {
        self.accounts.contains(id)
    }

    pub fn genesis_ids(&self) -> [Hash; 2] {
        self.genesis
    }

    pub fn config(&self) -> &NaturalLawConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Account ids in admission order.
    pub fn ids(&self) -> &[Hash] {
        self.accounts.ids()
    }

    /// Lifecycle length of an account.
    pub fn lifecycle(&self, id: &Hash) -> Option<u64> {
        self.accounts.value(id).map(|account| account.lifecycle)
    }

    /// Accounts co-signed by `id`, in admission order.
    pub fn children(&self, id: &Hash) -> &[Hash] {
        self.accounts.children(id)
    }

    pub fn is_ancestor(&self, ancestor: &Hash, descendant: &Hash) -> bool {
        self.accounts.is_ancestor(ancestor, descendant)
    }

    /// Check the structural birth rules without inserting.
    pub fn check_birth(&self, user: &User) -> std::result::Result<(), BirthError> {
        let [first, second] = user.parents.as_ref().ok_or(BirthError::MissingParents)?;

        let first_parent = self
            .lookup(&first.parent_id)
            .ok_or(BirthError::UnknownParent(first.parent_id))?;
        let second_parent = self
            .lookup(&second.parent_id)
            .ok_or(BirthError::UnknownParent(second.parent_id))?;

        if first.parent_id == second.parent_id {
            return Err(BirthError::SameParent(first.parent_id));
        }
        if first_parent.parity() == second_parent.parity() {
            return Err(BirthError::ParityMismatch);
        }
        if self.accounts.related(&first.parent_id, &second.parent_id) {
            return Err(BirthError::AncestorConflict(
                first.parent_id,
                second.parent_id,
            ));
        }

        self.check_signatures(user, first_parent, first, second_parent, second)
    }

    fn check_signatures(
        &self,
        user: &User,
        first_parent: &User,
        first: &ParentSig,
        second_parent: &User,
        second: &ParentSig,
    ) -> std::result::Result<(), BirthError> {
        let identity = &user.identity;
        if !first_parent
            .auth()
            .verify(&identity.first_payload(), &first.signature)?
        {
            return Err(BirthError::SignatureInvalid(first.parent_id));
        }

        let ordered = identity.second_payload(&first.signature);
        if second_parent.auth().verify(&ordered, &second.signature)? {
            return Ok(());
        }
        // a valid signature over the bare identity means the signer skipped
        // the first parent's approval
        if second_parent
            .auth()
            .verify(&identity.first_payload(), &second.signature)?
        {
            return Err(BirthError::SignatureOrder(second.parent_id));
        }
        Err(BirthError::SignatureInvalid(second.parent_id))
    }

    /// Check the structural birth rules, keeping the account for [`Group::insert`].
    pub fn verify_birth(&self, user: User) -> std::result::Result<CheckedBirth, BirthError> {
        self.check_birth(&user)?;
        let parents = user.parent_ids().ok_or(BirthError::MissingParents)?;
        Ok(CheckedBirth { user, parents })
    }

    /// Admit an account after checking the structural birth rules.
    ///
    /// Returns the new account id.
    pub fn add(&mut self, user: User) -> Result<Hash> {
        let id = user.id();
        if self.accounts.contains(&id) {
            return Err(GroupError::AlreadyExists(id));
        }
        let birth = self.verify_birth(user)?;
        self.insert(birth)
    }

    /// Admit an account whose birth was already checked.
    pub fn insert(&mut self, birth: CheckedBirth) -> Result<Hash> {
        let CheckedBirth { user, parents } = birth;
        let id = user.id();
        if self.accounts.contains(&id) {
            return Err(GroupError::AlreadyExists(id));
        }

        let lifecycle = self.child_lifecycle(&parents);
        self.accounts
            .add_vertex(Vertex::new(id, Account { user, lifecycle }, parents))?;

        tracing::info!(
            account = %id.short(),
            first_parent = %parents[0].short(),
            second_parent = %parents[1].short(),
            lifecycle,
            "account born"
        );
        Ok(id)
    }

    /// `max(min_lifetime, longer parent lifecycle / 2)`.
    fn child_lifecycle(&self, parents: &[Hash; 2]) -> u64 {
        let longest = parents
            .iter()
            .filter_map(|p| self.lifecycle(p))
            .max()
            .unwrap_or(0);
        self.config.min_lifetime.max(longest / 2)
    }
}
