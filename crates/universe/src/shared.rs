//! Thread-safe handle to a [`Universe`].
//!
//! Writers take the exclusive lock for the whole operation; readers share
//! the lock with each other. A poisoned lock is recovered.

use crate::error::Result;
use crate::universe::Universe;
use kinship_core::Hash;
use kinship_domain::Message;
use kinship_identity::User;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
pub struct SharedUniverse {
    inner: Arc<RwLock<Universe>>,
}

impl SharedUniverse {
    pub fn new(universe: Universe) -> Self {
        Self {
            inner: Arc::new(RwLock::new(universe)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Universe> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Universe> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, message: Message) -> Result<()> {
        self.write().add(message)
    }

    pub fn add_time_proof(&self, anchor: &Hash) -> Result<()> {
        self.write().add_time_proof(anchor)
    }

    pub fn add_time_proof_for(&self, sender: &Hash) -> Result<()> {
        self.write().add_time_proof_for(sender)
    }

    pub fn check_user_valid(&self, account: &Hash) -> bool {
        self.read().check_user_valid(account)
    }

    pub fn get_max_seq(&self, sender: &Hash) -> u64 {
        self.read().get_max_seq(sender)
    }

    pub fn get_message_by_id(&self, id: &Hash) -> Option<Message> {
        self.read().get_message_by_id(id).cloned()
    }

    pub fn get_user(&self, account: &Hash) -> Option<User> {
        self.read().get_user(account).cloned()
    }

    /// Run a read-only closure against a consistent view.
    pub fn with_read<R>(&self, f: impl FnOnce(&Universe) -> R) -> R {
        f(&self.read())
    }
}
