//! Account graph and birth rules for the Kinship network.
//!
//! Accounts are created only through a co-signed birth between two existing
//! accounts of opposite parity. This crate holds the account types, the
//! birth content the parents sign, the account graph that enforces the
//! structural birth rules, and the lifecycle-window rules evaluated against
//! a time proof.
//!
//! # Birth Rules
//!
//! - Parents have opposite parity
//! - Both parent signatures verify, the second covering the first
//! - Both parents are existing accounts, not ancestor and descendant
//! - At the causal time of the birth each parent is alive, old enough, and
//!   has not co-signed another birth too recently

pub mod birth;
pub mod error;
pub mod genesis;
pub mod group;
pub mod natural_law;
pub mod user;

pub use birth::BirthContent;
pub use error::{BirthError, GenesisError, GroupError, Result};
pub use genesis::{create_root_user, GenesisPair, MAX_KEYGEN_ATTEMPTS};
pub use group::{Account, CheckedBirth, Group};
pub use natural_law::{CausalClock, NaturalLaw};
pub use user::{ParentSig, Parity, User, UserIdentity};
