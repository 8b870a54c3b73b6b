//! Causal orchestration for the Kinship network.
//!
//! A [`Universe`] owns the message DAG, the account graph, one time proof
//! per root sender and a snapshot of valid accounts per time proof. Every
//! inbound message passes through [`Universe::add`]; the transport layer
//! uses the read-only queries to decide what to request or forward.
//!
//! # Concurrency
//!
//! `Universe` is a single-owner value. [`SharedUniverse`] serializes writers
//! behind a read-write lock so readers never observe a half-applied `add`.

pub mod error;
pub mod shared;
pub mod space_time;
pub mod universe;
pub mod universe_group;

pub use error::{ErrorKind, Result, UniverseError};
pub use shared::SharedUniverse;
pub use space_time::{SpaceTime, TimeProofClock, UserState, UserStatus};
pub use universe::Universe;
pub use universe_group::UniverseGroup;
