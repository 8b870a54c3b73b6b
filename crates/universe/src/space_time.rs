//! Time proofs.
//!
//! A time proof gives its root sender a strictly increasing local sequence
//! derived only from that sender's own reference chain:
//!
//! ```text
//! seq(m) = 1 + max(seq(r) for r in m.references if r.sender == root)
//! seq(m) = 1   when m has no same-sender reference
//! ```
//!
//! Any other message gets a causal time in the time proof: the highest
//! sequence among the root's messages it transitively references. This is
//! the clock the lifecycle-window birth rules run on.

use kinship_core::{Dag, DagError, Hash, Vertex};
use kinship_domain::Message;
use kinship_identity::CausalClock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Normal,
}

/// Membership of one account in a time proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub status: UserStatus,
    /// Causal time of the account's birth in this time proof
    pub born_at: u64,
}

#[derive(Debug, Clone)]
pub struct SpaceTime {
    root: Hash,
    anchor: Hash,
    max_sequence: u64,
    sequence_d: Dag<u64>,
    user_state_d: Dag<UserState>,
}

impl SpaceTime {
    /// Empty time proof for `root`, anchored on message `anchor`.
    pub fn new(root: Hash, anchor: Hash) -> Self {
        Self {
            root,
            anchor,
            max_sequence: 0,
            sequence_d: Dag::new(),
            user_state_d: Dag::new(),
        }
    }

    /// Sender whose messages carry the sequence.
    pub fn root(&self) -> &Hash {
        &self.root
    }

    pub fn anchor(&self) -> &Hash {
        &self.anchor
    }

    /// Running maximum sequence; never decreases.
    pub fn max_sequence(&self) -> u64 {
        self.max_sequence
    }

    pub fn sequence_of(&self, msg_id: &Hash) -> Option<u64> {
        self.sequence_d.value(msg_id).copied()
    }

    /// Number of sequenced messages.
    pub fn len(&self) -> usize {
        self.sequence_d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence_d.is_empty()
    }

    /// Assign the next sequence to a message from the root sender.
    pub fn extend(&mut self, message: &Message) -> Result<u64, DagError> {
        let parents: Vec<Hash> = message
            .same_sender_references()
            .map(|r| r.msg_id)
            .filter(|id| self.sequence_d.contains(id))
            .collect();
        let sequence = 1 + parents
            .iter()
            .filter_map(|id| self.sequence_of(id))
            .max()
            .unwrap_or(0);

        self.sequence_d
            .add_vertex(Vertex::new(message.id, sequence, parents))?;
        self.max_sequence = self.max_sequence.max(sequence);

        tracing::debug!(
            root = %self.root.short(),
            message = %message.id.short(),
            sequence,
            "sequence assigned"
        );
        Ok(sequence)
    }

    /// Causal time of a message: its own sequence if the root sent it,
    /// otherwise the highest sequence among the root messages it
    /// transitively references, or 0.
    pub fn causal_time(&self, messages: &Dag<Message>, msg_id: &Hash) -> u64 {
        if let Some(sequence) = self.sequence_of(msg_id) {
            return sequence;
        }
        messages
            .ancestors(msg_id)
            .iter()
            .filter_map(|id| self.sequence_of(id))
            .max()
            .unwrap_or(0)
    }

    /// Record an account as a member, linked to whichever of its parents
    /// are members.
    pub fn add_member(
        &mut self,
        account: Hash,
        parents: &[Hash],
        born_at: u64,
    ) -> Result<(), DagError> {
        let linked: Vec<Hash> = parents
            .iter()
            .copied()
            .filter(|p| self.user_state_d.contains(p))
            .collect();
        self.user_state_d.add_vertex(Vertex::new(
            account,
            UserState {
                status: UserStatus::Normal,
                born_at,
            },
            linked,
        ))
    }

    pub fn member(&self, account: &Hash) -> Option<&UserState> {
        self.user_state_d.value(account)
    }

    pub fn is_member(&self, account: &Hash) -> bool {
        self.user_state_d.contains(account)
    }

    /// Member account ids in admission order.
    pub fn members(&self) -> &[Hash] {
        self.user_state_d.ids()
    }

    /// Clock for evaluating a birth whose message sits at causal time `now`.
    pub fn clock_at(&self, now: u64) -> TimeProofClock<'_> {
        TimeProofClock {
            space_time: self,
            now,
        }
    }
}

/// A time proof viewed at a fixed causal time.
pub struct TimeProofClock<'a> {
    space_time: &'a SpaceTime,
    now: u64,
}

impl CausalClock for TimeProofClock<'_> {
    fn now(&self) -> u64 {
        self.now
    }

    fn born_at(&self, account: &Hash) -> Option<u64> {
        self.space_time.member(account).map(|state| state.born_at)
    }
}
