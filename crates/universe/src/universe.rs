//! The Universe: one observer's local view of messages, accounts and time
//! proofs.
//!
//! [`Universe::add`] is the unit of atomicity. Every check runs before the
//! first mutation, so a rejected message leaves the universe untouched,
//! except a rejected birth, whose message is kept as evidence.

use crate::error::{Result, UniverseError};
use crate::space_time::SpaceTime;
use crate::universe_group::UniverseGroup;
use kinship_core::{Dag, Hash, NaturalLawConfig, Vertex};
use kinship_domain::{ContentType, Message};
use kinship_identity::{BirthError, GenesisPair, Group, NaturalLaw, User};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Universe {
    messages: Dag<Message>,
    group: Group,
    space_times: BTreeMap<Hash, SpaceTime>,
    groups: Dag<UniverseGroup>,
    law: NaturalLaw,
}

impl Universe {
    /// Bootstrap a universe from the genesis accounts and one message sent
    /// by either of them.
    ///
    /// The genesis message roots the first time proof. A config whose
    /// quarter window is zero is rejected with [`UniverseError::Config`].
    pub fn new(
        config: NaturalLawConfig,
        genesis: GenesisPair,
        genesis_msg: Message,
    ) -> Result<Self> {
        config.validate()?;
        let mut universe = Self {
            messages: Dag::new(),
            group: Group::new(genesis, config)?,
            space_times: BTreeMap::new(),
            groups: Dag::new(),
            law: NaturalLaw::new(config),
        };

        let genesis_ids = universe.group.genesis_ids();
        if !genesis_ids.contains(&genesis_msg.sender_id) {
            return Err(UniverseError::InvalidSender(genesis_msg.sender_id));
        }
        // no time proof exists yet to evaluate a birth against
        if genesis_msg.content_type() != ContentType::Text {
            return Err(UniverseError::MalformedMessage(genesis_msg.id));
        }
        let anchor = genesis_msg.id;
        let root = genesis_msg.sender_id;
        universe.add(genesis_msg)?;
        universe.add_time_proof(&anchor)?;

        tracing::info!(
            root = %root.short(),
            anchor = %anchor.short(),
            "universe bootstrapped"
        );
        Ok(universe)
    }

    /// Admit a message.
    ///
    /// Checks run in order: duplicate id, id/content mismatch, sender
    /// validity, signature, reference resolution. A birth whose account
    /// fails validation returns [`UniverseError::BirthRejected`] with the
    /// message stored.
    pub fn add(&mut self, message: Message) -> Result<()> {
        self.validate(&message)?;
        let birth = message.birth_user().transpose()?;

        let parents = message.references.iter().map(|r| r.msg_id);
        self.messages
            .add_vertex(Vertex::new(message.id, message.clone(), parents))?;

        if let Some(space_time) = self.space_times.get_mut(&message.sender_id) {
            space_time.extend(&message)?;
        }

        tracing::debug!(
            message = %message.id.short(),
            sender = %message.sender_id.short(),
            content = %message.content_type(),
            "message accepted"
        );

        match birth {
            None => Ok(()),
            Some(user) => self.admit(user, message.id),
        }
    }

    fn validate(&self, message: &Message) -> Result<()> {
        if self.messages.contains(&message.id) {
            return Err(UniverseError::DuplicateMessage(message.id));
        }
        if !message.verify_id()? {
            return Err(UniverseError::MalformedMessage(message.id));
        }
        let sender = self
            .group
            .lookup(&message.sender_id)
            .ok_or(UniverseError::InvalidSender(message.sender_id))?;
        if !message.verify_signature(sender.auth())? {
            return Err(UniverseError::InvalidSignature(message.id));
        }
        for reference in &message.references {
            let target = self.messages.value(&reference.msg_id).ok_or(
                UniverseError::UnknownReference {
                    message: message.id,
                    reference: reference.msg_id,
                },
            )?;
            if target.sender_id != reference.sender_id {
                return Err(UniverseError::ReferenceMismatch {
                    message: message.id,
                    reference: reference.msg_id,
                });
            }
        }
        Ok(())
    }

    /// Validate a proposed account and admit it into every time proof in
    /// which its parents satisfy the lifecycle rules.
    fn admit(&mut self, user: User, message_id: Hash) -> Result<()> {
        let reject = |reason: BirthError| {
            tracing::warn!(message = %message_id.short(), %reason, "birth rejected");
            UniverseError::BirthRejected { message_id, reason }
        };

        let birth = self.group.verify_birth(user).map_err(reject)?;
        let parents = *birth.parents();

        let mut passed = Vec::new();
        let mut first_failure = None;
        for (root, space_time) in &self.space_times {
            let now = space_time.causal_time(&self.messages, &message_id);
            match self
                .law
                .check_parents(&self.group, &parents, &space_time.clock_at(now))
            {
                Ok(()) => passed.push((*root, now)),
                Err(reason) => {
                    tracing::debug!(root = %root.short(), %reason, "birth fails in time proof");
                    first_failure.get_or_insert(reason);
                }
            }
        }
        if passed.is_empty() {
            return Err(reject(first_failure.unwrap_or(BirthError::MissingParents)));
        }

        let account = self.group.insert(birth)?;
        for (root, born_at) in &passed {
            if let Some(space_time) = self.space_times.get_mut(root) {
                space_time.add_member(account, &parents, *born_at)?;
            }
        }

        tracing::info!(
            account = %account.short(),
            message = %message_id.short(),
            time_proofs = passed.len(),
            "birth accepted"
        );
        Ok(())
    }

    /// Root a time proof on the sender of `anchor`.
    ///
    /// The sequence is rebuilt from every stored message of that sender in
    /// insertion order, and every account of the group becomes a member.
    pub fn add_time_proof(&mut self, anchor: &Hash) -> Result<()> {
        let root = self
            .messages
            .value(anchor)
            .ok_or(UniverseError::MessageNotFound(*anchor))?
            .sender_id;
        if self.space_times.contains_key(&root) {
            return Err(UniverseError::TimeProofAlreadyExists(root));
        }
        if !self.group.contains(&root) {
            return Err(UniverseError::InvalidSender(root));
        }

        let mut space_time = SpaceTime::new(root, *anchor);
        for message in self.messages.iter().map(Vertex::value) {
            if message.sender_id == root {
                space_time.extend(message)?;
            }
        }

        for account in self.group.ids() {
            let Some(user) = self.group.lookup(account) else {
                continue;
            };
            let born_at = user
                .birth_msg
                .map(|msg| space_time.causal_time(&self.messages, &msg))
                .unwrap_or(0);
            let parents = user.parent_ids().map(Vec::from).unwrap_or_default();
            space_time.add_member(*account, &parents, born_at)?;
        }

        let snapshot = UniverseGroup::new(self.group.ids().iter().copied());
        let existing = self.groups.ids().to_vec();
        self.groups
            .add_vertex(Vertex::new(root, snapshot, existing))?;

        tracing::info!(
            root = %root.short(),
            anchor = %anchor.short(),
            max_sequence = space_time.max_sequence(),
            members = space_time.members().len(),
            "time proof rooted"
        );
        self.space_times.insert(root, space_time);
        Ok(())
    }

    /// Root a time proof on the first stored message of `sender`.
    pub fn add_time_proof_for(&mut self, sender: &Hash) -> Result<()> {
        if !self.group.contains(sender) {
            return Err(UniverseError::InvalidSender(*sender));
        }
        let anchor = self
            .messages
            .iter()
            .map(Vertex::value)
            .find(|m| m.sender_id == *sender)
            .map(|m| m.id)
            .ok_or(UniverseError::NoMessagesFromSender(*sender))?;
        self.add_time_proof(&anchor)
    }

    /// True iff the id is an admitted account.
    pub fn check_user_valid(&self, account: &Hash) -> bool {
        self.group.contains(account)
    }

    /// Running maximum sequence of the time proof rooted at `sender`, or 0.
    pub fn get_max_seq(&self, sender: &Hash) -> u64 {
        self.space_times
            .get(sender)
            .map(SpaceTime::max_sequence)
            .unwrap_or(0)
    }

    pub fn get_message_by_id(&self, id: &Hash) -> Option<&Message> {
        self.messages.value(id)
    }

    pub fn get_user(&self, account: &Hash) -> Option<&User> {
        self.group.lookup(account)
    }

    pub fn sequence_of(&self, root: &Hash, msg_id: &Hash) -> Option<u64> {
        self.space_times.get(root)?.sequence_of(msg_id)
    }

    /// Causal time of a stored message in the time proof rooted at `root`.
    pub fn causal_time(&self, root: &Hash, msg_id: &Hash) -> Option<u64> {
        let space_time = self.space_times.get(root)?;
        if !self.messages.contains(msg_id) {
            return None;
        }
        Some(space_time.causal_time(&self.messages, msg_id))
    }

    /// Whether an account is a member of the time proof and still within
    /// its lifecycle at the proof's current maximum sequence.
    pub fn is_user_alive(&self, root: &Hash, account: &Hash) -> bool {
        let Some(space_time) = self.space_times.get(root) else {
            return false;
        };
        match (space_time.member(account), self.group.lifecycle(account)) {
            (Some(state), Some(lifecycle)) => {
                space_time.max_sequence() < state.born_at.saturating_add(lifecycle)
            }
            _ => false,
        }
    }

    pub fn time_proof_roots(&self) -> impl Iterator<Item = &Hash> {
        self.space_times.keys()
    }

    pub fn space_time(&self, root: &Hash) -> Option<&SpaceTime> {
        self.space_times.get(root)
    }

    pub fn universe_group(&self, root: &Hash) -> Option<&UniverseGroup> {
        self.groups.value(root)
    }

    /// Roots of the time proofs that existed when `root` was anchored.
    pub fn universe_group_parents(&self, root: &Hash) -> Vec<Hash> {
        self.groups
            .get(root)
            .map(|v| v.parents().iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
