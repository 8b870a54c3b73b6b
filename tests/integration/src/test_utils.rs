//! Test fixtures shared by the integration scenarios

use kinship_core::{Hash, NaturalLawConfig};
use kinship_crypto::{PrivateKeyMaterial, Scheme};
use kinship_domain::{Message, MessageValue, MsgReference};
use kinship_identity::{create_root_user, BirthContent, GenesisPair, Parity};
use kinship_universe::{Universe, UniverseError};

/// An account together with the key it signs with
pub struct Actor {
    pub id: Hash,
    pub key: PrivateKeyMaterial,
}

impl Actor {
    /// Send a text message referencing `refs`
    pub fn say(&self, text: &str, refs: &[&Message]) -> Message {
        self.send(MessageValue::text(text), refs)
    }

    pub fn send(&self, value: MessageValue, refs: &[&Message]) -> Message {
        Message::create(
            self.id,
            value,
            refs.iter().map(|m| MsgReference::to(m)).collect(),
            &self.key,
        )
        .unwrap()
    }

    /// Send a chain of `count` text messages, each referencing the previous
    pub fn tick(&self, universe: &mut Universe, from: &Message, count: usize) -> Message {
        let mut last = from.clone();
        for i in 0..count {
            let next = self.say(&format!("tick {}", i), &[&last]);
            universe.add(next.clone()).unwrap();
            last = next;
        }
        last
    }
}

/// A bootstrapped universe with both genesis accounts
pub struct World {
    pub universe: Universe,
    pub adam: Actor,
    pub eve: Actor,
    pub genesis_msg: Message,
}

/// Quarter lifetime 2, genesis accounts live 128 steps
pub fn test_config() -> NaturalLawConfig {
    NaturalLawConfig {
        min_lifetime: 8,
        genesis_lifetime: None,
    }
}

impl World {
    pub fn new() -> Self {
        Self::with(test_config(), Scheme::Single)
    }

    pub fn with(config: NaturalLawConfig, scheme: Scheme) -> Self {
        Self::try_with(config, scheme).unwrap()
    }

    pub fn try_with(config: NaturalLawConfig, scheme: Scheme) -> Result<Self, UniverseError> {
        kinship_core::logging::init();

        let (adam_user, adam_key) = create_root_user("adam", scheme, Parity::Odd).unwrap();
        let (eve_user, eve_key) = create_root_user("eve", scheme, Parity::Even).unwrap();
        let adam = Actor {
            id: adam_user.id(),
            key: adam_key,
        };
        let eve = Actor {
            id: eve_user.id(),
            key: eve_key,
        };
        let genesis_msg = adam.say("let there be light", &[]);
        let pair = GenesisPair::new(adam_user, eve_user).unwrap();
        let universe = Universe::new(config, pair, genesis_msg.clone())?;
        Ok(Self {
            universe,
            adam,
            eve,
            genesis_msg,
        })
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Birth content for a fresh key of the given parity, signed by `first`
/// then `second`. Returns the content and the child's key.
pub fn cosigned_birth(
    name: &str,
    parity: Parity,
    first: &Actor,
    second: &Actor,
) -> (BirthContent, PrivateKeyMaterial) {
    let (candidate, key) = create_root_user(name, Scheme::Single, parity).unwrap();
    let mut content = BirthContent::new(name, "", candidate.auth().clone());
    content.sign_by_parent(first.id, &first.key).unwrap();
    content.sign_by_parent(second.id, &second.key).unwrap();
    (content, key)
}

/// Admit a birth carried by `carrier` and return the new account as an actor.
pub fn admit_child(
    universe: &mut Universe,
    carrier: &Actor,
    content: BirthContent,
    key: PrivateKeyMaterial,
    refs: &[&Message],
) -> (Actor, Message) {
    let msg = carrier.send(MessageValue::Birth(content.clone()), refs);
    universe.add(msg.clone()).unwrap();
    let id = content.into_user(msg.id).unwrap().id();
    (Actor { id, key }, msg)
}
