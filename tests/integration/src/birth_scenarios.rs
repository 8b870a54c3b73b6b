//! Birth scenarios through the full admission path.

use crate::test_utils::{admit_child, cosigned_birth, Actor, World};
use kinship_core::{ConfigError, Hash, NaturalLawConfig};
use kinship_crypto::{generate_keys, Scheme};
use kinship_domain::{Message, MessageValue};
use kinship_identity::{BirthContent, BirthError, Parity, ParentSig};
use kinship_universe::{ErrorKind, UniverseError};

/// World where adam has reached sequence 3 and a2 (adam x eve) was born at 4.
fn world_with_a2() -> (World, Actor, BirthContent, Message) {
    let mut w = World::new();
    let m = w.adam.tick(&mut w.universe, &w.genesis_msg, 2);
    let (content, key) = cosigned_birth("a2", Parity::Odd, &w.adam, &w.eve);
    let (a2, b) = admit_child(&mut w.universe, &w.adam, content.clone(), key, &[&m]);
    (w, a2, content, b)
}

/// Submit a birth message and check it is kept while its account is not.
fn expect_rejected(w: &mut World, msg: Message, reason: BirthError) {
    let before = w.universe.group().len();
    let err = w.universe.add(msg.clone()).unwrap_err();
    assert_eq!(
        err,
        UniverseError::BirthRejected {
            message_id: msg.id,
            reason
        }
    );
    assert_eq!(err.kind(), ErrorKind::BirthValidation);
    assert!(w.universe.get_message_by_id(&msg.id).is_some());
    assert_eq!(w.universe.group().len(), before);
}

#[test]
fn test_a2_born_from_adam_and_eve() {
    let (mut w, a2, _, b) = world_with_a2();
    let user = w.universe.get_user(&a2.id).unwrap();
    assert_eq!(user.parent_ids(), Some([w.adam.id, w.eve.id]));
    assert_eq!(user.birth_msg, Some(b.id));
    assert_eq!(user.parity(), Parity::Odd);
    assert_eq!(w.universe.group().lifecycle(&a2.id), Some(64));
    assert_eq!(w.universe.group().children(&w.eve.id), &[a2.id]);

    // the child can send right away
    let hello = a2.say("hello", &[&b]);
    w.universe.add(hello).unwrap();
}

#[test]
fn test_resubmitted_birth_is_rate_limited_then_distinct() {
    let (mut w, a2, content, b1) = world_with_a2();

    // same content one tick later: the parents co-signed too recently
    let b2 = w.adam.send(MessageValue::Birth(content.clone()), &[&b1]);
    let err = w.universe.add(b2.clone()).unwrap_err();
    assert_eq!(
        err,
        UniverseError::BirthRejected {
            message_id: b2.id,
            reason: BirthError::CosignRateLimited {
                parent: w.adam.id,
                last: 4,
                now: 5
            }
        }
    );

    // later, the same content yields a distinct account sharing the key
    let m = w.adam.tick(&mut w.universe, &b2, 1);
    let b3 = w.adam.send(MessageValue::Birth(content.clone()), &[&m]);
    w.universe.add(b3.clone()).unwrap();

    let twin = content.into_user(b3.id).unwrap();
    assert_ne!(twin.id(), a2.id);
    assert!(w.universe.check_user_valid(&twin.id()));
    assert_eq!(
        w.universe.get_user(&twin.id()).unwrap().auth(),
        w.universe.get_user(&a2.id).unwrap().auth()
    );
    assert_eq!(w.universe.group().children(&w.adam.id).len(), 2);
}

#[test]
fn test_ancestor_conflict() {
    let (mut w, a2, _, _) = world_with_a2();
    let (content, _) = cosigned_birth("b", Parity::Even, &a2, &w.eve);
    let msg = a2.send(MessageValue::Birth(content), &[&w.genesis_msg]);
    let reason = BirthError::AncestorConflict(a2.id, w.eve.id);
    expect_rejected(&mut w, msg, reason);
}

#[test]
fn test_same_parity_parents() {
    let (mut w, a2, _, _) = world_with_a2();
    let (content, _) = cosigned_birth("c", Parity::Odd, &w.adam, &a2);
    let msg = w.eve.send(MessageValue::Birth(content), &[&w.genesis_msg]);
    expect_rejected(&mut w, msg, BirthError::ParityMismatch);
}

#[test]
fn test_swapped_parent_slots() {
    let mut w = World::new();
    let (mut content, _) = cosigned_birth("a2", Parity::Odd, &w.adam, &w.eve);
    content.parents.swap(0, 1);
    let msg = w.adam.send(MessageValue::Birth(content), &[&w.genesis_msg]);
    let reason = BirthError::SignatureInvalid(w.eve.id);
    expect_rejected(&mut w, msg, reason);
}

#[test]
fn test_second_parent_skipping_first_signature() {
    let mut w = World::new();
    let (_, candidate) = generate_keys(Scheme::Single).unwrap();
    let mut content = BirthContent::new("a2", "", candidate);
    content.sign_by_parent(w.adam.id, &w.adam.key).unwrap();
    let bare = kinship_crypto::sign(&content.identity.first_payload(), &w.eve.key).unwrap();
    content.parents.push(ParentSig {
        parent_id: w.eve.id,
        signature: bare.bytes,
    });

    let msg = w.adam.send(MessageValue::Birth(content), &[&w.genesis_msg]);
    let reason = BirthError::SignatureOrder(w.eve.id);
    expect_rejected(&mut w, msg, reason);
}

#[test]
fn test_unknown_parent() {
    let mut w = World::new();
    let stranger = Actor {
        id: Hash::digest(b"user", b"stranger"),
        key: generate_keys(Scheme::Single).unwrap().0,
    };
    let (content, _) = cosigned_birth("a2", Parity::Odd, &stranger, &w.eve);
    let msg = w.eve.send(MessageValue::Birth(content), &[&w.genesis_msg]);
    expect_rejected(&mut w, msg, BirthError::UnknownParent(stranger.id));
}

#[test]
fn test_cosign_windows_cannot_be_configured_away() {
    let degenerate = NaturalLawConfig {
        min_lifetime: 3,
        genesis_lifetime: None,
    };
    let err = World::try_with(degenerate, Scheme::Single).err().unwrap();
    assert_eq!(err, UniverseError::Config(ConfigError::LifetimeTooShort(3)));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // smallest accepted window: quarter lifetime 1
    let mut w = World::with(
        NaturalLawConfig {
            min_lifetime: 4,
            genesis_lifetime: None,
        },
        Scheme::Single,
    );
    let (first, _) = cosigned_birth("a2", Parity::Odd, &w.adam, &w.eve);
    let (second, _) = cosigned_birth("a3", Parity::Odd, &w.adam, &w.eve);
    let b1 = w.eve.send(MessageValue::Birth(first), &[&w.genesis_msg]);
    let b2 = w.eve.send(MessageValue::Birth(second), &[&w.genesis_msg]);
    w.universe.add(b1).unwrap();

    let err = w.universe.add(b2.clone()).unwrap_err();
    assert_eq!(
        err,
        UniverseError::BirthRejected {
            message_id: b2.id,
            reason: BirthError::CosignRateLimited {
                parent: w.adam.id,
                last: 1,
                now: 1
            }
        }
    );
    assert_eq!(w.universe.group().children(&w.adam.id).len(), 1);
}
