//! Time proof scenarios: per-sender sequences, late anchoring, and births
//! that only one time proof can accept.

use crate::test_utils::{cosigned_birth, World};
use kinship_domain::MessageValue;
use kinship_identity::Parity;

#[test]
fn test_adam_and_eve_sequences() {
    let mut w = World::new();
    let m1 = w.genesis_msg.clone();
    assert_eq!(w.universe.sequence_of(&w.adam.id, &m1.id), Some(1));

    let m2 = w.eve.say("hello adam", &[&m1]);
    w.universe.add(m2.clone()).unwrap();
    // eve has no time proof yet
    assert_eq!(w.universe.get_max_seq(&w.eve.id), 0);

    w.universe.add_time_proof(&m2.id).unwrap();
    assert_eq!(w.universe.sequence_of(&w.eve.id, &m2.id), Some(1));

    let m3 = w.eve.say("still here", &[&m2]);
    w.universe.add(m3.clone()).unwrap();
    assert_eq!(w.universe.sequence_of(&w.eve.id, &m3.id), Some(2));
    assert_eq!(w.universe.get_max_seq(&w.eve.id), 2);

    // adam's proof only sees eve through references
    assert_eq!(w.universe.get_max_seq(&w.adam.id), 1);
    assert_eq!(w.universe.causal_time(&w.adam.id, &m3.id), Some(1));
    assert_eq!(w.universe.causal_time(&w.eve.id, &m1.id), Some(0));
}

#[test]
fn test_sequences_are_independent_per_sender() {
    let mut w = World::new();
    let e1 = w.eve.say("one", &[&w.genesis_msg]);
    w.universe.add(e1.clone()).unwrap();
    w.universe.add_time_proof_for(&w.eve.id).unwrap();

    let a = w.adam.tick(&mut w.universe, &w.genesis_msg, 5);
    let e = w.eve.tick(&mut w.universe, &e1, 2);
    assert_eq!(w.universe.sequence_of(&w.adam.id, &a.id), Some(6));
    assert_eq!(w.universe.sequence_of(&w.eve.id, &e.id), Some(3));

    let roots: Vec<_> = w.universe.time_proof_roots().copied().collect();
    assert_eq!(roots.len(), 2);
    assert!(roots.contains(&w.adam.id) && roots.contains(&w.eve.id));
}

#[test]
fn test_birth_accepted_in_one_time_proof_only() {
    let mut w = World::new();
    let e1 = w.eve.say("one", &[&w.genesis_msg]);
    w.universe.add(e1.clone()).unwrap();
    w.universe.add_time_proof_for(&w.eve.id).unwrap();
    let e3 = w.eve.tick(&mut w.universe, &e1, 2);

    // in adam's proof the birth sits at causal time 1, too early for adam
    let (content, _) = cosigned_birth("a2", Parity::Odd, &w.adam, &w.eve);
    let b = w.eve.send(MessageValue::Birth(content), &[&e3]);
    w.universe.add(b.clone()).unwrap();

    let a2 = w.universe.group().children(&w.adam.id)[0];
    let in_eve = w.universe.space_time(&w.eve.id).unwrap();
    assert_eq!(in_eve.member(&a2).map(|s| s.born_at), Some(4));
    assert!(!w.universe.space_time(&w.adam.id).unwrap().is_member(&a2));
    assert!(w.universe.is_user_alive(&w.eve.id, &a2));
    assert!(!w.universe.is_user_alive(&w.adam.id, &a2));
}

#[test]
fn test_late_anchor_includes_existing_accounts() {
    let mut w = World::new();
    let m = w.adam.tick(&mut w.universe, &w.genesis_msg, 2);
    let (content, _) = cosigned_birth("a2", Parity::Odd, &w.adam, &w.eve);
    let b = w.adam.send(MessageValue::Birth(content), &[&m]);
    w.universe.add(b.clone()).unwrap();
    let a2 = w.universe.group().children(&w.adam.id)[0];

    let e1 = w.eve.say("seen it", &[&b]);
    w.universe.add(e1).unwrap();
    w.universe.add_time_proof_for(&w.eve.id).unwrap();

    let snapshot = w.universe.universe_group(&w.eve.id).unwrap();
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains(&a2));
    // the birth message predates every eve message
    let in_eve = w.universe.space_time(&w.eve.id).unwrap();
    assert_eq!(in_eve.member(&a2).map(|s| s.born_at), Some(0));
}
