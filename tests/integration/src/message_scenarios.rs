//! Message admission scenarios: idempotence, tampering, threshold
//! signatures and the append-only message graph.

use crate::test_utils::{test_config, World};
use kinship_crypto::{Scheme, SchemeError, SIGNATURE_LEN};
use kinship_domain::{DomainError, Message, MessageValue, MsgReference};
use kinship_universe::{ErrorKind, UniverseError};

#[test]
fn test_duplicate_is_idempotent() {
    let mut w = World::new();
    let m = w.eve.say("once", &[&w.genesis_msg]);
    w.universe.add(m.clone()).unwrap();
    let count = w.universe.message_count();

    for _ in 0..3 {
        let err = w.universe.add(m.clone()).unwrap_err();
        assert_eq!(err, UniverseError::DuplicateMessage(m.id));
    }
    assert_eq!(w.universe.message_count(), count);
    assert_eq!(w.universe.get_max_seq(&w.adam.id), 1);
}

#[test]
fn test_threshold_byte_flip_rejected() {
    let mut w = World::with(test_config(), Scheme::Threshold(3));
    let m = w.eve.say("all three keys", &[&w.genesis_msg]);
    assert_eq!(m.signature.len(), 3 * SIGNATURE_LEN);

    // one bad component fails the whole signature
    let mut flipped = m.clone();
    flipped.signature[SIGNATURE_LEN + 10] ^= 0x01;
    let err = w.universe.add(flipped).unwrap_err();
    assert_eq!(err, UniverseError::InvalidSignature(m.id));
    assert_eq!(err.kind(), ErrorKind::Authorization);

    w.universe.add(m).unwrap();
}

#[test]
fn test_threshold_missing_component_is_scheme_error() {
    let mut w = World::with(test_config(), Scheme::Threshold(2));
    let mut m = w.eve.say("short", &[&w.genesis_msg]);
    m.signature.truncate(SIGNATURE_LEN);

    let err = w.universe.add(m.clone()).unwrap_err();
    assert!(matches!(
        err,
        UniverseError::Domain(DomainError::Scheme(SchemeError::KeyCountMismatch { .. }))
    ));
    assert_eq!(err.kind(), ErrorKind::Scheme);
    assert!(w.universe.get_message_by_id(&m.id).is_none());
}

#[test]
fn test_tampered_reference_list() {
    let mut w = World::new();
    let e1 = w.eve.say("one", &[&w.genesis_msg]);
    w.universe.add(e1.clone()).unwrap();

    let mut m = w.adam.say("two", &[&w.genesis_msg]);
    m.references.push(MsgReference::to(&e1));
    let err = w.universe.add(m.clone()).unwrap_err();
    assert_eq!(err, UniverseError::MalformedMessage(m.id));
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_append_only_graph() {
    let mut w = World::new();
    let a = w.adam.say("a", &[&w.genesis_msg]);
    let b = w.eve.say("b", &[&a]);
    let c = w.adam.say("c", &[&a, &b]);

    // a message can only reference what is already stored
    let err = w.universe.add(c.clone()).unwrap_err();
    assert!(matches!(err, UniverseError::UnknownReference { .. }));
    assert_eq!(w.universe.message_count(), 1);

    let mut stored: Vec<&Message> = vec![&w.genesis_msg];
    for m in [&a, &b, &c] {
        for r in &m.references {
            assert!(stored.iter().any(|s| s.id == r.msg_id));
        }
        w.universe.add(m.clone()).unwrap();
        stored.push(m);
        assert_eq!(w.universe.message_count(), stored.len());
    }

    for m in &stored {
        assert_eq!(w.universe.get_message_by_id(&m.id), Some(*m));
    }
    assert_eq!(w.universe.sequence_of(&w.adam.id, &c.id), Some(3));
}

#[test]
fn test_message_survives_json_transport() {
    let mut w = World::new();
    let m = w.eve.say("over the wire", &[&w.genesis_msg]);
    let wire = serde_json::to_string(&m).unwrap();
    let decoded: Message = serde_json::from_str(&wire).unwrap();
    assert_eq!(decoded, m);
    w.universe.add(decoded).unwrap();

    let stored = w.universe.get_message_by_id(&m.id).unwrap();
    assert_eq!(stored.value, MessageValue::text("over the wire"));
}
