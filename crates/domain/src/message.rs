//! Signed messages.
//!
//! Every action in the network is a message signed by its sender. A message
//! id is the BLAKE3 digest of the canonical signing payload (sender, content
//! and references); the signature is excluded, so the id is fixed before
//! signing and two messages with the same id are the same message.

use crate::{DomainError, Result};
use kinship_core::Hash;
use kinship_crypto::{payload_hash, PayloadHash, PrivateKeyMaterial, PublicKeyMaterial};
use kinship_identity::{BirthContent, User};
use serde::{Deserialize, Serialize};
use std::fmt;

const MESSAGE_ID_TAG: &[u8] = b"kinship/message/v1";

/// Reference to an earlier message, naming its sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MsgReference {
    pub sender_id: Hash,
    pub msg_id: Hash,
}

impl MsgReference {
    pub fn new(sender_id: Hash, msg_id: Hash) -> Self {
        Self { sender_id, msg_id }
    }

    /// Reference to `message`.
    pub fn to(message: &Message) -> Self {
        Self::new(message.sender_id, message.id)
    }
}

/// Content type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Text,
    Birth,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Text => write!(f, "text"),
            ContentType::Birth => write!(f, "birth"),
        }
    }
}

/// Message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "content_type", content = "content")]
pub enum MessageValue {
    /// Opaque application content
    Text(#[serde(with = "kinship_core::serde_hex")] Vec<u8>),
    /// A co-signed birth proposing a new account
    Birth(BirthContent),
}

impl MessageValue {
    pub fn text(content: impl Into<Vec<u8>>) -> Self {
        MessageValue::Text(content.into())
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            MessageValue::Text(_) => ContentType::Text,
            MessageValue::Birth(_) => ContentType::Birth,
        }
    }
}

/// A signed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Hash,
    pub sender_id: Hash,
    pub value: MessageValue,
    pub references: Vec<MsgReference>,
    #[serde(with = "kinship_core::serde_hex")]
    pub signature: Vec<u8>,
}

/// Fields covered by the id and the signature, in sorted key order.
#[derive(Serialize)]
struct SigningPayload<'a> {
    references: &'a [MsgReference],
    sender_id: &'a Hash,
    value: &'a MessageValue,
}

impl Message {
    /// Build and sign a message.
    pub fn create(
        sender_id: Hash,
        value: MessageValue,
        references: Vec<MsgReference>,
        key: &PrivateKeyMaterial,
    ) -> Result<Self> {
        let mut message = Self {
            id: Hash::default(),
            sender_id,
            value,
            references,
            signature: Vec::new(),
        };
        message.id = message.compute_id()?;
        message.signature = kinship_crypto::sign(&message.signing_hash()?, key)?.bytes;
        Ok(message)
    }

    /// Canonical JSON of the signed fields.
    pub fn to_canonical_json_for_signing(&self) -> Result<String> {
        serde_json::to_string(&SigningPayload {
            references: &self.references,
            sender_id: &self.sender_id,
            value: &self.value,
        })
        .map_err(|e| DomainError::SerializationError(e.to_string()))
    }

    pub fn compute_id(&self) -> Result<Hash> {
        let canonical = self.to_canonical_json_for_signing()?;
        Ok(Hash::digest(MESSAGE_ID_TAG, canonical.as_bytes()))
    }

    /// Verify the stored id matches the content.
    pub fn verify_id(&self) -> Result<bool> {
        Ok(self.compute_id()? == self.id)
    }

    /// SHA-256 of the canonical payload, as handed to the signer.
    pub fn signing_hash(&self) -> Result<PayloadHash> {
        let canonical = self.to_canonical_json_for_signing()?;
        Ok(payload_hash(canonical.as_bytes()))
    }

    /// Verify the signature against the sender's key material.
    pub fn verify_signature(&self, auth: &PublicKeyMaterial) -> Result<bool> {
        Ok(auth.verify(&self.signing_hash()?, &self.signature)?)
    }

    pub fn content_type(&self) -> ContentType {
        self.value.content_type()
    }

    /// The account a birth message proposes, or `None` for other content.
    pub fn birth_user(&self) -> Option<Result<User>> {
        match &self.value {
            MessageValue::Birth(content) => {
                Some(content.clone().into_user(self.id).map_err(Into::into))
            }
            MessageValue::Text(_) => None,
        }
    }

    /// References to earlier messages of the same sender.
    pub fn same_sender_references(&self) -> impl Iterator<Item = &MsgReference> {
        self.references
            .iter()
            .filter(move |r| r.sender_id == self.sender_id)
    }
}
