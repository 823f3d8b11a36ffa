//! The generic signed event envelope that carries subspace events.
//!
//! Envelopes are owned by the underlying event network: this crate builds
//! their tag lists and reads them back, but signing and verification are
//! left to an [`EnvelopeSigner`] / [`EnvelopeVerifier`] supplied by the
//! caller.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::EnvelopeError;
use crate::model::id::to_hex;

/// Reserved kind for subspace creation.
pub const KIND_SUBSPACE_CREATE: u32 = 30100;
/// Reserved kind for joining a subspace.
pub const KIND_SUBSPACE_JOIN: u32 = 30200;
/// Reserved kind for subspace operations.
pub const KIND_SUBSPACE_OP: u32 = 30300;

/// The three reserved subspace event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Create,
    Join,
    Op,
}

impl EventKind {
    /// Maps a raw envelope kind to a subspace kind.
    pub fn from_u32(kind: u32) -> Option<Self> {
        match kind {
            KIND_SUBSPACE_CREATE => Some(EventKind::Create),
            KIND_SUBSPACE_JOIN => Some(EventKind::Join),
            KIND_SUBSPACE_OP => Some(EventKind::Op),
            _ => None,
        }
    }

    /// Returns the raw envelope kind.
    pub fn as_u32(self) -> u32 {
        match self {
            EventKind::Create => KIND_SUBSPACE_CREATE,
            EventKind::Join => KIND_SUBSPACE_JOIN,
            EventKind::Op => KIND_SUBSPACE_OP,
        }
    }

    /// Short name used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Create => "create",
            EventKind::Join => "join",
            EventKind::Op => "op",
        }
    }

    /// Value of the `d` tag emitted for this kind.
    pub fn d_tag(self) -> &'static str {
        match self {
            EventKind::Create => "subspace_create",
            EventKind::Join => "subspace_join",
            EventKind::Op => "subspace_op",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_u32(), self.name())
    }
}

/// One envelope tag: a key followed by one or more values.
///
/// Serializes as a plain JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Creates a `[key, value]` tag.
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag(vec![key.into(), value.into()])
    }

    /// The tag key, if the tag is not empty.
    pub fn key(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The first value after the key.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// Number of elements, key included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Elements in order, key first.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Generic signed event record.
///
/// `id` and `sig` stay empty until an external signer fills them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pubkey: String,
    pub created_at: u64,
    pub kind: u32,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sig: String,
}

impl Envelope {
    /// Creates an unsigned envelope of the given kind stamped with the current time.
    pub fn new(kind: u32) -> Self {
        Self {
            kind,
            created_at: unix_now(),
            ..Self::default()
        }
    }

    /// Reads an envelope from its wire JSON.
    pub fn from_json(json: &str) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the envelope as wire JSON.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "id": self.id,
            "pubkey": self.pubkey,
            "created_at": self.created_at,
            "kind": self.kind,
            "tags": self.tags,
            "content": self.content,
            "sig": self.sig,
        })
        .to_string()
    }

    /// Canonical serialization consumed by signers:
    /// `[0, pubkey, created_at, kind, tags, content]`.
    pub fn canonical_json(&self) -> String {
        serde_json::json!([
            0,
            self.pubkey,
            self.created_at,
            self.kind,
            self.tags,
            self.content
        ])
        .to_string()
    }

    /// Content-addressed id: lowercase hex SHA-256 of [`Envelope::canonical_json`].
    pub fn compute_id(&self) -> String {
        to_hex(&Sha256::digest(self.canonical_json().as_bytes()))
    }

    /// Stores the content-addressed id in `id`.
    pub fn assign_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The reserved subspace kind of this envelope, if any.
    pub fn event_kind(&self) -> Option<EventKind> {
        EventKind::from_u32(self.kind)
    }

    /// First value of the last tag with `key` (last-wins).
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .filter(|t| t.len() >= 2 && t.key() == Some(key))
            .last()
            .and_then(Tag::value)
    }
}

/// Signs envelopes on behalf of an identity.
///
/// Implementations set `pubkey`, `id` and `sig`.
pub trait EnvelopeSigner {
    type Error;

    fn sign(&self, envelope: &mut Envelope) -> Result<(), Self::Error>;
}

/// Checks envelope authenticity.
pub trait EnvelopeVerifier {
    type Error;

    /// Returns `Ok(false)` for a well-formed but invalid signature.
    fn verify(&self, envelope: &Envelope) -> Result<bool, Self::Error>;
}

/// Seconds since the Unix epoch, zero if the clock is before it.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
