//! Event-store seam.
//!
//! Relays and databases that hold raw envelopes sit behind [`EventStore`].
//! [`MemoryStore`] keeps envelopes in memory for tests and tools, and
//! [`replay::load_subspace`] rebuilds the typed history of one subspace
//! from any store.

pub mod memory;
pub mod replay;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::TagKey;
use crate::error::StoreError;
use crate::model::envelope::{Envelope, EventKind};

pub use memory::MemoryStore;
pub use replay::{load_subspace, Rejection, SubspaceLog};

/// Append-only, filterable envelope storage.
pub trait EventStore {
    /// Stores an envelope. Returns `false` if an envelope with the same id
    /// is already stored.
    fn store(&mut self, envelope: Envelope) -> Result<bool, StoreError>;

    /// Envelopes matching `filter`, newest first.
    fn query(&self, filter: &Filter) -> Result<Vec<Envelope>, StoreError>;

    /// Removes the envelope with `id`. Returns `false` if none was stored.
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;
}

/// Envelope query.
///
/// Empty lists and `None` bounds do not constrain. A tag constraint
/// matches when the envelope has a tag with that key whose first value is
/// one of the listed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub ids: Vec<String>,
    pub authors: Vec<String>,
    pub kinds: Vec<u32>,
    pub tags: BTreeMap<String, Vec<String>>,
    pub since: Option<u64>,
    pub until: Option<u64>,
    pub limit: Option<usize>,
}

impl Filter {
    /// A filter matching every envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every create, join and op envelope tagged with `subspace_id`.
    pub fn for_subspace(subspace_id: &str) -> Self {
        Self::new()
            .kinds([EventKind::Create, EventKind::Join, EventKind::Op].map(EventKind::as_u32))
            .tag(TagKey::Sid.as_str(), [subspace_id])
    }

    /// Restricts to the given envelope ids.
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Restricts to the given author identities.
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors.extend(authors.into_iter().map(Into::into));
        self
    }

    /// Restricts to the given envelope kinds.
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u32>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    /// Adds accepted first values for tag `key`.
    pub fn tag<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Oldest accepted `created_at`, inclusive.
    pub fn since(mut self, ts: u64) -> Self {
        self.since = Some(ts);
        self
    }

    /// Newest accepted `created_at`, inclusive.
    pub fn until(mut self, ts: u64) -> Self {
        self.until = Some(ts);
        self
    }

    /// Caps the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `envelope` satisfies every constraint (ignores `limit`).
    pub fn matches(&self, envelope: &Envelope) -> bool {
        if !self.ids.is_empty() && !self.ids.contains(&envelope.id) {
            return false;
        }
        if !self.authors.is_empty() && !self.authors.contains(&envelope.pubkey) {
            return false;
        }
        if !self.kinds.is_empty() && !self.kinds.contains(&envelope.kind) {
            return false;
        }
        if self.since.is_some_and(|since| envelope.created_at < since) {
            return false;
        }
        if self.until.is_some_and(|until| envelope.created_at > until) {
            return false;
        }
        self.tags.iter().all(|(key, values)| {
            envelope.tags.iter().any(|tag| {
                tag.len() >= 2
                    && tag.key() == Some(key.as_str())
                    && tag.value().is_some_and(|v| values.iter().any(|want| want == v))
            })
        })
    }
}
