//! In-memory envelope store.

use rustc_hash::FxHashMap;

use crate::error::StoreError;
use crate::model::envelope::Envelope;
use crate::store::{EventStore, Filter};

/// Envelopes keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    envelopes: FxHashMap<String, Envelope>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored envelopes.
    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}

impl EventStore for MemoryStore {
    fn store(&mut self, envelope: Envelope) -> Result<bool, StoreError> {
        if envelope.id.is_empty() {
            return Err(StoreError::MissingId);
        }
        if self.envelopes.contains_key(&envelope.id) {
            return Ok(false);
        }
        self.envelopes.insert(envelope.id.clone(), envelope);
        Ok(true)
    }

    fn query(&self, filter: &Filter) -> Result<Vec<Envelope>, StoreError> {
        let mut out: Vec<Envelope> = self
            .envelopes
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        Ok(self.envelopes.remove(id).is_some())
    }
}
