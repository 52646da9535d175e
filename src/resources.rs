use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Dereferenceable handle to an in-memory payload materialized by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRef(String);

impl ResourceRef {
    #[must_use]
    pub fn as_url(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds payload bytes behind the `memory://` references placed into
/// configuration snapshots.
///
/// A property carrying an in-memory binary payload cannot enter a snapshot
/// directly; the builder materializes it here and records the reference.
/// Superseding a payload releases the previous one, so a long-lived bridge
/// never accumulates stale payload bytes across subject reloads.
#[derive(Debug, Default)]
pub struct ResourceStore {
    next_seq: u64,
    live: IndexMap<String, Vec<u8>>,
}

impl ResourceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns a fresh reference. Existing references
    /// stay live.
    pub fn materialize(&mut self, bytes: Vec<u8>) -> ResourceRef {
        let url = format!("memory://payload/{}", self.next_seq);
        self.next_seq += 1;
        self.live.insert(url.clone(), bytes);
        ResourceRef(url)
    }

    /// Releases every live reference, then registers `bytes`.
    pub fn supersede(&mut self, bytes: Vec<u8>) -> ResourceRef {
        self.live.clear();
        self.materialize(bytes)
    }

    /// Payload bytes for `reference`, if still live.
    #[must_use]
    pub fn resolve(&self, reference: &ResourceRef) -> Option<&[u8]> {
        self.live.get(reference.as_url()).map(Vec::as_slice)
    }

    /// Releases one reference. Returns `true` when it was live.
    pub fn release(&mut self, reference: &ResourceRef) -> bool {
        self.live.shift_remove(reference.as_url()).is_some()
    }

    /// Releases every live reference.
    pub fn clear(&mut self) {
        self.live.clear();
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
