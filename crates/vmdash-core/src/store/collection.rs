// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage keyed by VmId, with push-based change
// notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::VmId;

/// A lock-free, reactive collection for one per-VM resource.
///
/// Uses `DashMap` for O(1) concurrent lookups and `watch` channels for
/// push-based change notification. Every mutation bumps a version
/// counter and rebuilds the snapshot that subscribers receive. Snapshots
/// carry the id alongside each value because sub-resources (power state,
/// IP resolution) don't embed their own identity.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    entries: DashMap<VmId, Arc<T>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<(VmId, Arc<T>)>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            entries: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or update an entry. Returns `true` if the id was new.
    pub(crate) fn upsert(&self, id: VmId, value: T) -> bool {
        let is_new = !self.entries.contains_key(&id);
        self.entries.insert(id, Arc::new(value));

        self.rebuild_snapshot();
        self.bump_version();

        is_new
    }

    /// Remove an entry by id. Returns the removed value if it existed.
    pub(crate) fn remove(&self, id: &VmId) -> Option<Arc<T>> {
        let removed = self.entries.remove(id).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
            self.bump_version();
        }
        removed
    }

    /// Look up one entry.
    pub(crate) fn get(&self, id: &VmId) -> Option<Arc<T>> {
        self.entries.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<(VmId, Arc<T>)>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<(VmId, Arc<T>)>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return all current ids in the collection.
    pub(crate) fn ids(&self) -> Vec<VmId> {
        self.entries.iter().map(|r| r.key().clone()).collect()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all entries into a snapshot vec and broadcast it.
    fn rebuild_snapshot(&self) {
        let values: Vec<(VmId, Arc<T>)> = self
            .entries
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    /// Increment the version counter.
    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

/// Upsert all incoming entries, then prune any existing ids not in the
/// incoming set. This avoids the brief empty state that a clear-then-
/// insert approach would cause.
pub(crate) fn upsert_and_prune<T: Clone + Send + Sync + 'static>(
    collection: &EntityCollection<T>,
    items: Vec<(VmId, T)>,
) {
    let incoming: std::collections::HashSet<VmId> =
        items.iter().map(|(id, _)| id.clone()).collect();
    for (id, value) in items {
        collection.upsert(id, value);
    }
    for existing in collection.ids() {
        if !incoming.contains(&existing) {
            collection.remove(&existing);
        }
    }
}
