// ── Central reactive data store ──
//
// Thread-safe storage for the poller's last-known server truth: the VM
// collection plus per-VM power, IP, and detail sub-resources. Mutations
// are broadcast to subscribers via `watch` channels. The store has no
// knowledge of overrides -- those live in `OverrideStore`, and the two
// meet only in the projection.

mod collection;
mod overrides;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use self::collection::{EntityCollection, upsert_and_prune};
pub use self::overrides::{OverrideStore, PowerOverride};

use crate::model::{IpResolution, PowerState, Vm, VmDetail, VmId};

/// All per-VM data gathered during a single poll cycle.
pub struct PollSnapshot {
    pub vms: Vec<Vm>,
    pub power: Vec<(VmId, PowerState)>,
    pub ips: Vec<(VmId, IpResolution)>,
    pub details: Vec<(VmId, VmDetail)>,
}

/// Central reactive store for the last completed poll.
pub struct DataStore {
    pub(crate) vms: EntityCollection<Vm>,
    pub(crate) power: EntityCollection<PowerState>,
    pub(crate) ips: EntityCollection<IpResolution>,
    pub(crate) details: EntityCollection<VmDetail>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);

        Self {
            vms: EntityCollection::new(),
            power: EntityCollection::new(),
            ips: EntityCollection::new(),
            details: EntityCollection::new(),
            last_refresh,
        }
    }

    /// Apply one completed poll cycle.
    ///
    /// Uses upsert-then-prune per collection: incoming entries are
    /// upserted first, then ids absent from the incoming set are removed.
    /// This avoids the brief "empty" state a clear-then-insert would
    /// cause between cycles.
    pub fn apply_poll_snapshot(&self, snap: PollSnapshot) {
        upsert_and_prune(
            &self.vms,
            snap.vms.into_iter().map(|vm| (vm.id.clone(), vm)).collect(),
        );
        upsert_and_prune(&self.power, snap.power);
        upsert_and_prune(&self.ips, snap.ips);
        upsert_and_prune(&self.details, snap.details);

        let _ = self.last_refresh.send(Some(Utc::now()));
    }

    /// Record a single out-of-cycle power observation (command-triggered
    /// refresh). Leaves every other collection untouched.
    pub fn record_power(&self, id: VmId, state: PowerState) {
        self.power.upsert(id, state);
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn vms_snapshot(&self) -> Arc<Vec<(VmId, Arc<Vm>)>> {
        self.vms.snapshot()
    }

    pub fn power_snapshot(&self) -> Arc<Vec<(VmId, Arc<PowerState>)>> {
        self.power.snapshot()
    }

    pub fn ips_snapshot(&self) -> Arc<Vec<(VmId, Arc<IpResolution>)>> {
        self.ips.snapshot()
    }

    pub fn details_snapshot(&self) -> Arc<Vec<(VmId, Arc<VmDetail>)>> {
        self.details.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn vm_by_id(&self, id: &VmId) -> Option<Arc<Vm>> {
        self.vms.get(id)
    }

    pub fn power_of(&self, id: &VmId) -> Option<PowerState> {
        self.power.get(id).map(|s| *s)
    }

    pub fn ip_of(&self, id: &VmId) -> Option<IpResolution> {
        self.ips.get(id).map(|r| (*r).clone())
    }

    pub fn detail_of(&self, id: &VmId) -> Option<VmDetail> {
        self.details.get(id).map(|d| *d)
    }

    pub fn vm_count(&self) -> usize {
        self.vms.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_vms(&self) -> watch::Receiver<Arc<Vec<(VmId, Arc<Vm>)>>> {
        self.vms.subscribe()
    }

    pub fn subscribe_power(&self) -> watch::Receiver<Arc<Vec<(VmId, Arc<PowerState>)>>> {
        self.power.subscribe()
    }

    // ── Staleness ────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last poll completed, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    /// Whether the cache has outlived the poll cadence it was built for.
    pub fn is_stale(&self, poll_interval: std::time::Duration) -> bool {
        match self.data_age() {
            Some(age) => age.to_std().map(|a| a > poll_interval * 2).unwrap_or(true),
            None => true,
        }
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::IpFailure;

    fn vm(id: &str, path: &str) -> Vm {
        Vm {
            id: VmId::new(id),
            path: path.into(),
        }
    }

    #[test]
    fn apply_poll_snapshot_populates_collections() {
        let store = DataStore::new();
        store.apply_poll_snapshot(PollSnapshot {
            vms: vec![vm("vm1", "/vms/a/a.vmx")],
            power: vec![(VmId::new("vm1"), PowerState::PoweredOff)],
            ips: vec![(
                VmId::new("vm1"),
                IpResolution::Unavailable {
                    reason: IpFailure::PoweredOff,
                    detail: None,
                },
            )],
            details: vec![(
                VmId::new("vm1"),
                VmDetail {
                    processors: Some(2),
                    memory_mb: Some(2048),
                },
            )],
        });

        assert_eq!(store.vm_count(), 1);
        assert_eq!(store.power_of(&VmId::new("vm1")), Some(PowerState::PoweredOff));
        assert!(store.last_refresh().is_some());
    }

    #[test]
    fn prune_drops_vms_missing_from_next_cycle() {
        let store = DataStore::new();
        store.apply_poll_snapshot(PollSnapshot {
            vms: vec![vm("vm1", "/a.vmx"), vm("vm2", "/b.vmx")],
            power: vec![
                (VmId::new("vm1"), PowerState::PoweredOn),
                (VmId::new("vm2"), PowerState::PoweredOff),
            ],
            ips: Vec::new(),
            details: Vec::new(),
        });

        store.apply_poll_snapshot(PollSnapshot {
            vms: vec![vm("vm2", "/b.vmx")],
            power: vec![(VmId::new("vm2"), PowerState::PoweredOff)],
            ips: Vec::new(),
            details: Vec::new(),
        });

        assert_eq!(store.vm_count(), 1);
        assert!(store.vm_by_id(&VmId::new("vm1")).is_none());
        assert!(store.power_of(&VmId::new("vm1")).is_none());
    }

    #[test]
    fn record_power_touches_only_power() {
        let store = DataStore::new();
        store.record_power(VmId::new("vm1"), PowerState::PoweredOn);

        assert_eq!(store.power_of(&VmId::new("vm1")), Some(PowerState::PoweredOn));
        assert_eq!(store.vm_count(), 0);
    }

    #[test]
    fn never_refreshed_store_is_stale() {
        let store = DataStore::new();
        assert!(store.is_stale(std::time::Duration::from_secs(5)));
        assert!(store.data_age().is_none());
    }
}
