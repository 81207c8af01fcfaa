// ── Optimistic power-override store ──
//
// Holds the short-lived transient state shown for a VM while a power
// command is in flight. At most one override per VM id; a newer dispatch
// replaces and supersedes an older one. Expiry is generation-checked:
// every apply() bumps a monotonic counter, and the timer it schedules
// only clears the override if the generation still matches. A superseded
// timer (or a late command completion) finds a mismatch and does nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use crate::model::{PowerState, TransientPowerState, VmId};

/// One active override.
#[derive(Debug, Clone, Copy)]
pub struct PowerOverride {
    pub state: TransientPowerState,
    /// Identity of the dispatch that installed this override.
    pub generation: u64,
    pub applied_at: Instant,
}

/// Exclusive owner of all overrides. Other components request changes
/// through this interface; nothing else may create or clear one.
///
/// Cheaply cloneable: clones share the same underlying map, which is how
/// the expiry timers keep a handle on it.
#[derive(Clone)]
pub struct OverrideStore {
    inner: Arc<OverrideInner>,
}

struct OverrideInner {
    entries: DashMap<VmId, PowerOverride>,
    next_generation: AtomicU64,
    timeout: Duration,
    /// Bumped on every change so projections can recompute.
    version: watch::Sender<u64>,
}

impl OverrideStore {
    pub fn new(timeout: Duration) -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(OverrideInner {
                entries: DashMap::new(),
                next_generation: AtomicU64::new(0),
                timeout,
                version,
            }),
        }
    }

    /// Install an override for `id`, replacing any existing one, and
    /// schedule automatic removal after the store's timeout. Returns the
    /// dispatch generation -- callers hold onto it to roll back safely
    /// (`clear_if_current`) without clobbering a newer dispatch.
    ///
    /// Must be called from within a tokio runtime (the expiry timer is a
    /// spawned task).
    pub fn apply(&self, id: VmId, state: TransientPowerState) -> u64 {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.entries.insert(
            id.clone(),
            PowerOverride {
                state,
                generation,
                applied_at: Instant::now(),
            },
        );
        self.inner.bump_version();

        let inner = Arc::clone(&self.inner);
        let timeout = self.inner.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if inner.clear_if_current(&id, generation) {
                debug!(vm = %id, "override expired without server confirmation");
            }
        });

        generation
    }

    /// Remove the override for `id` if present. Idempotent.
    pub fn clear(&self, id: &VmId) -> bool {
        let removed = self.inner.entries.remove(id).is_some();
        if removed {
            self.inner.bump_version();
        }
        removed
    }

    /// Remove the override for `id` only if it still belongs to the
    /// dispatch identified by `generation`. A late completion or expiry
    /// timer for a superseded dispatch is a no-op.
    pub fn clear_if_current(&self, id: &VmId, generation: u64) -> bool {
        self.inner.clear_if_current(id, generation)
    }

    /// The transient state currently shown for `id`, if any.
    pub fn get(&self, id: &VmId) -> Option<TransientPowerState> {
        self.inner.entries.get(id).map(|r| r.value().state)
    }

    /// Full override for `id`, including its dispatch identity.
    pub fn get_override(&self, id: &VmId) -> Option<PowerOverride> {
        self.inner.entries.get(id).map(|r| *r.value())
    }

    /// Reconciliation rule, run once per id per completed poll cycle:
    /// when the freshly polled server state has reached the transient's
    /// target, real progress has superseded the optimistic guess and the
    /// override is dropped -- possibly well before its timeout.
    pub fn reconcile(&self, id: &VmId, polled: PowerState) {
        let removed = self
            .inner
            .entries
            .remove_if(id, |_, ov| ov.state.target() == polled)
            .is_some();
        if removed {
            debug!(vm = %id, state = %polled, "server reached target state, override cleared");
            self.inner.bump_version();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }
}

impl OverrideInner {
    fn clear_if_current(&self, id: &VmId, generation: u64) -> bool {
        let removed = self
            .entries
            .remove_if(id, |_, ov| ov.generation == generation)
            .is_some();
        if removed {
            self.bump_version();
        }
        removed
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(timeout_secs: u64) -> OverrideStore {
        OverrideStore::new(Duration::from_secs(timeout_secs))
    }

    #[tokio::test]
    async fn apply_then_get() {
        let s = store(10);
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);
        assert_eq!(
            s.get(&VmId::new("vm1")),
            Some(TransientPowerState::PoweringOn)
        );
        assert_eq!(s.len(), 1);
    }

    #[tokio::test]
    async fn apply_replaces_existing_override() {
        let s = store(10);
        let first = s.apply(VmId::new("vm1"), TransientPowerState::PoweringOff);
        let second = s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);

        assert!(second > first);
        assert_eq!(s.len(), 1);
        assert_eq!(
            s.get(&VmId::new("vm1")),
            Some(TransientPowerState::PoweringOn)
        );
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let s = store(10);
        assert!(!s.clear(&VmId::new("vm1")));
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);
        assert!(s.clear(&VmId::new("vm1")));
        assert!(!s.clear(&VmId::new("vm1")));
    }

    #[tokio::test]
    async fn clear_if_current_ignores_superseded_generation() {
        let s = store(10);
        let old = s.apply(VmId::new("vm1"), TransientPowerState::PoweringOff);
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);

        // A late rollback from the superseded dispatch must not touch
        // the newer override.
        assert!(!s.clear_if_current(&VmId::new("vm1"), old));
        assert_eq!(
            s.get(&VmId::new("vm1")),
            Some(TransientPowerState::PoweringOn)
        );
    }

    #[tokio::test]
    async fn reconcile_clears_on_target_state() {
        let s = store(10);
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);

        // Not yet at target: override stays.
        s.reconcile(&VmId::new("vm1"), PowerState::PoweredOff);
        assert_eq!(s.len(), 1);

        s.reconcile(&VmId::new("vm1"), PowerState::PoweredOn);
        assert!(s.is_empty());
    }

    #[tokio::test]
    async fn reconcile_without_override_is_noop() {
        let s = store(10);
        s.reconcile(&VmId::new("vm1"), PowerState::PoweredOn);
        assert!(s.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn override_expires_at_exactly_the_timeout() {
        let s = store(10);
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);

        tokio::time::sleep(Duration::from_millis(9_999)).await;
        assert_eq!(s.len(), 1, "must not expire before the timeout");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(s.is_empty(), "must expire at the timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_restarts_the_expiry_clock() {
        let s = store(10);
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOff);

        tokio::time::sleep(Duration::from_secs(6)).await;
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);

        // The first dispatch's timer fires at t=10s but its generation
        // is stale; the replacement lives until t=16s.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            s.get(&VmId::new("vm1")),
            Some(TransientPowerState::PoweringOn)
        );

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(s.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_clear_beats_the_timer() {
        let s = store(10);
        let generation = s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(s.clear_if_current(&VmId::new("vm1"), generation));

        // The timer later fires on an absent entry: harmless.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(s.is_empty());
    }

    #[tokio::test]
    async fn version_bumps_on_changes() {
        let s = store(10);
        let rx = s.subscribe();
        let before = *rx.borrow();
        s.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);
        s.clear(&VmId::new("vm1"));
        assert!(*rx.borrow() >= before + 2);
    }
}
