// ── View projection ──
//
// The only place server truth and optimistic overrides meet. Pure reads:
// no mutation, no I/O. Recompute whenever the DataStore or OverrideStore
// version channels tick.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{DisplayPowerState, IpResolution, PowerState, TransientPowerState, Vm, VmDetail};
use crate::store::{DataStore, OverrideStore};

/// The merged, externally visible state of one VM at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct VmSnapshot {
    pub vm: Arc<Vm>,
    pub power: DisplayPowerState,
    pub ip: Option<IpResolution>,
    pub detail: Option<VmDetail>,
}

/// The three-way power merge, as a pure reducer with explicit
/// precedence: active override > last-known server state > powered-off
/// default for VMs never yet observed with power data.
pub fn display_power(
    server: Option<PowerState>,
    active_override: Option<TransientPowerState>,
) -> DisplayPowerState {
    match (active_override, server) {
        (Some(transient), _) => transient.into(),
        (None, Some(state)) => state.into(),
        (None, None) => DisplayPowerState::PoweredOff,
    }
}

/// Project the current store contents into display rows, sorted by VM
/// name (id as tiebreaker) for stable output.
pub fn project(store: &DataStore, overrides: &OverrideStore) -> Vec<VmSnapshot> {
    let vms = store.vms_snapshot();
    let mut rows: Vec<VmSnapshot> = vms
        .iter()
        .map(|(id, vm)| VmSnapshot {
            vm: Arc::clone(vm),
            power: display_power(store.power_of(id), overrides.get(id)),
            ip: store.ip_of(id),
            detail: store.detail_of(id),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.vm.name()
            .cmp(b.vm.name())
            .then_with(|| a.vm.id.cmp(&b.vm.id))
    });
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::VmId;
    use crate::store::PollSnapshot;

    #[test]
    fn default_is_powered_off_never_undefined() {
        assert_eq!(display_power(None, None), DisplayPowerState::PoweredOff);
    }

    #[test]
    fn server_state_shows_without_override() {
        assert_eq!(
            display_power(Some(PowerState::Suspended), None),
            DisplayPowerState::Suspended
        );
    }

    #[test]
    fn override_shadows_server_state() {
        assert_eq!(
            display_power(
                Some(PowerState::PoweredOff),
                Some(TransientPowerState::PoweringOn)
            ),
            DisplayPowerState::PoweringOn
        );
    }

    #[test]
    fn override_shadows_even_the_default() {
        assert_eq!(
            display_power(None, Some(TransientPowerState::PoweringOff)),
            DisplayPowerState::PoweringOff
        );
    }

    #[tokio::test]
    async fn project_merges_store_and_overrides() {
        let store = DataStore::new();
        let overrides = OverrideStore::new(Duration::from_secs(10));

        store.apply_poll_snapshot(PollSnapshot {
            vms: vec![
                Vm {
                    id: VmId::new("vm1"),
                    path: "/vms/alpha/alpha.vmx".into(),
                },
                Vm {
                    id: VmId::new("vm2"),
                    path: "/vms/beta/beta.vmx".into(),
                },
            ],
            power: vec![(VmId::new("vm1"), PowerState::PoweredOff)],
            ips: vec![(VmId::new("vm1"), IpResolution::Resolved("10.0.0.5".into()))],
            details: Vec::new(),
        });
        overrides.apply(VmId::new("vm1"), TransientPowerState::PoweringOn);

        let rows = project(&store, &overrides);

        assert_eq!(rows.len(), 2);
        // Sorted by name: alpha before beta.
        assert_eq!(rows[0].vm.id, VmId::new("vm1"));
        assert_eq!(rows[0].power, DisplayPowerState::PoweringOn);
        assert_eq!(rows[0].ip.as_ref().unwrap().ip(), Some("10.0.0.5"));
        // vm2 has never been polled for power: defaults to poweredOff.
        assert_eq!(rows[1].power, DisplayPowerState::PoweredOff);
        assert!(rows[1].ip.is_none());
    }
}
