// ── Command API ──
//
// Non-power write operations flow through a unified `Command` enum; the
// Monitor's processor task routes each variant to the vmrest call and
// forces a collection refresh where the mutation changes what the poller
// would see. Power transitions deliberately do NOT ride this channel:
// their optimistic override must be installed before the dispatching
// call first suspends, so `Monitor::set_power` is a direct method.

use crate::error::CoreError;
use crate::model::{HostNetwork, NicAttachment, SharedFolderEntry, Vm, VmDetail, VmId};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All non-power write operations against the vmrest daemon.
#[derive(Debug, Clone)]
pub enum Command {
    // ── VM lifecycle ─────────────────────────────────────────────────
    DeleteVm {
        id: VmId,
    },
    UpdateVm {
        id: VmId,
        processors: Option<u32>,
        memory_mb: Option<u64>,
    },
    CloneVm {
        name: String,
        parent: VmId,
    },
    RegisterVm {
        name: String,
        path: String,
    },

    // ── NIC devices ──────────────────────────────────────────────────
    CreateNic {
        id: VmId,
        nic_type: String,
        vmnet: String,
    },
    UpdateNic {
        id: VmId,
        index: u32,
        nic_type: String,
        vmnet: String,
    },
    DeleteNic {
        id: VmId,
        index: u32,
    },

    // ── Shared folders ───────────────────────────────────────────────
    CreateSharedFolder {
        id: VmId,
        folder_id: String,
        host_path: String,
        flags: i32,
    },
    UpdateSharedFolder {
        id: VmId,
        folder_id: String,
        host_path: String,
        flags: i32,
    },
    DeleteSharedFolder {
        id: VmId,
        folder_id: String,
    },

    // ── Host networks ────────────────────────────────────────────────
    CreateNetwork {
        name: String,
        net_type: String,
    },
    SetPortForward {
        vmnet: String,
        protocol: String,
        port: u16,
        guest_ip: String,
        guest_port: u16,
        desc: Option<String>,
    },
    DeletePortForward {
        vmnet: String,
        protocol: String,
        port: u16,
    },
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    VmUpdated(VmDetail),
    VmRegistered(Vm),
    Nic(NicAttachment),
    SharedFolders(Vec<SharedFolderEntry>),
    Network(HostNetwork),
}
