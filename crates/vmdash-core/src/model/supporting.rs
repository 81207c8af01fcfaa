// ── Stateless host resources ──
//
// NICs, shared folders, virtual networks, and port-forward rules are
// plain request/response data: fetched on demand, never cached by the
// poller. Domain mirrors of the wire types live here.

use serde::Serialize;

use vmdash_api::types::{NicDevice, PortForward, SharedFolder, VirtualNetwork};

/// A NIC attached to a VM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NicAttachment {
    pub index: u32,
    pub nic_type: String,
    pub vmnet: String,
    pub mac_address: String,
}

impl From<NicDevice> for NicAttachment {
    fn from(raw: NicDevice) -> Self {
        Self {
            index: raw.index,
            nic_type: raw.nic_type,
            vmnet: raw.vmnet,
            mac_address: raw.mac_address,
        }
    }
}

/// A host directory shared into a guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedFolderEntry {
    pub folder_id: String,
    pub host_path: String,
    pub flags: i32,
}

impl From<SharedFolder> for SharedFolderEntry {
    fn from(raw: SharedFolder) -> Self {
        Self {
            folder_id: raw.folder_id,
            host_path: raw.host_path,
            flags: raw.flags,
        }
    }
}

/// A host virtual network (vmnet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostNetwork {
    pub name: String,
    pub net_type: String,
    pub dhcp: bool,
    pub subnet: Option<String>,
    pub mask: Option<String>,
}

impl From<VirtualNetwork> for HostNetwork {
    fn from(raw: VirtualNetwork) -> Self {
        Self {
            name: raw.name,
            net_type: raw.net_type,
            dhcp: matches!(raw.dhcp.as_deref(), Some("true")),
            subnet: raw.subnet,
            mask: raw.mask,
        }
    }
}

/// A port-forward rule, keyed by (network, protocol, port).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortForwardRule {
    pub protocol: String,
    pub port: u16,
    pub guest_ip: String,
    pub guest_port: u16,
    pub desc: Option<String>,
}

impl From<PortForward> for PortForwardRule {
    fn from(raw: PortForward) -> Self {
        Self {
            protocol: raw.protocol,
            port: raw.port,
            guest_ip: raw.guest.ip,
            guest_port: raw.guest.port,
            desc: raw.desc,
        }
    }
}
