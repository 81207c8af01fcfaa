// Wire types for the vmrest API.
//
// These mirror what the daemon actually sends, quirks included: several
// fields arrive in more than one shape depending on product version, so
// untagged enums absorb the variation here rather than in consumers.

use serde::{Deserialize, Serialize};

// ── VM collection ───────────────────────────────────────────────────

/// One entry of `GET /vms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmSummary {
    pub id: String,
    pub path: String,
}

/// CPU info from `GET /vms/{id}`. Newer daemons send `{"processors": n}`,
/// older ones a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CpuInfo {
    Detailed { processors: u32 },
    Count(u32),
}

impl CpuInfo {
    pub fn processors(self) -> u32 {
        match self {
            Self::Detailed { processors } => processors,
            Self::Count(n) => n,
        }
    }
}

/// Memory info from `GET /vms/{id}`. Either `{"size": mb}` or a bare
/// megabyte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryInfo {
    Detailed { size: u64 },
    Megabytes(u64),
}

impl MemoryInfo {
    pub fn megabytes(self) -> u64 {
        match self {
            Self::Detailed { size } => size,
            Self::Megabytes(n) => n,
        }
    }
}

/// Full VM record from `GET /vms/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmInformation {
    pub id: String,
    #[serde(default)]
    pub cpu: Option<CpuInfo>,
    #[serde(default)]
    pub memory: Option<MemoryInfo>,
}

/// Body for `PUT /vms/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VmUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processors: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
}

/// Body for `POST /vms` (clone from a parent VM).
#[derive(Debug, Clone, Serialize)]
pub struct CloneParams {
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
}

/// Body for `POST /vms/registration`.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationParams {
    pub name: String,
    pub path: String,
}

// ── Power ───────────────────────────────────────────────────────────

/// `GET/PUT /vms/{id}/power` response. The state string is kept raw here;
/// vmdash-core owns the typed enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerStateBody {
    pub power_state: String,
}

// ── Guest networking ────────────────────────────────────────────────

/// `GET /vms/{id}/ip` response.
#[derive(Debug, Clone, Deserialize)]
pub struct IpResponse {
    #[serde(default)]
    pub ip: Option<String>,
}

/// One NIC entry of `GET /vms/{id}/nicips`. Address lists show up under
/// `ip` or `ipAddress` depending on guest-tools version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NicIpInfo {
    #[serde(default, rename = "macAddress")]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub ip: Option<Vec<String>>,
    #[serde(default, rename = "ipAddress")]
    pub ip_address: Option<Vec<String>>,
}

/// The `nics` field arrives as an array or, on some daemons, a single
/// bare object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NicIpList {
    Many(Vec<NicIpInfo>),
    One(NicIpInfo),
}

impl NicIpList {
    /// Iterate NICs in daemon order regardless of wire shape.
    pub fn iter(&self) -> impl Iterator<Item = &NicIpInfo> {
        match self {
            Self::Many(v) => v.iter(),
            Self::One(n) => std::slice::from_ref(n).iter(),
        }
    }
}

/// `GET /vms/{id}/nicips` response.
#[derive(Debug, Clone, Deserialize)]
pub struct NicIpsResponse {
    #[serde(default)]
    pub nics: Option<NicIpList>,
}

// ── NIC devices ─────────────────────────────────────────────────────

/// A configured NIC device (`GET /vms/{id}/nic`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicDevice {
    pub index: u32,
    #[serde(rename = "type")]
    pub nic_type: String,
    pub vmnet: String,
    #[serde(rename = "macAddress")]
    pub mac_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NicDevicesResponse {
    pub num: u32,
    #[serde(default)]
    pub nics: Vec<NicDevice>,
}

/// Body for NIC create/update.
#[derive(Debug, Clone, Serialize)]
pub struct NicParams {
    #[serde(rename = "type")]
    pub nic_type: String,
    pub vmnet: String,
}

// ── Shared folders ──────────────────────────────────────────────────

/// A shared folder mapping (`/vms/{id}/sharedfolders`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFolder {
    pub folder_id: String,
    pub host_path: String,
    pub flags: i32,
}

/// Body for shared-folder update (the id rides in the URL).
#[derive(Debug, Clone, Serialize)]
pub struct SharedFolderParams {
    pub host_path: String,
    pub flags: i32,
}

// ── Virtual networks ────────────────────────────────────────────────

/// A host virtual network (`GET /vmnet`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualNetwork {
    pub name: String,
    #[serde(rename = "type")]
    pub net_type: String,
    #[serde(default)]
    pub dhcp: Option<String>,
    #[serde(default)]
    pub subnet: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworksResponse {
    pub num: u32,
    #[serde(default)]
    pub vmnets: Vec<VirtualNetwork>,
}

/// Body for `POST /vmnets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNetworkParams {
    pub name: String,
    #[serde(rename = "type")]
    pub net_type: String,
}

// ── Port forwarding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestEndpoint {
    pub ip: String,
    pub port: u16,
}

/// One rule of `GET /vmnet/{net}/portforward`, keyed by
/// (network, protocol, port).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortForward {
    pub port: u16,
    pub protocol: String,
    #[serde(default)]
    pub desc: Option<String>,
    pub guest: GuestEndpoint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortForwardsResponse {
    pub num: u32,
    #[serde(default)]
    pub port_forwardings: Vec<PortForward>,
}

/// Body for `PUT /vmnet/{net}/portforward/{protocol}/{port}`.
#[derive(Debug, Clone, Serialize)]
pub struct PortForwardParams {
    #[serde(rename = "guestIp")]
    pub guest_ip: String,
    #[serde(rename = "guestPort")]
    pub guest_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

// ── Error envelope ──────────────────────────────────────────────────

/// Error body carried on non-2xx responses. Field capitalization varies
/// between daemon builds, so both spellings are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "Code")]
    pub code: Option<i64>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cpu_info_accepts_both_shapes() {
        let detailed: CpuInfo = serde_json::from_str(r#"{"processors": 4}"#).unwrap();
        assert_eq!(detailed.processors(), 4);

        let bare: CpuInfo = serde_json::from_str("2").unwrap();
        assert_eq!(bare.processors(), 2);
    }

    #[test]
    fn memory_info_accepts_both_shapes() {
        let detailed: MemoryInfo = serde_json::from_str(r#"{"size": 2048}"#).unwrap();
        assert_eq!(detailed.megabytes(), 2048);

        let bare: MemoryInfo = serde_json::from_str("4096").unwrap();
        assert_eq!(bare.megabytes(), 4096);
    }

    #[test]
    fn nic_list_accepts_single_object() {
        let resp: NicIpsResponse =
            serde_json::from_str(r#"{"nics": {"ip": ["10.0.0.5/24"]}}"#).unwrap();
        let nics = resp.nics.unwrap();
        let first = nics.iter().next().unwrap();
        assert_eq!(first.ip.as_ref().unwrap()[0], "10.0.0.5/24");
    }

    #[test]
    fn error_body_accepts_both_capitalizations() {
        let lower: ErrorBody =
            serde_json::from_str(r#"{"code": 106, "message": "powered off"}"#).unwrap();
        assert_eq!(lower.code, Some(106));

        let upper: ErrorBody =
            serde_json::from_str(r#"{"Code": 118, "Message": "no ip"}"#).unwrap();
        assert_eq!(upper.code, Some(118));
        assert_eq!(upper.message.as_deref(), Some("no ip"));
    }
}
