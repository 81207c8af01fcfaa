// ── Guest IP resolution outcomes ──

use serde::Serialize;

/// Why an IP could not be shown. Labels are what the dashboard renders
/// in the IP column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IpFailure {
    /// Guest is powered off (vmrest application code for it).
    PoweredOff,
    /// Guest is up but has not acquired an address.
    NoAddress,
    /// Anything else: transport failure, unexpected error body.
    Unknown,
}

impl IpFailure {
    pub fn label(self) -> &'static str {
        match self {
            Self::PoweredOff => "VM Off",
            Self::NoAddress => "No IP",
            Self::Unknown => "—",
        }
    }
}

/// Outcome of one run of the IP resolution chain for one VM.
///
/// Produced fresh every poll cycle -- addresses are DHCP-assigned and
/// time-varying, so failures are never cached across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IpResolution {
    /// An address, mask suffix already stripped.
    Resolved(String),
    /// A classified failure with an optional daemon message for tooltips.
    Unavailable {
        reason: IpFailure,
        detail: Option<String>,
    },
    /// Indeterminate -- no data yet, not an error. Shown as a plain
    /// placeholder and retried next cycle.
    Pending,
}

impl IpResolution {
    pub fn ip(&self) -> Option<&str> {
        match self {
            Self::Resolved(ip) => Some(ip),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}
