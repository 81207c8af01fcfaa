// ── Guest IP resolution fallback chain ──
//
// Runs once per VM per poll cycle. Primary lookup is the guest-tools
// address endpoint; when that produces no classifiable answer, the
// per-NIC list is scanned. Nothing here is cached: addresses are DHCP
// assigned and time-varying, so every cycle starts from scratch.

use tracing::debug;

use vmdash_api::{Error, VmRestClient};

use crate::config::IpErrorCodes;
use crate::model::{IpFailure, IpResolution, VmId};

/// Resolve the display address for one VM.
///
/// Step 1: `GET /vms/{id}/ip`.
///   - non-empty address → resolved
///   - application code `powered_off` / `no_ip` → classified failure,
///     daemon message kept for the tooltip
///   - HTTP `conflict_status` → pending (busy/transitioning; not an
///     error, retried next cycle)
///   - other classifiable failure → "—" with the message
/// Step 2 (only when step 1 yielded nothing classifiable): scan
/// `GET /vms/{id}/nicips` in daemon order, first NIC exposing a
/// non-empty `ip` or `ipAddress` list wins; `/prefix` suffix stripped.
/// Step 3: pending.
pub async fn resolve_ip(client: &VmRestClient, codes: &IpErrorCodes, id: &VmId) -> IpResolution {
    match client.get_ip(id.as_str()).await {
        Ok(resp) => {
            if let Some(ip) = resp.ip.filter(|ip| !ip.is_empty()) {
                return IpResolution::Resolved(ip);
            }
            // Primary answered without an address: fall through to the
            // NIC scan.
        }
        Err(err) => {
            if let Some(code) = err.api_code() {
                if code == codes.powered_off {
                    return IpResolution::Unavailable {
                        reason: IpFailure::PoweredOff,
                        detail: failure_detail(&err),
                    };
                }
                if code == codes.no_ip {
                    return IpResolution::Unavailable {
                        reason: IpFailure::NoAddress,
                        detail: failure_detail(&err),
                    };
                }
            }
            if err.status() == Some(codes.conflict_status) {
                return IpResolution::Pending;
            }
            if !matches!(err, Error::Deserialization { .. }) {
                return IpResolution::Unavailable {
                    reason: IpFailure::Unknown,
                    detail: failure_detail(&err),
                };
            }
            // Undecodable primary response: treat like "no answer" and
            // try the NIC list.
        }
    }

    match client.get_nic_ips(id.as_str()).await {
        Ok(resp) => {
            if let Some(nics) = resp.nics {
                for nic in nics.iter() {
                    let first = nic
                        .ip
                        .as_deref()
                        .and_then(<[String]>::first)
                        .or_else(|| nic.ip_address.as_deref().and_then(<[String]>::first));
                    if let Some(addr) = first {
                        return IpResolution::Resolved(strip_mask_suffix(addr));
                    }
                }
            }
        }
        Err(err) => {
            debug!(vm = %id, error = %err, "nicips fallback failed");
        }
    }

    IpResolution::Pending
}

/// Drop a trailing `/prefix` network-mask suffix: `10.0.0.5/24` → `10.0.0.5`.
fn strip_mask_suffix(addr: &str) -> String {
    addr.split('/').next().unwrap_or(addr).to_owned()
}

/// The daemon message for tooltips -- the bare message, not the full
/// error rendering.
fn failure_detail(err: &Error) -> Option<String> {
    match err {
        Error::Api { message, .. } => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn strips_mask_suffix() {
        assert_eq!(strip_mask_suffix("10.0.0.5/24"), "10.0.0.5");
        assert_eq!(strip_mask_suffix("192.168.1.9"), "192.168.1.9");
        assert_eq!(strip_mask_suffix("fe80::1/64"), "fe80::1");
    }
}
