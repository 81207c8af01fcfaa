// ── Runtime connection configuration ──
//
// These types describe *how* to reach a vmrest daemon and how the sync
// engine paces itself. They carry credential data and tuning, but never
// touch disk. The CLI constructs a `MonitorConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// HTTP Basic credentials for the vmrest daemon.
///
/// vmrest has exactly one auth scheme (`vmrest -C` sets it up), so this
/// is a struct rather than an enum of strategies.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict). Default: vmrest is usually plain HTTP
    /// on loopback, and anything fronted by a real proxy has real certs.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults)
            | (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Application error codes and statuses the IP resolution chain gives
/// semantic meaning to.
///
/// The values are vmrest's observed contract, not documented constants,
/// so they are configuration rather than hard-coded literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpErrorCodes {
    /// Guest is not powered on.
    pub powered_off: i64,
    /// Guest is up but has no address yet.
    pub no_ip: i64,
    /// HTTP status meaning "busy/transitioning, ask again later".
    pub conflict_status: u16,
}

impl Default for IpErrorCodes {
    fn default() -> Self {
        Self {
            powered_off: 106,
            no_ip: 118,
            conflict_status: 409,
        }
    }
}

/// Configuration for one vmrest daemon connection.
///
/// Built by the CLI, passed to `Monitor` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Daemon URL (e.g. `http://127.0.0.1:8697`).
    pub url: Url,
    /// Basic auth credentials, or `None` for an unauthenticated daemon.
    pub auth: Option<BasicCredentials>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Cadence of the full poll cycle (collection + power + IP).
    /// Zero disables the background poller.
    pub poll_interval: Duration,
    /// How long an optimistic power override may shadow server truth
    /// before it is dropped and the next poll is trusted.
    pub override_timeout: Duration,
    /// Semantic error codes for IP resolution.
    pub ip_error_codes: IpErrorCodes,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8697".parse().expect("static URL"),
            auth: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
            override_timeout: Duration::from_secs(10),
            ip_error_codes: IpErrorCodes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The pacing constants are contractual: consumers size their
    // expectations (and the override lifecycle) around them.
    #[test]
    fn default_pacing_contract() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.override_timeout, Duration::from_secs(10));
    }

    #[test]
    fn default_ip_error_codes() {
        let codes = IpErrorCodes::default();
        assert_eq!(codes.powered_off, 106);
        assert_eq!(codes.no_ip, 118);
        assert_eq!(codes.conflict_status, 409);
    }
}
