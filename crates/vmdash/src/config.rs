//! CLI configuration — thin wrapper around `vmdash_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --username, etc.).

use std::time::Duration;

use secrecy::SecretString;

use vmdash_core::{BasicCredentials, MonitorConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use vmdash_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `MonitorConfig` from the config file, profile, and CLI
/// overrides. Falls back to flags/env alone when no profile matches.
pub fn build_monitor_config(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone.
    let url_str = global.host.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "host".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    Ok(MonitorConfig {
        url,
        auth: flag_credentials(global),
        tls: tls_from_flags(global, None),
        timeout: Duration::from_secs(global.timeout),
        ..MonitorConfig::default()
    })
}

/// Translate a `Profile` + global flags into a `MonitorConfig`.
///
/// CLI flag overrides take priority over profile values.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<MonitorConfig, CliError> {
    // 1. Daemon URL (flag > env > profile)
    let url_str = global.host.as_deref().unwrap_or(&profile.host);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "host".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials (CLI flag overrides take priority)
    let auth = match flag_credentials(global) {
        Some(creds) => Some(creds),
        None => vmdash_config::resolve_credentials(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = tls_from_flags(global, Some(profile));

    Ok(MonitorConfig {
        url,
        auth,
        tls,
        timeout: Duration::from_secs(global.timeout),
        ..MonitorConfig::default()
    })
}

/// Credentials from the --username flag plus the VMREST_PASSWORD env
/// var. `None` when no username was given.
fn flag_credentials(global: &GlobalOpts) -> Option<BasicCredentials> {
    let username = global.username.clone()?;
    let password = std::env::var("VMREST_PASSWORD").unwrap_or_default();
    Some(BasicCredentials {
        username,
        password: SecretString::from(password),
    })
}

fn tls_from_flags(global: &GlobalOpts, profile: Option<&Profile>) -> TlsVerification {
    if global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsVerification::CustomCa(ca_path)
    } else {
        TlsVerification::SystemDefaults
    }
}
