//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use vmdash_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to vmrest at {url}")]
    #[diagnostic(
        code(vmdash::connection_failed),
        help(
            "Check that the daemon is running (`vmrest` on the host) and accessible.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(vmdash::auth_failed),
        help(
            "Verify your credentials (vmrest -C configures the pair).\n\
             Set VMREST_USERNAME and VMREST_PASSWORD, or run: vmdash config init"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(vmdash::no_credentials),
        help(
            "Configure credentials with: vmdash config init\n\
             Or set VMREST_USERNAME / VMREST_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(vmdash::not_found),
        help("Run: vmdash {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("vmrest error: {message}")]
    #[diagnostic(code(vmdash::api_error))]
    ApiError {
        message: String,
        code: Option<i64>,
    },

    #[error("Operation not allowed in current VM state: {message}")]
    #[diagnostic(
        code(vmdash::invalid_state),
        help("The VM is transitioning; retry once it settles.")
    )]
    InvalidState { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vmdash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vmdash::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vmdash config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(vmdash::no_config),
        help(
            "Create one with: vmdash config init\n\
             Expected at: {path}\n\
             Or pass the daemon URL with --host."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(vmdash::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(vmdash::timeout),
        help("Increase timeout with --timeout or check daemon responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(vmdash::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::InvalidState { .. } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Disconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                source: "Monitor connection was lost".into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::VmNotFound { identifier } => CliError::NotFound {
                resource_type: "VM".into(),
                identifier,
                list_command: "vms list".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            // Power-state conflicts are normally intercepted by the
            // power handler as advice; anything that escapes here still
            // renders with the same wording.
            CoreError::InvalidPowerTransition { message } => CliError::InvalidState { message },

            CoreError::Rejected { message } => CliError::ApiError {
                message,
                code: None,
            },

            CoreError::Api {
                message,
                code,
                status: _,
            } => CliError::ApiError { message, code },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                message,
                code: None,
            },
        }
    }
}

impl From<vmdash_config::ConfigError> for CliError {
    fn from(err: vmdash_config::ConfigError) -> Self {
        match err {
            vmdash_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            vmdash_config::ConfigError::NoCredentials { profile } => {
                CliError::NoCredentials { profile }
            }
            vmdash_config::ConfigError::Figment(e) => CliError::Config(e),
            vmdash_config::ConfigError::Io(e) => CliError::Io(e),
            vmdash_config::ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
        }
    }
}
