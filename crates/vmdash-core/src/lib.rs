// vmdash-core: Reactive sync engine between vmdash-api and consumers.
//
// The Monitor polls the vmrest daemon on a fixed cadence, the DataStore
// holds the last-known server truth, the OverrideStore holds short-lived
// optimistic power states for in-flight commands, and the projection
// merges the two into what consumers display.

pub mod command;
pub mod config;
pub mod error;
pub mod ip;
pub mod model;
pub mod monitor;
pub mod projection;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{BasicCredentials, IpErrorCodes, MonitorConfig, TlsVerification};
pub use error::CoreError;
pub use monitor::{ConnectionState, Monitor};
pub use projection::{VmSnapshot, display_power, project};
pub use store::{DataStore, OverrideStore, PollSnapshot};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Identity and entities
    Vm, VmDetail, VmId,
    // Power
    DisplayPowerState, PowerOperation, PowerState, TransientPowerState,
    // Guest IP
    IpFailure, IpResolution,
    // Stateless host resources
    HostNetwork, NicAttachment, PortForwardRule, SharedFolderEntry,
};
