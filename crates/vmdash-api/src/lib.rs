// vmdash-api: Async Rust client for the VMware Workstation/Fusion vmrest API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

mod folders;
mod guest;
mod networks;
mod nics;
mod power;
mod vms;

pub use client::{BasicAuth, VmRestClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
