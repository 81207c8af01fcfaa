//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod folders;
pub mod networks;
pub mod nic;
pub mod portforward;
pub mod power;
pub mod util;
pub mod vms;
pub mod watch;

use vmdash_core::Monitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a daemon-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    monitor: &Monitor,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Vms(args) => vms::handle(monitor, args, global).await,
        Command::Power(args) => power::handle(monitor, args, global).await,
        Command::Watch(args) => watch::handle(monitor, args, global).await,
        Command::Nic(args) => nic::handle(monitor, args, global).await,
        Command::Folders(args) => folders::handle(monitor, args, global).await,
        Command::Networks(args) => networks::handle(monitor, args, global).await,
        Command::Portforward(args) => portforward::handle(monitor, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
