//! Power command handlers.
//!
//! Transitions are dispatched through the core's optimistic path. A 409
//! ("not allowed in current state") is advice, not a failure: it prints
//! and exits cleanly, matching how the dashboard reports it.

use vmdash_core::{CoreError, Monitor, PowerOperation};

use crate::cli::{GlobalOpts, PowerArgs, PowerCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    monitor: &Monitor,
    args: PowerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (vm, operation) = match args.command {
        PowerCommand::Get { vm } => {
            let id = util::resolve_vm(monitor, &vm)?;
            let rows = monitor.snapshot();
            let row = rows.iter().find(|r| r.vm.id == id);
            let label = row.map_or("Off", |r| r.power.label());
            output::print_output(label, global.quiet);
            return Ok(());
        }
        PowerCommand::On { vm } => (vm, PowerOperation::On),
        PowerCommand::Off { vm } => (vm, PowerOperation::Off),
        PowerCommand::Shutdown { vm } => (vm, PowerOperation::Shutdown),
        PowerCommand::Suspend { vm } => (vm, PowerOperation::Suspend),
        PowerCommand::Pause { vm } => (vm, PowerOperation::Pause),
        PowerCommand::Unpause { vm } => (vm, PowerOperation::Unpause),
    };

    let id = util::resolve_vm(monitor, &vm)?;

    match monitor.set_power(&id, operation).await {
        Ok(()) => {
            if !global.quiet {
                eprintln!("Power state change requested ({operation})");
            }
            Ok(())
        }
        Err(CoreError::InvalidPowerTransition { message }) => {
            if !global.quiet {
                eprintln!("Operation not allowed in current VM state: {message}");
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
