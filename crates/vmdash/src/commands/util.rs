//! Shared helpers for command handlers.

use vmdash_core::{Monitor, VmId};

use crate::error::CliError;

/// Resolve a VM identifier (id, display name, or path) to a VmId via
/// snapshot lookup.
pub fn resolve_vm(monitor: &Monitor, identifier: &str) -> Result<VmId, CliError> {
    let rows = monitor.snapshot();
    for row in &rows {
        if row.vm.id.as_str() == identifier
            || row.vm.name() == identifier
            || row.vm.path == identifier
        {
            return Ok(row.vm.id.clone());
        }
    }
    Err(CliError::NotFound {
        resource_type: "VM".into(),
        identifier: identifier.into(),
        list_command: "vms list".into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
