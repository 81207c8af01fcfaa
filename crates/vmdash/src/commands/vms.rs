//! VM command handlers: the dashboard table plus lifecycle operations.

use tabled::Tabled;

use vmdash_core::{Command as CoreCommand, CommandResult, IpResolution, Monitor, VmSnapshot};

use crate::cli::{GlobalOpts, VmsArgs, VmsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct VmRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
}

impl From<&VmSnapshot> for VmRow {
    fn from(s: &VmSnapshot) -> Self {
        Self {
            name: s.vm.name().to_owned(),
            id: s.vm.id.to_string(),
            state: s.power.label().to_owned(),
            ip: ip_cell(s.ip.as_ref()),
            cpu: s
                .detail
                .and_then(|d| d.processors)
                .map_or_else(|| "—".into(), |n| n.to_string()),
            memory: s
                .detail
                .and_then(|d| d.memory_mb)
                .map_or_else(|| "—".into(), |mb| format!("{mb} MB")),
        }
    }
}

/// The IP column: an address, a failure label, or a placeholder while
/// resolution is still indeterminate.
fn ip_cell(ip: Option<&IpResolution>) -> String {
    match ip {
        Some(IpResolution::Resolved(addr)) => addr.clone(),
        Some(IpResolution::Unavailable { reason, .. }) => reason.label().to_owned(),
        Some(IpResolution::Pending) | None => "—".into(),
    }
}

fn detail(s: &VmSnapshot) -> String {
    let mut lines = vec![
        format!("Name:   {}", s.vm.name()),
        format!("ID:     {}", s.vm.id),
        format!("Path:   {}", s.vm.path),
        format!("State:  {}", s.power.label()),
    ];
    match s.ip.as_ref() {
        Some(IpResolution::Resolved(addr)) => lines.push(format!("IP:     {addr}")),
        Some(IpResolution::Unavailable { reason, detail }) => {
            let mut line = format!("IP:     {}", reason.label());
            if let Some(msg) = detail {
                line.push_str(&format!(" ({msg})"));
            }
            lines.push(line);
        }
        Some(IpResolution::Pending) | None => lines.push("IP:     —".into()),
    }
    if let Some(d) = s.detail {
        if let Some(cpus) = d.processors {
            lines.push(format!("CPU:    {cpus}"));
        }
        if let Some(mb) = d.memory_mb {
            lines.push(format!("Memory: {mb} MB"));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    args: VmsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VmsCommand::List => {
            let rows = monitor.snapshot();
            let out = output::render_list(
                &global.output,
                &rows,
                |r| VmRow::from(r),
                |r| r.vm.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VmsCommand::Get { vm } => {
            let id = util::resolve_vm(monitor, &vm)?;
            let rows = monitor.snapshot();
            let snap = rows
                .iter()
                .find(|r| r.vm.id == id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "VM".into(),
                    identifier: vm,
                    list_command: "vms list".into(),
                })?;
            let out = output::render_single(&global.output, snap, detail, |s| s.vm.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VmsCommand::Delete { vm } => {
            let id = util::resolve_vm(monitor, &vm)?;
            if !util::confirm(
                &format!("Delete VM '{vm}'? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }
            monitor.execute(CoreCommand::DeleteVm { id }).await?;
            if !global.quiet {
                eprintln!("VM deleted");
            }
            Ok(())
        }

        VmsCommand::Clone { parent, name } => {
            let parent = util::resolve_vm(monitor, &parent)?;
            monitor.execute(CoreCommand::CloneVm { name, parent }).await?;
            if !global.quiet {
                eprintln!("VM cloned");
            }
            Ok(())
        }

        VmsCommand::Register { name, path } => {
            let result = monitor
                .execute(CoreCommand::RegisterVm { name, path })
                .await?;
            if let CommandResult::VmRegistered(vm) = result {
                if !global.quiet {
                    eprintln!("VM registered: {}", vm.id);
                }
            }
            Ok(())
        }

        VmsCommand::Update {
            vm,
            processors,
            memory,
        } => {
            let id = util::resolve_vm(monitor, &vm)?;
            monitor
                .execute(CoreCommand::UpdateVm {
                    id,
                    processors,
                    memory_mb: memory,
                })
                .await?;
            if !global.quiet {
                eprintln!("VM settings updated");
            }
            Ok(())
        }

        VmsCommand::Restrictions { vm } => {
            let id = util::resolve_vm(monitor, &vm)?;
            let flags = monitor.get_restrictions(&id).await?;
            let out = output::render_single(
                &global.output,
                &flags,
                |v| output::render_json_pretty(v),
                |_| id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
