//! Port-forward command handlers.

use tabled::Tabled;

use vmdash_core::{Command as CoreCommand, Monitor, PortForwardRule};

use crate::cli::{GlobalOpts, PortforwardArgs, PortforwardCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Proto")]
    protocol: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Description")]
    desc: String,
}

impl From<&PortForwardRule> for RuleRow {
    fn from(r: &PortForwardRule) -> Self {
        Self {
            protocol: r.protocol.clone(),
            port: r.port,
            guest: format!("{}:{}", r.guest_ip, r.guest_port),
            desc: r.desc.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    monitor: &Monitor,
    args: PortforwardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PortforwardCommand::List { vmnet } => {
            let rules = monitor.list_port_forwards(&vmnet).await?;
            let out = output::render_list(&global.output, &rules, |r| RuleRow::from(r), |r| {
                format!("{}/{}", r.protocol, r.port)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortforwardCommand::Set {
            vmnet,
            protocol,
            port,
            guest_ip,
            guest_port,
            desc,
        } => {
            monitor
                .execute(CoreCommand::SetPortForward {
                    vmnet,
                    protocol: protocol.clone(),
                    port,
                    guest_ip,
                    guest_port,
                    desc,
                })
                .await?;
            if !global.quiet {
                eprintln!("Port forward {protocol}/{port} saved");
            }
            Ok(())
        }

        PortforwardCommand::Delete {
            vmnet,
            protocol,
            port,
        } => {
            if !util::confirm(
                &format!("Delete port forward {protocol}/{port} on {vmnet}?"),
                global.yes,
            )? {
                return Ok(());
            }
            monitor
                .execute(CoreCommand::DeletePortForward {
                    vmnet,
                    protocol: protocol.clone(),
                    port,
                })
                .await?;
            if !global.quiet {
                eprintln!("Port forward {protocol}/{port} deleted");
            }
            Ok(())
        }
    }
}
