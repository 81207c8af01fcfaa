//! NIC command handlers.

use tabled::Tabled;

use vmdash_core::{Command as CoreCommand, CommandResult, Monitor, NicAttachment};

use crate::cli::{GlobalOpts, NicArgs, NicCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NicRow {
    #[tabled(rename = "Index")]
    index: u32,
    #[tabled(rename = "Type")]
    nic_type: String,
    #[tabled(rename = "Network")]
    vmnet: String,
    #[tabled(rename = "MAC")]
    mac: String,
}

impl From<&NicAttachment> for NicRow {
    fn from(n: &NicAttachment) -> Self {
        Self {
            index: n.index,
            nic_type: n.nic_type.clone(),
            vmnet: n.vmnet.clone(),
            mac: n.mac_address.clone(),
        }
    }
}

pub async fn handle(monitor: &Monitor, args: NicArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        NicCommand::List { vm } => {
            let id = util::resolve_vm(monitor, &vm)?;
            let nics = monitor.list_nics(&id).await?;
            let out = output::render_list(&global.output, &nics, |n| NicRow::from(n), |n| {
                n.index.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NicCommand::Add { vm, nic_type, vmnet } => {
            let id = util::resolve_vm(monitor, &vm)?;
            let result = monitor
                .execute(CoreCommand::CreateNic { id, nic_type, vmnet })
                .await?;
            if let CommandResult::Nic(nic) = result {
                if !global.quiet {
                    eprintln!("NIC {} attached ({})", nic.index, nic.mac_address);
                }
            }
            Ok(())
        }

        NicCommand::Update {
            vm,
            index,
            nic_type,
            vmnet,
        } => {
            let id = util::resolve_vm(monitor, &vm)?;
            monitor
                .execute(CoreCommand::UpdateNic {
                    id,
                    index,
                    nic_type,
                    vmnet,
                })
                .await?;
            if !global.quiet {
                eprintln!("NIC {index} updated");
            }
            Ok(())
        }

        NicCommand::Delete { vm, index } => {
            let id = util::resolve_vm(monitor, &vm)?;
            if !util::confirm(&format!("Detach NIC {index} from '{vm}'?"), global.yes)? {
                return Ok(());
            }
            monitor
                .execute(CoreCommand::DeleteNic { id, index })
                .await?;
            if !global.quiet {
                eprintln!("NIC {index} detached");
            }
            Ok(())
        }
    }
}
