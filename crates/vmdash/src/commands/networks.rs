//! Host virtual-network command handlers.

use tabled::Tabled;

use vmdash_core::{Command as CoreCommand, CommandResult, HostNetwork, Monitor};

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    net_type: String,
    #[tabled(rename = "DHCP")]
    dhcp: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Mask")]
    mask: String,
}

impl From<&HostNetwork> for NetworkRow {
    fn from(n: &HostNetwork) -> Self {
        Self {
            name: n.name.clone(),
            net_type: n.net_type.clone(),
            dhcp: if n.dhcp { "yes".into() } else { "no".into() },
            subnet: n.subnet.clone().unwrap_or_else(|| "—".into()),
            mask: n.mask.clone().unwrap_or_else(|| "—".into()),
        }
    }
}

pub async fn handle(
    monitor: &Monitor,
    args: NetworksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List => {
            let networks = monitor.list_networks().await?;
            let out = output::render_list(&global.output, &networks, |n| NetworkRow::from(n), |n| {
                n.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Create { name, net_type } => {
            let result = monitor
                .execute(CoreCommand::CreateNetwork { name, net_type })
                .await?;
            if let CommandResult::Network(net) = result {
                if !global.quiet {
                    eprintln!("Network '{}' created", net.name);
                }
            }
            Ok(())
        }
    }
}
