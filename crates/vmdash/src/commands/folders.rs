//! Shared-folder command handlers.

use tabled::Tabled;

use vmdash_core::{Command as CoreCommand, Monitor, SharedFolderEntry};

use crate::cli::{FoldersArgs, FoldersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "ID")]
    folder_id: String,
    #[tabled(rename = "Host Path")]
    host_path: String,
    #[tabled(rename = "Flags")]
    flags: i32,
}

impl From<&SharedFolderEntry> for FolderRow {
    fn from(f: &SharedFolderEntry) -> Self {
        Self {
            folder_id: f.folder_id.clone(),
            host_path: f.host_path.clone(),
            flags: f.flags,
        }
    }
}

pub async fn handle(
    monitor: &Monitor,
    args: FoldersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FoldersCommand::List { vm } => {
            let id = util::resolve_vm(monitor, &vm)?;
            let folders = monitor.list_shared_folders(&id).await?;
            let out = output::render_list(&global.output, &folders, |f| FolderRow::from(f), |f| {
                f.folder_id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FoldersCommand::Add {
            vm,
            folder_id,
            host_path,
            flags,
        } => {
            let id = util::resolve_vm(monitor, &vm)?;
            monitor
                .execute(CoreCommand::CreateSharedFolder {
                    id,
                    folder_id: folder_id.clone(),
                    host_path,
                    flags,
                })
                .await?;
            if !global.quiet {
                eprintln!("Shared folder '{folder_id}' mounted");
            }
            Ok(())
        }

        FoldersCommand::Update {
            vm,
            folder_id,
            host_path,
            flags,
        } => {
            let id = util::resolve_vm(monitor, &vm)?;
            monitor
                .execute(CoreCommand::UpdateSharedFolder {
                    id,
                    folder_id: folder_id.clone(),
                    host_path,
                    flags,
                })
                .await?;
            if !global.quiet {
                eprintln!("Shared folder '{folder_id}' updated");
            }
            Ok(())
        }

        FoldersCommand::Delete { vm, folder_id } => {
            let id = util::resolve_vm(monitor, &vm)?;
            if !util::confirm(
                &format!("Remove shared folder '{folder_id}' from '{vm}'?"),
                global.yes,
            )? {
                return Ok(());
            }
            monitor
                .execute(CoreCommand::DeleteSharedFolder { id, folder_id })
                .await?;
            if !global.quiet {
                eprintln!("Shared folder removed");
            }
            Ok(())
        }
    }
}
