//! Configuration command handlers. These never touch the daemon.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            host,
            username,
            profile,
        } => {
            let mut cfg = config::load_config_or_default();
            let entry = cfg.profiles.entry(profile.clone()).or_default();
            entry.host = host;
            entry.username = username;
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile.clone());
            }
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!(
                    "Profile '{profile}' written to {}",
                    config::config_path().display()
                );
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            })?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
