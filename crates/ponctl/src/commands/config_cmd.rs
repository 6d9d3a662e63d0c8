//! Config file management.

use std::fs;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { host, name } => {
            let path = config::config_path();
            if path.exists() && !global.yes {
                return Err(CliError::Validation {
                    reason: format!(
                        "config file {} already exists (pass --yes to overwrite)",
                        path.display()
                    ),
                });
            }
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let starter = config::starter_config(&name, &host);
            let rendered = toml::to_string_pretty(&starter).map_err(|e| CliError::Validation {
                reason: format!("could not render config: {e}"),
            })?;
            fs::write(&path, rendered)?;
            if !global.quiet {
                eprintln!("Wrote {}", path.display());
                eprintln!("The starter profile uses the factory session cookie; replace it after hardening the OLT.");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            // Never print cookie material.
            for profile in cfg.profiles.values_mut() {
                if profile.cookie.is_some() {
                    profile.cookie = Some("(redacted)".to_owned());
                }
            }
            let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                reason: format!("could not render config: {e}"),
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
