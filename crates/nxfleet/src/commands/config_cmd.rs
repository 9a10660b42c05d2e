//! Config subcommand handlers. None of these contact a device.

use nxfleet_config::{Device, store_password};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let text = toml::to_string_pretty(&cfg.redacted())
                .map_err(|e| CliError::Render(e.to_string()))?;
            eprintln!("# {}", path.display());
            output::print_lines(&[text]);
        }

        ConfigCommand::Path => {
            output::print_lines(&[path.display().to_string()]);
        }

        ConfigCommand::AddDevice {
            name,
            address,
            device_username,
        } => {
            if name.is_empty() || name.contains(char::is_whitespace) {
                let reason = format!("'{name}' is not a device name");
                return Err(CliError::validation("name", reason));
            }
            let mut cfg = config::load_for_edit(global)?;
            let replaced = cfg
                .devices
                .insert(
                    name.clone(),
                    Device {
                        address,
                        username: device_username,
                        password: None,
                    },
                )
                .is_some();
            config::save(&cfg, global)?;
            let verb = if replaced { "updated" } else { "added" };
            eprintln!("{verb} {name} in {}", path.display());
        }

        ConfigCommand::RemoveDevice { name } => {
            let mut cfg = config::load_for_edit(global)?;
            if cfg.devices.remove(&name).is_none() {
                let reason = format!("'{name}' is not in the inventory");
                return Err(CliError::validation("name", reason));
            }
            config::save(&cfg, global)?;
            eprintln!("removed {name} from {}", path.display());
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let username = cfg.default_username.ok_or_else(|| {
                CliError::validation("username", "pass --username or set default_username")
            })?;
            let password = rpassword::prompt_password(format!("Password for {username}: "))
                .map_err(CliError::Prompt)?;
            if password.is_empty() {
                return Err(CliError::validation("password", "cannot be empty"));
            }
            store_password(&username, &password)?;
            eprintln!("password for {username} stored in the system keyring");
        }
    }
    Ok(())
}
