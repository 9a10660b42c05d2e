//! Run configuration: the TOML file and `NXFLEET_*` environment (via
//! `nxfleet-config`), then command-line overrides on top.

use std::path::PathBuf;

use nxfleet_api::CookiePolicy;
use nxfleet_config::{Config, ConfigCredentials, StaticInventory};
use nxfleet_core::Fleet;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub type ConfiguredFleet = Fleet<StaticInventory, ConfigCredentials>;

/// Config file this run reads and writes.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(nxfleet_config::config_path)
}

/// Load the config file and environment without applying flag overrides.
pub fn load_file(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    nxfleet_config::load_config_from(&path).map_err(|source| CliError::Config {
        source,
        path: path.display().to_string(),
    })
}

/// Load the file alone, for editing.
pub fn load_for_edit(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    nxfleet_config::read_config_file(&path).map_err(|source| CliError::Config {
        source,
        path: path.display().to_string(),
    })
}

/// Write `cfg` back to the file this run reads.
pub fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_path(global);
    nxfleet_config::save_config_to(cfg, &path).map_err(|source| CliError::Config {
        source,
        path: path.display().to_string(),
    })
}

/// Load the config file and apply global flags.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_file(global)?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref username) = global.username {
        cfg.default_username = Some(username.clone());
    }

    let defaults = &mut cfg.defaults;
    if let Some(timeout) = global.timeout {
        defaults.timeout = timeout;
    }
    if let Some(port) = global.port {
        defaults.port = port;
    }
    if global.verify_tls {
        defaults.verify_tls = true;
    }
    if global.no_cookies {
        defaults.cookie_policy = CookiePolicy::Off;
    }
    if let Some(max_parallel) = global.max_parallel {
        defaults.max_parallel = max_parallel;
    }
}

/// Dispatcher wired to the config file's inventory and credentials.
pub fn build_fleet(cfg: Config) -> ConfiguredFleet {
    let inventory = StaticInventory::new(&cfg);
    let transport = cfg.transport();
    let max_parallel = cfg.defaults.max_parallel;
    tracing::debug!(
        devices = cfg.devices.len(),
        port = transport.port,
        max_parallel,
        "fleet configured"
    );
    Fleet::new(inventory, ConfigCredentials::new(cfg), transport).with_max_parallel(max_parallel)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["nxfleet"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["vpc", "status", "-d", "leaf1"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_file_values() {
        let mut cfg = Config::default();
        cfg.defaults.port = 8443;
        let g = global(&[
            "--username", "netops", "--timeout", "30", "--no-cookies", "--max-parallel", "4",
        ]);
        apply_overrides(&mut cfg, &g);

        assert_eq!(cfg.default_username.as_deref(), Some("netops"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.port, 8443);
        assert_eq!(cfg.defaults.cookie_policy, CookiePolicy::Off);
        assert_eq!(cfg.defaults.max_parallel, 4);
        assert!(!cfg.defaults.verify_tls);
    }

    #[test]
    fn no_flags_keep_file_values() {
        let mut cfg = Config::default();
        cfg.default_username = Some("admin".into());
        apply_overrides(&mut cfg, &global(&[]));
        assert_eq!(cfg.default_username.as_deref(), Some("admin"));
        assert_eq!(cfg.defaults.timeout, 1200);
        assert_eq!(cfg.defaults.cookie_policy, CookiePolicy::Persist);
    }

    #[test]
    fn explicit_path_wins() {
        let g = global(&["--config", "/tmp/nxfleet-test.toml"]);
        assert_eq!(config_path(&g), PathBuf::from("/tmp/nxfleet-test.toml"));
    }
}
