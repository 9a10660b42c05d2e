//! Shared configuration for the nxfleet tools.
//!
//! TOML config (file + `NXFLEET_*` environment), credential resolution
//! (env + keyring + plaintext), a static inventory resolver, and translation
//! to `nxfleet_api::TransportConfig`.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use nxfleet_api::{CookiePolicy, Credentials, TlsMode, TransportConfig};
use nxfleet_core::{CoreError, CredentialSource, InventoryResolver};

/// Keyring service name; entries are keyed by username.
pub const KEYRING_SERVICE: &str = "nxfleet";

/// Environment variable consulted first for the device password.
pub const PASSWORD_ENV: &str = "NXFLEET_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no username configured for device '{device}'")]
    NoUsername { device: String },

    #[error("no password found for user '{username}'")]
    NoPassword { username: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Username for devices that don't name their own.
    pub default_username: Option<String>,

    /// Transport and dispatch defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Inventory: device name -> address and optional credentials.
    #[serde(default)]
    pub devices: BTreeMap<String, Device>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub verify_tls: bool,

    /// PEM bundle to verify switch certificates against.
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub cookie_policy: CookiePolicy,

    /// Where `<addr>.cookies` files live; the system temp dir if unset.
    pub cookie_dir: Option<PathBuf>,

    /// Worker cap for fleet runs; 0 means one worker per device.
    #[serde(default)]
    pub max_parallel: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            port: default_port(),
            verify_tls: false,
            ca_cert: None,
            cookie_policy: CookiePolicy::default(),
            cookie_dir: None,
            max_parallel: 0,
        }
    }
}

fn default_timeout() -> u64 {
    1200
}
fn default_port() -> u16 {
    443
}

/// One inventory entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Device {
    /// Management address: an IP literal or a resolvable hostname.
    pub address: String,

    /// Login name; falls back to `default_username`.
    pub username: Option<String>,

    /// Password (plaintext -- prefer the keyring or `NXFLEET_PASSWORD`).
    pub password: Option<String>,
}

impl Config {
    /// Username used to log into `device`.
    pub fn username_for(&self, device: &str) -> Result<String, ConfigError> {
        self.devices
            .get(device)
            .and_then(|d| d.username.clone())
            .or_else(|| self.default_username.clone())
            .ok_or_else(|| ConfigError::NoUsername {
                device: device.into(),
            })
    }

    /// Build the transport settings every session of a run shares.
    pub fn transport(&self) -> TransportConfig {
        let d = &self.defaults;
        let tls = match (&d.ca_cert, d.verify_tls) {
            (Some(ca), _) => TlsMode::CustomCa(ca.clone()),
            (None, true) => TlsMode::System,
            (None, false) => TlsMode::DangerAcceptInvalid,
        };
        let mut transport = TransportConfig {
            tls,
            ..TransportConfig::default()
        }
        .with_port(d.port)
        .with_timeout(Duration::from_secs(d.timeout))
        .with_cookie_policy(d.cookie_policy);
        if let Some(dir) = &d.cookie_dir {
            transport = transport.with_cookie_dir(dir);
        }
        transport
    }

    /// Copy with every plaintext password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        for device in out.devices.values_mut() {
            if device.password.is_some() {
                device.password = Some("********".into());
            }
        }
        out
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "nxfleet", "nxfleet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nxfleet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` plus the environment.
///
/// Environment keys nest with `__`: `NXFLEET_DEFAULTS__TIMEOUT=30`,
/// `NXFLEET_DEFAULT_USERNAME=netops`. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NXFLEET_").ignore(&["PASSWORD"]).split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), devices = config.devices.len(), "config loaded");
    Ok(config)
}

/// Load only the file at `path`, without the environment layer.
///
/// Used when the config is about to be written back, so environment
/// overrides never end up persisted.
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_password(username: &str) -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username).ok()?;
    match entry.get_password() {
        Ok(pw) => Some(pw),
        Err(e) => {
            debug!(username, error = %e, "no keyring entry");
            None
        }
    }
}

/// The password chain: env value, then keyring, then plaintext.
fn password_chain(
    username: &str,
    env: Option<String>,
    keyring: impl FnOnce(&str) -> Option<String>,
    plaintext: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Some(pw) = env.filter(|pw| !pw.is_empty()) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Some(pw) = keyring(username) {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(pw) = plaintext {
        return Ok(SecretString::from(pw.to_owned()));
    }

    Err(ConfigError::NoPassword {
        username: username.into(),
    })
}

/// Resolve the password for `username`, consulting `device`'s plaintext
/// entry last.
pub fn resolve_password(
    config: &Config,
    device: &str,
    username: &str,
) -> Result<SecretString, ConfigError> {
    let plaintext = config.devices.get(device).and_then(|d| d.password.as_deref());
    password_chain(
        username,
        std::env::var(PASSWORD_ENV).ok(),
        keyring_password,
        plaintext,
    )
}

/// Store `password` in the system keyring for `username`.
pub fn store_password(username: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)?;
    entry.set_password(password)?;
    Ok(())
}

/// [`CredentialSource`] backed by the config file and the password chain.
#[derive(Debug, Clone)]
pub struct ConfigCredentials {
    config: Config,
}

impl ConfigCredentials {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl CredentialSource for ConfigCredentials {
    fn fetch(&self, device: &str) -> Result<Credentials, CoreError> {
        let to_core = |e: ConfigError| CoreError::Credentials {
            device: device.into(),
            reason: e.to_string(),
        };
        let username = self.config.username_for(device).map_err(to_core)?;
        let password = resolve_password(&self.config, device, &username).map_err(to_core)?;
        Ok(Credentials::new(username, password.expose_secret()))
    }
}

// ── Inventory ───────────────────────────────────────────────────────

/// [`InventoryResolver`] over the `[devices]` table.
///
/// A configured address wins; a name that is itself an IP literal is used
/// as-is; anything else goes through DNS.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    addresses: BTreeMap<String, String>,
}

impl StaticInventory {
    pub fn new(config: &Config) -> Self {
        Self {
            addresses: config
                .devices
                .iter()
                .map(|(name, d)| (name.clone(), d.address.clone()))
                .collect(),
        }
    }
}

impl InventoryResolver for StaticInventory {
    async fn resolve_mgmt_ip(&self, device: &str) -> Result<IpAddr, CoreError> {
        let target = self.addresses.get(device).map_or(device, String::as_str);
        if let Ok(ip) = target.parse::<IpAddr>() {
            return Ok(ip);
        }
        let inventory_err = |reason: String| CoreError::Inventory {
            device: device.into(),
            reason,
        };
        let mut addrs = tokio::net::lookup_host((target, 0))
            .await
            .map_err(|e| inventory_err(e.to_string()))?;
        let addr = addrs
            .next()
            .ok_or_else(|| inventory_err(format!("{target} has no addresses")))?;
        debug!(device, target, address = %addr.ip(), "resolved via DNS");
        Ok(addr.ip())
    }
}
