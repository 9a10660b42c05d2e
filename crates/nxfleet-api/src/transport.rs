// Shared transport configuration for building reqwest::Client instances.
//
// A fleet run builds one `TransportConfig` from the config file and CLI flags,
// then every device session clones it and builds its own client.

use std::path::PathBuf;
use std::time::Duration;

use crate::cookies::CookiePolicy;
use crate::error::Error;

/// NX-OS holds the HTTP connection open while long `show tech` style
/// commands run, so the default is generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1200);
pub const DEFAULT_PORT: u16 = 443;

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (switches ship self-signed).
    #[default]
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub port: u16,
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_policy: CookiePolicy,
    /// Directory for `<addr>.cookies` files; `None` means the system temp dir.
    pub cookie_dir: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tls: TlsMode::default(),
            timeout: DEFAULT_TIMEOUT,
            cookie_policy: CookiePolicy::default(),
            cookie_dir: None,
            user_agent: concat!("nxfleet/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// Cookies are not delegated to reqwest: the session manages its own
    /// store so it can persist and compare them.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Where the cookie file for `address` lives.
    pub fn cookie_path(&self, address: &str) -> PathBuf {
        let dir = self.cookie_dir.clone().unwrap_or_else(std::env::temp_dir);
        dir.join(crate::cookies::cookie_file_name(address))
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cookie_policy(mut self, policy: CookiePolicy) -> Self {
        self.cookie_policy = policy;
        self
    }

    pub fn with_cookie_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cookie_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_nxapi() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.port, 443);
        assert_eq!(cfg.timeout, Duration::from_secs(1200));
        assert!(matches!(cfg.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(cfg.cookie_policy, CookiePolicy::Persist);
    }

    #[test]
    fn cookie_path_uses_configured_dir() {
        let cfg = TransportConfig::default().with_cookie_dir("/var/tmp/nx");
        assert_eq!(
            cfg.cookie_path("10.1.1.1"),
            PathBuf::from("/var/tmp/nx/10.1.1.1.cookies")
        );
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            ..TransportConfig::default()
        };
        assert!(matches!(cfg.build_client(), Err(Error::Tls(_))));
    }
}
