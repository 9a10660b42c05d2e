//! CLI error types with miette diagnostics.
//!
//! Only problems that stop a run before any device is contacted end up here.
//! Per-device failures are printed as `<device>: error: ...` lines instead.

use miette::Diagnostic;
use thiserror::Error;

use nxfleet_config::ConfigError;
use nxfleet_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for --{field}: {reason}")]
    #[diagnostic(code(nxfleet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{source}")]
    #[diagnostic(
        code(nxfleet::config),
        help(
            "Check the config file, or inspect it with: nxfleet config show\n\
             Expected at: {path}"
        )
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    // ── Runtime ──────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(nxfleet::core))]
    Core(#[from] CoreError),

    #[error("Cannot read {path}: {source}")]
    #[diagnostic(code(nxfleet::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Password prompt failed: {0}")]
    #[diagnostic(code(nxfleet::prompt))]
    Prompt(#[source] std::io::Error),

    #[error("Cannot render output: {0}")]
    #[diagnostic(code(nxfleet::render))]
    Render(String),
}

impl CliError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn config(source: ConfigError) -> Self {
        Self::Config {
            source,
            path: nxfleet_config::config_path().display().to_string(),
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config { source, .. } => match source {
                ConfigError::Validation { .. } => exit_code::USAGE,
                _ => exit_code::CONFIG,
            },
            Self::Core(CoreError::Config { .. } | CoreError::Credentials { .. }) => {
                exit_code::CONFIG
            }
            Self::Core(CoreError::ValidationFailed { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(CliError::validation("vlan", "out of range").exit_code(), exit_code::USAGE);
        assert_eq!(
            CliError::config(ConfigError::NoPassword {
                username: "admin".into()
            })
            .exit_code(),
            exit_code::CONFIG
        );
        assert_eq!(
            CliError::Core(CoreError::Internal("boom".into())).exit_code(),
            exit_code::GENERAL
        );
    }
}
