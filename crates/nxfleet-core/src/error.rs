// ── Core error types ──
//
// Errors a fleet worker can hit. Transport failures from `nxfleet-api` are
// folded into connection/timeout/device/api kinds so the CLI never matches on
// reqwest internals. Missing data is never an error here: entities fall back
// to sentinels instead.

use nxfleet_api::ResultCode;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {address}: {reason}")]
    ConnectionFailed { address: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device returned HTTP {status}: {message}")]
    Device { status: u16, message: String },

    #[error("NXAPI error: {message}")]
    Api {
        message: String,
        /// Result code attached to envelope failures.
        code: Option<ResultCode>,
    },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error("Cannot resolve management address for {device}: {reason}")]
    Inventory { device: String, reason: String },

    #[error("No credentials for {device}: {reason}")]
    Credentials { device: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nxfleet_api::Error> for CoreError {
    fn from(err: nxfleet_api::Error) -> Self {
        match err {
            nxfleet_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        address: e
                            .url()
                            .and_then(|u| u.host_str().map(str::to_owned))
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                    }
                }
            }
            nxfleet_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nxfleet_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            nxfleet_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                address: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            nxfleet_api::Error::HttpStatus { status, body, .. } => CoreError::Device {
                status,
                message: body.lines().next().unwrap_or_default().trim().to_owned(),
            },
            nxfleet_api::Error::Envelope { code, message } => CoreError::Api {
                message: format!("{message} ({})", code.description()),
                code: Some(code),
            },
            nxfleet_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            nxfleet_api::Error::Io { path, source } => CoreError::Config {
                message: format!("cannot read {path}: {source}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_errors_keep_their_code() {
        let err: CoreError = nxfleet_api::Error::Envelope {
            code: ResultCode::OUTPUTS_KEY_NOT_PRESENT,
            message: "malformed reply".into(),
        }
        .into();
        match err {
            CoreError::Api { code, message } => {
                assert_eq!(code, Some(ResultCode::OUTPUTS_KEY_NOT_PRESENT));
                assert!(message.contains("outputs key"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn http_status_becomes_device_error() {
        let err: CoreError = nxfleet_api::Error::HttpStatus {
            status: 401,
            url: "https://10.0.0.1/ins".into(),
            body: "Authentication failed\n<html>".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Device returned HTTP 401: Authentication failed");
    }
}
