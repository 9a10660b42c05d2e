use thiserror::Error;

use crate::result_code::ResultCode;

/// Top-level error type for the `nxfleet-api` crate.
///
/// Every variant here is *transport-fatal*: the request could not produce a
/// usable body sequence. Soft failures (a null jsonrpc result, a missing or
/// non-numeric `code`) are not errors -- they are recorded as a
/// [`ResultCode`] on the response and the caller decides what to do.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction failed for the management address.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device ──────────────────────────────────────────────────────
    /// The switch answered with a non-200 HTTP status.
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// A key the envelope requires was absent from the reply.
    #[error("{message} ({code}: {})", .code.description())]
    Envelope { code: ResultCode, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON decoding failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Reading a configuration file for `conf_from_file` failed.
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The result code carried by an envelope failure, if any.
    pub fn result_code(&self) -> Option<ResultCode> {
        match self {
            Self::Envelope { code, .. } => Some(*code),
            _ => None,
        }
    }
}
