use secrecy::{ExposeSecret, SecretString};

/// Username/password pair for HTTP Basic auth against a switch.
///
/// The password stays wrapped in [`SecretString`] until the moment the
/// request builder needs it, so `Debug` output never leaks it.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Attach Basic auth to a request.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}

/// Which NXAPI envelope a request is framed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// `{"ins_api": {...}}` -- structured output per chained CLI.
    InsApi,
    /// JSON-RPC 2.0 batch, one call per CLI.
    JsonRpc,
}

impl EnvelopeKind {
    /// The `content-type` header NX-OS expects for this envelope.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::InsApi => "application/json",
            Self::JsonRpc => "application/json-rpc",
        }
    }
}
