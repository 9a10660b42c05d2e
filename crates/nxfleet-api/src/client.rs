// NXAPI session client
//
// One `NxapiClient` talks to one switch. It frames CLIs into the `ins_api`
// or `jsonrpc` envelope, replays the device's session cookie, and reduces
// each reply to an ordered body list plus a single result code. Requests on a
// session are serialized by `&mut self`.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Credentials, EnvelopeKind};
use crate::cookies::CookieStore;
use crate::envelope::{
    InsApiEnvelope, InsApiResponse, JsonRpcReply, OneOrMany, OutputBody, json_rpc_batch,
};
use crate::error::Error;
use crate::result_code::ResultCode;
use crate::transport::TransportConfig;

/// Separator NX-OS accepts between chained CLIs in one `input`.
pub const CLI_SEPARATOR: &str = " ; ";

/// Normalized reply to a show request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowResponse {
    /// One body per chained CLI, in order. Missing bodies are `{}`.
    pub bodies: Vec<Value>,
    pub code: ResultCode,
    pub message: String,
    /// `sid` for ins_api, the call `id` for jsonrpc.
    pub id: Option<Value>,
}

impl Default for ShowResponse {
    fn default() -> Self {
        Self {
            bodies: Vec::new(),
            code: ResultCode::CODE_NOT_RETURNED,
            message: String::new(),
            id: None,
        }
    }
}

impl ShowResponse {
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    pub fn first_body(&self) -> Option<&Value> {
        self.bodies.first()
    }
}

/// Normalized reply to a configuration request: one entry per statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfResponse {
    pub codes: Vec<ResultCode>,
    pub messages: Vec<String>,
}

impl ConfResponse {
    pub fn is_success(&self) -> bool {
        self.codes.iter().all(|c| c.is_success())
    }
}

/// One decoded `output` entry.
#[derive(Debug)]
struct ParsedOutput {
    body: Value,
    code: ResultCode,
    message: String,
}

/// HTTPS session to a single NX-OS switch.
pub struct NxapiClient {
    http: reqwest::Client,
    url: Url,
    address: IpAddr,
    credentials: Credentials,
    timeout: Duration,
    cookies: CookieStore,
    hostname: Option<String>,
    last: ShowResponse,
}

impl fmt::Debug for NxapiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NxapiClient")
            .field("url", &self.url.as_str())
            .field("username", &self.credentials.username)
            .field("hostname", &self.hostname)
            .finish_non_exhaustive()
    }
}

impl NxapiClient {
    /// Open a session to `https://<address>:<port>/ins`.
    pub fn new(
        address: IpAddr,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let url = endpoint_url(address, transport.port)?;
        Self::with_url(url, address, credentials, transport)
    }

    /// Open a session against an explicit endpoint URL.
    ///
    /// `address` still names the device for cookie storage.
    pub fn with_url(
        url: Url,
        address: IpAddr,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let cookies = CookieStore::open(
            transport.cookie_path(&address.to_string()),
            transport.cookie_policy,
        );
        Ok(Self {
            http,
            url,
            address,
            credentials,
            timeout: transport.timeout,
            cookies,
            hostname: None,
            last: ShowResponse::default(),
        })
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Switch hostname, known once `show hostname` has succeeded.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn cookies(&self) -> &CookieStore {
        &self.cookies
    }

    /// The most recent show reply.
    pub fn last_response(&self) -> &ShowResponse {
        &self.last
    }

    pub fn bodies(&self) -> &[Value] {
        &self.last.bodies
    }

    pub fn result_code(&self) -> ResultCode {
        self.last.code
    }

    pub fn result_message(&self) -> &str {
        &self.last.message
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Run a show CLI (or ` ; `-chained CLIs) through the ins_api envelope.
    pub async fn show(&mut self, command: &str) -> Result<&ShowResponse, Error> {
        let text = self
            .post(EnvelopeKind::InsApi, &InsApiEnvelope::show(command))
            .await?;
        let (outputs, id) = parse_ins_api(&text)?;
        let response = reduce_show(outputs, id);
        debug!(
            command,
            code = %response.code,
            bodies = response.bodies.len(),
            "show complete"
        );

        if command.trim() == "show hostname" && response.is_success() {
            self.hostname = response
                .first_body()
                .and_then(|b| b.get("hostname"))
                .and_then(Value::as_str)
                .map(str::to_owned);
        }

        self.last = response;
        Ok(&self.last)
    }

    /// Run a single show CLI through the jsonrpc envelope.
    pub async fn show_json_rpc(&mut self, command: &str) -> Result<&ShowResponse, Error> {
        let text = self
            .post(EnvelopeKind::JsonRpc, &json_rpc_batch([command]))
            .await?;
        let response = parse_json_rpc(&text)?;
        debug!(command, code = %response.code, "jsonrpc show complete");
        self.last = response;
        Ok(&self.last)
    }

    /// Apply configuration statements in one `cli_conf` request.
    pub async fn conf<S: AsRef<str>>(&mut self, commands: &[S]) -> Result<ConfResponse, Error> {
        if commands.is_empty() {
            debug!("conf called with no statements");
            return Ok(ConfResponse::default());
        }
        let input = commands
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(CLI_SEPARATOR);
        let text = self
            .post(EnvelopeKind::InsApi, &InsApiEnvelope::conf(input))
            .await?;
        let (outputs, _) = parse_ins_api(&text)?;

        let mut response = ConfResponse::default();
        for out in outputs {
            response.codes.push(out.code);
            response.messages.push(out.message);
        }
        debug!(
            statements = commands.len(),
            ok = response.is_success(),
            "conf complete"
        );
        Ok(response)
    }

    /// Read a config file and apply its statements.
    ///
    /// Blank lines and `!` / `#` comment lines are dropped.
    pub async fn conf_from_file(&mut self, path: impl AsRef<Path>) -> Result<ConfResponse, Error> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Io {
                path: path.display().to_string(),
                source,
            })?;
        let lines = config_lines(&text);
        self.conf(&lines).await
    }

    // ── Transport ────────────────────────────────────────────────────

    async fn post(&mut self, kind: EnvelopeKind, body: &impl Serialize) -> Result<String, Error> {
        debug!(url = %self.url, ?kind, "POST");

        let payload = serde_json::to_vec(body).map_err(|e| Error::Deserialization {
            message: format!("cannot encode request: {e}"),
            body: String::new(),
        })?;
        let mut builder = self
            .http
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, kind.content_type())
            .body(payload);
        builder = self.credentials.apply(builder);
        if let Some(cookie) = self.cookies.header_value() {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }

        let resp = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let received: BTreeMap<String, String> = resp
            .cookies()
            .map(|c| (c.name().to_owned(), c.value().to_owned()))
            .collect();
        self.cookies.replace_if_changed(received);

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(url = %self.url, %status, "device returned HTTP error");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: self.url.to_string(),
                body,
            });
        }

        resp.text().await.map_err(|e| self.map_send_error(e))
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(e)
        }
    }
}

/// `https://<addr>:<port>/ins`, with IPv6 literals bracketed.
pub fn endpoint_url(address: IpAddr, port: u16) -> Result<Url, Error> {
    let socket = SocketAddr::new(address, port);
    Ok(Url::parse(&format!("https://{socket}/ins"))?)
}

/// Statements from a config file: trimmed, without blanks or comments.
pub fn config_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('!') && !l.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

// ── Reply decoding ──────────────────────────────────────────────────

fn decode_error(e: &serde_json::Error, text: &str) -> Error {
    let preview: String = text.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{e} (body preview: {preview:?})"),
        body: text.to_owned(),
    }
}

fn envelope_error(code: ResultCode, message: impl Into<String>) -> Error {
    Error::Envelope {
        code,
        message: message.into(),
    }
}

fn parse_ins_api(text: &str) -> Result<(Vec<ParsedOutput>, Option<Value>), Error> {
    let decoded: InsApiResponse =
        serde_json::from_str(text).map_err(|e| decode_error(&e, text))?;
    let reply = decoded
        .ins_api
        .ok_or_else(|| envelope_error(ResultCode::INS_API_KEY_NOT_PRESENT, "malformed reply"))?;
    let outputs = reply
        .outputs
        .and_then(|o| o.output)
        .map(OneOrMany::into_vec)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| envelope_error(ResultCode::OUTPUTS_KEY_NOT_PRESENT, "malformed reply"))?;

    Ok((outputs.into_iter().map(parse_output).collect(), reply.sid))
}

fn parse_output(out: OutputBody) -> ParsedOutput {
    let mut code = match out.code {
        None => ResultCode::CODE_NOT_RETURNED,
        Some(Value::Number(n)) => n.as_i64().map_or(ResultCode::CODE_NOT_INTEGER, ResultCode),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_or(ResultCode::CODE_NOT_INTEGER, ResultCode),
        Some(_) => ResultCode::CODE_NOT_INTEGER,
    };

    let body = match out.body {
        Some(Value::Null) | None => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::Object(m)) if m.is_empty() => None,
        Some(b) => Some(b),
    };
    if code == ResultCode::SUCCESS && body.is_none() {
        code = ResultCode::SUCCESS_EMPTY_OUTPUT;
    }

    ParsedOutput {
        body: body.unwrap_or_else(|| Value::Object(Map::new())),
        message: out.msg.unwrap_or_else(|| code.description().to_owned()),
        code,
    }
}

/// Fold per-CLI outputs into one response. The overall code is the first
/// failing code, or the first code when everything succeeded.
fn reduce_show(outputs: Vec<ParsedOutput>, id: Option<Value>) -> ShowResponse {
    let pick = outputs
        .iter()
        .position(|o| !o.code.is_success())
        .unwrap_or(0);
    let (code, message) = outputs
        .get(pick)
        .map(|o| (o.code, o.message.clone()))
        .unwrap_or((ResultCode::CODE_NOT_RETURNED, String::new()));
    ShowResponse {
        bodies: outputs.into_iter().map(|o| o.body).collect(),
        code,
        message,
        id,
    }
}

fn parse_json_rpc(text: &str) -> Result<ShowResponse, Error> {
    let decoded: OneOrMany<JsonRpcReply> =
        serde_json::from_str(text).map_err(|e| decode_error(&e, text))?;
    let Some(reply) = decoded.into_vec().into_iter().next() else {
        return Err(envelope_error(
            ResultCode::RESULT_KEY_NOT_PRESENT,
            "empty jsonrpc reply",
        ));
    };

    let result = reply.result.ok_or_else(|| {
        let detail = reply
            .error
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("malformed reply");
        envelope_error(ResultCode::RESULT_KEY_NOT_PRESENT, detail)
    })?;

    let (body, code) = match result {
        Value::Null => (Value::Object(Map::new()), ResultCode::RESULT_IS_NONE),
        other => {
            let body = other
                .get("body")
                .cloned()
                .ok_or_else(|| envelope_error(ResultCode::BODY_KEY_NOT_PRESENT, "malformed reply"))?;
            (body, ResultCode::JSONRPC_HAS_NO_CODE)
        }
    };

    Ok(ShowResponse {
        bodies: vec![body],
        code,
        message: code.description().to_owned(),
        id: reply.id,
    })
}
