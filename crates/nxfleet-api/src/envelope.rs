// NXAPI request/response envelopes
//
// Two wire shapes share the `/ins` endpoint. `ins_api` batches chained CLIs
// into one `input` string and answers with one output per CLI; `jsonrpc`
// wraps each CLI as a JSON-RPC 2.0 call. NX-OS collapses single-element
// lists to bare objects in both, so every repeated element decodes through
// `OneOrMany`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `ins_api` version string sent with every request.
pub const INS_API_VERSION: &str = "1.0";
/// `params.version` of a jsonrpc call.
pub const JSONRPC_CLI_VERSION: f64 = 1.2;

// ── OneOrMany ───────────────────────────────────────────────────────

/// A JSON position that holds either a single element or an array of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Flatten to a list: an array passes through, a scalar becomes `[x]`.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Many(items) => items.len(),
            Self::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        value.into_vec()
    }
}

// ── ins_api request ─────────────────────────────────────────────────

/// `type` field of an `ins_api` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsApiType {
    CliShow,
    CliConf,
}

/// Inner object of an `ins_api` request.
#[derive(Debug, Clone, Serialize)]
pub struct InsApiRequest {
    pub version: &'static str,
    #[serde(rename = "type")]
    pub kind: InsApiType,
    pub chunk: &'static str,
    pub sid: &'static str,
    pub input: String,
    pub output_format: &'static str,
}

/// Outer `{"ins_api": {...}}` wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct InsApiEnvelope {
    pub ins_api: InsApiRequest,
}

impl InsApiEnvelope {
    pub fn show(input: impl Into<String>) -> Self {
        Self::new(InsApiType::CliShow, input.into())
    }

    pub fn conf(input: impl Into<String>) -> Self {
        Self::new(InsApiType::CliConf, input.into())
    }

    fn new(kind: InsApiType, input: String) -> Self {
        Self {
            ins_api: InsApiRequest {
                version: INS_API_VERSION,
                kind,
                chunk: "0",
                sid: "1",
                input,
                output_format: "json",
            },
        }
    }
}

// ── jsonrpc request ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcParams {
    pub cmd: String,
    pub version: f64,
}

/// One call in a jsonrpc batch.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcCall {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: JsonRpcParams,
    pub id: i64,
}

impl JsonRpcCall {
    pub fn cli(cmd: impl Into<String>, id: i64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "cli",
            params: JsonRpcParams {
                cmd: cmd.into(),
                version: JSONRPC_CLI_VERSION,
            },
            id,
        }
    }
}

/// Build the ordered jsonrpc batch for a list of CLIs, ids counting from 1.
pub fn json_rpc_batch<I, S>(commands: I) -> Vec<JsonRpcCall>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    commands
        .into_iter()
        .zip(1..)
        .map(|(cmd, id)| JsonRpcCall::cli(cmd, id))
        .collect()
}

// ── ins_api response ────────────────────────────────────────────────

/// `{"ins_api": {"outputs": {"output": Body | [Body]}}}`
///
/// Every level is optional so the client can tell *which* key went missing
/// and assign the matching result code.
#[derive(Debug, Deserialize)]
pub struct InsApiResponse {
    #[serde(default)]
    pub ins_api: Option<InsApiReply>,
}

#[derive(Debug, Deserialize)]
pub struct InsApiReply {
    #[serde(default)]
    pub outputs: Option<InsApiOutputs>,
    #[serde(default)]
    pub sid: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct InsApiOutputs {
    #[serde(default)]
    pub output: Option<OneOrMany<OutputBody>>,
}

/// One CLI's output. `code` arrives as a string on most releases and as an
/// integer on a few, so it stays loosely typed until the client parses it.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputBody {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub input: Option<String>,
}

// ── jsonrpc response ────────────────────────────────────────────────

/// One jsonrpc reply. `result` distinguishes absent (`None`) from
/// explicit null (`Some(Value::Null)`).
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcReply {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Keep an explicit `null` as `Some(Value::Null)` instead of collapsing it
/// into `None` -- the two mean different things to the client.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn show_envelope_wire_shape() {
        let env = InsApiEnvelope::show("show version");
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "ins_api": {
                    "version": "1.0",
                    "type": "cli_show",
                    "chunk": "0",
                    "sid": "1",
                    "input": "show version",
                    "output_format": "json"
                }
            })
        );
    }

    #[test]
    fn conf_envelope_type() {
        let env = InsApiEnvelope::conf("interface lo9 ; shutdown");
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["ins_api"]["type"], "cli_conf");
    }

    #[test]
    fn jsonrpc_batch_ids_are_ordered() {
        let batch = json_rpc_batch(["show clock", "show hostname"]);
        let v = serde_json::to_value(&batch).unwrap();
        assert_eq!(v[0]["id"], 1);
        assert_eq!(v[1]["id"], 2);
        assert_eq!(v[1]["params"]["cmd"], "show hostname");
        assert_eq!(v[0]["params"]["version"], 1.2);
        assert_eq!(v[0]["method"], "cli");
    }

    #[test]
    fn output_decodes_as_one_or_many() {
        let one: InsApiOutputs =
            serde_json::from_value(json!({"output": {"code": "200", "body": {}}})).unwrap();
        assert_eq!(one.output.unwrap().len(), 1);

        let many: InsApiOutputs = serde_json::from_value(
            json!({"output": [{"code": "200"}, {"code": "400", "msg": "bad"}]}),
        )
        .unwrap();
        let items = many.output.unwrap().into_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].msg.as_deref(), Some("bad"));
    }

    #[test]
    fn jsonrpc_null_result_is_distinct_from_missing() {
        let null: JsonRpcReply = serde_json::from_value(json!({"id": 1, "result": null})).unwrap();
        assert_eq!(null.result, Some(Value::Null));

        let missing: JsonRpcReply = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(missing.result, None);
    }
}
