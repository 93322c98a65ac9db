use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};
use url::Url;

use crate::error::SubmissionError;
use crate::transaction::{BroadcastMode, UnsignedTx};
use crate::tx::Broadcaster;

/// Port CometBFT RPC listens on when the node URL does not name one.
pub const DEFAULT_RPC_PORT: u16 = 26657;

/// Result of a broadcast as reported by the node. `code` 0 means accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub hash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub height: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateResponse {
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub gas_wanted: u64,
}

/// JSON-RPC 2.0 client for a node's HTTP endpoint.
#[derive(Debug, Clone)]
pub struct NodeClient {
    node: String,
    http: reqwest::Client,
}

impl NodeClient {
    pub fn new(node: impl Into<String>) -> Self {
        NodeClient {
            node: node.into(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> Result<Url, SubmissionError> {
        let invalid = |reason: String| SubmissionError::InvalidNode {
            node: self.node.clone(),
            reason,
        };
        let url = Url::parse(&self.node).map_err(|e| invalid(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?
            .to_string();
        let scheme = url.scheme().to_string();
        match scheme.as_str() {
            "http" | "https" => Ok(url),
            // tcp:// is how CometBFT names its RPC listener
            "tcp" => {
                let port = url.port().unwrap_or(DEFAULT_RPC_PORT);
                Url::parse(&format!("http://{host}:{port}{}", url.path()))
                    .map_err(|e| invalid(e.to_string()))
            }
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, SubmissionError> {
        let url = self.endpoint()?;
        let id: u32 = rand::random();
        debug!(node = %url, method, id, "sending JSON-RPC request");

        let response = self
            .http
            .post(url.as_str())
            .json(&jsonrpc_request(method, params, id))
            .send()
            .await
            .map_err(|source| {
                if source.is_connect() {
                    SubmissionError::Connect {
                        addr: url.to_string(),
                        source,
                    }
                } else {
                    SubmissionError::Transport(source)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;
        trace!(%status, bytes = body.len(), "node response received");
        if !status.is_success() {
            return Err(SubmissionError::Http {
                status: status.as_u16(),
                body,
            });
        }
        jsonrpc_result(&body)
    }
}

#[async_trait]
impl Broadcaster for NodeClient {
    async fn broadcast(
        &self,
        tx: &UnsignedTx,
        mode: BroadcastMode,
    ) -> Result<TxResponse, SubmissionError> {
        let params = json!({ "tx": serde_json::to_value(tx).map_err(SubmissionError::Encode)? });
        let result = self.call(mode.rpc_method(), params).await?;
        serde_json::from_value(result).map_err(|e| SubmissionError::Malformed(e.to_string()))
    }

    async fn simulate(&self, tx: &UnsignedTx) -> Result<SimulateResponse, SubmissionError> {
        let params = json!({ "tx": serde_json::to_value(tx).map_err(SubmissionError::Encode)? });
        let result = self.call("simulate", params).await?;
        serde_json::from_value(result).map_err(|e| SubmissionError::Malformed(e.to_string()))
    }
}

fn jsonrpc_request(method: &str, params: Value, id: u32) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn jsonrpc_result(body: &str) -> Result<Value, SubmissionError> {
    let mut resp: Value =
        serde_json::from_str(body).map_err(|e| SubmissionError::Malformed(e.to_string()))?;
    if let Some(error) = resp.get("error").filter(|e| !e.is_null()) {
        // some nodes send a bare string instead of {code, message}
        let (code, message) = match error {
            Value::String(message) => (0, message.clone()),
            other => (
                other.get("code").and_then(Value::as_i64).unwrap_or(0),
                other
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            ),
        };
        return Err(SubmissionError::Rpc { code, message });
    }
    resp.get_mut("result")
        .map(Value::take)
        .ok_or_else(|| SubmissionError::Malformed("missing result".to_string()))
}
