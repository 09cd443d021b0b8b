//! JSON-RPC 2.0 server over line-delimited stdio.
//!
//! One request per input line, one response per output line. Every request
//! is handled on its own task so a slow tool call does not hold up the ones
//! behind it; responses go through a single writer task and may therefore
//! arrive out of request order. Notifications (requests without an `id`)
//! never get a response; an explicit `null` id is answered.

use std::io;

use kvmcp_executor::Executor;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::tools::ToolRegistry;
use crate::{McpError, Result};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `initialize`
pub const SERVER_NAME: &str = "kv-mcp";

/// The only JSON-RPC revision accepted
const JSONRPC_VERSION: &str = "2.0";

/// Responses buffered between handlers and the writer
const RESPONSE_QUEUE: usize = 64;

/// An incoming JSON-RPC request or notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be `"2.0"`
    pub jsonrpc: String,
    /// Absent for notifications; an explicit `null` is kept as
    /// `Some(Value::Null)`
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
}

/// An outgoing JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always `"2.0"`
    pub jsonrpc: String,
    /// Id of the request answered, `null` if it could not be read
    pub id: Value,
    /// Present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response
    pub fn failure(id: Value, error: &McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }
}

fn present_id<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// MCP server dispatching tool calls to an [`Executor`].
#[derive(Debug, Clone)]
pub struct McpServer {
    executor: Executor,
    tools: ToolRegistry,
}

impl McpServer {
    /// Create a server with the standard tool set
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            tools: ToolRegistry::new(),
        }
    }

    /// The executor tool calls are dispatched to
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Serve requests from stdin until it closes.
    pub async fn run_stdio(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve line-delimited requests from `reader`, writing responses to
    /// `writer`.
    ///
    /// Returns once the reader is exhausted and every in-flight request has
    /// been answered.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(RESPONSE_QUEUE);
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut lines = reader.lines();
        let mut received = 0u64;
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            received += 1;
            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    if tx.send(response).await.is_err() {
                        debug!("writer gone, dropping response");
                    }
                }
            });
        }

        // The writer finishes once every handler has dropped its sender.
        drop(tx);
        writer_task
            .await
            .map_err(|e| McpError::Io(io::Error::new(io::ErrorKind::Other, e)))??;
        info!(requests = received, "input closed");
        Ok(())
    }

    /// Handle one raw input line.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "unparseable request");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    &McpError::Parse(e.to_string()),
                ));
            }
        };
        let id = raw.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => id.map(|id| {
                JsonRpcResponse::failure(id, &McpError::InvalidRequest(e.to_string()))
            }),
        }
    }

    /// Handle one decoded request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "request");
        if request.jsonrpc != JSONRPC_VERSION {
            let error = McpError::InvalidRequest(format!(
                "unsupported jsonrpc version {:?}",
                request.jsonrpc
            ));
            return request.id.map(|id| JsonRpcResponse::failure(id, &error));
        }
        let result = self.dispatch(&request.method, request.params).await;
        let id = request.id?;
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                debug!(error = %e, "request rejected");
                JsonRpcResponse::failure(id, &e)
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.tools() })),
            "tools/call" => self.call_tool(params).await,
            m if m.starts_with("notifications/") => Ok(Value::Null),
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params = params.ok_or_else(|| McpError::InvalidParams("missing params".into()))?;
        let call: ToolCallParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        let command = self.tools.parse_call(&call.name, call.arguments)?;
        debug!(tool = %call.name, "tool call");
        let envelope = self.executor.call(command).await;
        Ok(serde_json::to_value(envelope)?)
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<JsonRpcResponse>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}
