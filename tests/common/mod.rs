//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use kv_mcp::prelude::*;
use serde_json::Value;

/// Executor over a fresh in-memory engine
pub fn memory_executor() -> Executor {
    Executor::new(Arc::new(MemoryEngine::new()))
}

/// MCP server over a fresh in-memory engine
pub fn memory_server() -> McpServer {
    McpServer::new(memory_executor())
}

/// Build a key from string parts
pub fn key(parts: &[&str]) -> Key {
    Key::from(parts)
}

/// One JSON-RPC request line
pub fn request(id: u64, method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
}

/// One `tools/call` request line
pub fn tool_call(id: u64, name: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({"name": name, "arguments": arguments}))
}

/// Send a tool call and return its envelope, panicking on protocol errors
pub async fn call(server: &McpServer, name: &str, arguments: Value) -> Value {
    let response = server
        .handle_line(&tool_call(1, name, arguments))
        .await
        .expect("tool calls always get a response");
    assert!(
        response.error.is_none(),
        "protocol error for {}: {:?}",
        name,
        response.error
    );
    response.result.expect("result present")
}

/// Text of an envelope's first content block
pub fn text(envelope: &Value) -> &str {
    envelope["content"][0]["text"].as_str().expect("text block")
}

/// Parsed JSON payload of a successful envelope
pub fn payload(envelope: &Value) -> Value {
    assert_eq!(envelope["isError"], json!(false), "envelope: {}", envelope);
    serde_json::from_str(text(envelope)).expect("payload is JSON")
}

/// Payload of a successful envelope as a response envelope value
pub fn envelope(env: &ResponseEnvelope) -> Value {
    serde_json::to_value(env).expect("envelope serializes")
}
