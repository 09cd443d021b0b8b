//! Whole-session behavior over a byte stream.

use std::collections::HashMap;

use kv_mcp::prelude::*;
use tokio::io::AsyncReadExt;

use crate::common::*;

async fn run_session(server: &McpServer, lines: &[String]) -> Vec<Value> {
    let mut input = lines.join("\n");
    input.push('\n');

    let (mut client, server_side) = tokio::io::duplex(1 << 20);
    server.serve(input.as_bytes(), server_side).await.unwrap();

    let mut output = String::new();
    client.read_to_string(&mut output).await.unwrap();
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn handshake_and_discovery() {
    let server = memory_server();
    let lines = vec![
        request(1, "initialize", json!({"protocolVersion": "2024-11-05", "capabilities": {}})),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        request(2, "tools/list", json!({})),
        request(3, "ping", json!({})),
        String::new(),
        "not json at all".to_string(),
        request(4, "prompts/list", json!({})),
    ];

    let responses = run_session(&server, &lines).await;
    assert_eq!(responses.len(), 5);

    let by_id: HashMap<String, &Value> = responses
        .iter()
        .map(|r| (r["id"].to_string(), r))
        .collect();

    assert_eq!(by_id["1"]["result"]["serverInfo"]["name"], json!("kv-mcp"));
    assert_eq!(by_id["1"]["result"]["protocolVersion"], json!("2024-11-05"));

    let tools = by_id["2"]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 7);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == json!("object")));

    assert_eq!(by_id["3"]["result"], json!({}));
    assert_eq!(by_id["null"]["error"]["code"], json!(-32700));
    assert_eq!(by_id["4"]["error"]["code"], json!(-32601));

    for response in &responses {
        assert_eq!(response["jsonrpc"], json!("2.0"));
    }
}

#[tokio::test]
async fn concurrent_tool_calls_all_answered() {
    let server = memory_server();
    let lines: Vec<String> = (0..40)
        .map(|i| {
            let name = format!("{:02}", i);
            tool_call(
                i,
                "kv_set",
                json!({"key": ["load", name], "value": i.to_string()}),
            )
        })
        .collect();

    let responses = run_session(&server, &lines).await;
    assert_eq!(responses.len(), 40);
    let mut ids: Vec<u64> = responses
        .iter()
        .map(|r| {
            assert_eq!(r["result"]["isError"], json!(false));
            r["id"].as_u64().unwrap()
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..40).collect::<Vec<_>>());

    let listed = payload(&call(&server, "kv_list", json!({"prefix": ["load"]})).await);
    assert_eq!(listed.as_array().unwrap().len(), 40);
}
