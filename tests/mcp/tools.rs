//! Each tool through `tools/call`, one request at a time.

use kv_mcp::prelude::*;

use crate::common::*;

#[tokio::test]
async fn set_get_delete_cycle() {
    let server = memory_server();

    let set = call(
        &server,
        "kv_set",
        json!({"key": ["users", "alice"], "value": "{\"age\":30}"}),
    )
    .await;
    assert_eq!(set, json!({"content": [], "isError": false}));

    let got = payload(&call(&server, "kv_get", json!({"key": ["users", "alice"]})).await);
    assert_eq!(got["value"], json!({"age": 30}));

    let deleted = call(&server, "kv_delete", json!({"key": ["users", "alice"]})).await;
    assert_eq!(deleted["isError"], json!(false));

    let got = payload(
        &call(
            &server,
            "kv_get",
            json!({"key": ["users", "alice"], "consistency": "eventual"}),
        )
        .await,
    );
    assert_eq!(got["value"], Value::Null);
}

#[tokio::test]
async fn malformed_value_is_a_tool_failure_not_a_protocol_error() {
    let server = memory_server();
    let env = call(&server, "kv_set", json!({"key": ["a", "b"], "value": "{bad"})).await;
    assert_eq!(env["isError"], json!(true));
    assert!(text(&env).starts_with("Failed to set key [a, b]: "));
}

#[tokio::test]
async fn get_many_keeps_positions() {
    let server = memory_server();
    call(&server, "kv_set", json!({"key": ["x"], "value": "\"X\""})).await;
    let got = payload(
        &call(
            &server,
            "kv_getMany",
            json!({"keys": [["missing"], ["x"]]}),
        )
        .await,
    );
    assert_eq!(got[0]["key"], json!(["missing"]));
    assert_eq!(got[0]["versionstamp"], Value::Null);
    assert_eq!(got[1]["value"], json!("X"));
}

#[tokio::test]
async fn list_selector_errors_are_tool_failures() {
    let server = memory_server();

    let env = call(&server, "kv_list", json!({})).await;
    assert_eq!(env["isError"], json!(true));
    assert_eq!(
        text(&env),
        "Failed to list keys: InvalidSelector: no bound supplied"
    );

    let env = call(&server, "kv_list", json!({"end": ["z"]})).await;
    assert_eq!(
        text(&env),
        "Failed to list keys: InvalidSelector: end requires start or prefix"
    );
}

#[tokio::test]
async fn list_honors_limit_and_reverse() {
    let server = memory_server();
    for name in ["a", "b", "c", "d"] {
        call(&server, "kv_set", json!({"key": ["l", name], "value": "0"})).await;
    }
    let got = payload(
        &call(
            &server,
            "kv_list",
            json!({"prefix": ["l"], "limit": 3, "reverse": true, "batchSize": 2}),
        )
        .await,
    );
    let keys: Vec<Value> = got
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].clone())
        .collect();
    assert_eq!(keys, vec![json!(["l", "d"]), json!(["l", "c"]), json!(["l", "b"])]);
}

#[tokio::test]
async fn enqueue_returns_commit() {
    let server = memory_server();
    let got = payload(
        &call(
            &server,
            "kv_enqueue",
            json!({"value": "{\"task\":\"report\"}", "delay": 1000, "backoffSchedule": [500]}),
        )
        .await,
    );
    assert_eq!(got["ok"], json!(true));
    assert_eq!(got["versionstamp"].as_str().unwrap().len(), 20);
}

#[tokio::test]
async fn enqueue_over_engine_limit_is_a_tool_failure() {
    let server = memory_server();
    let env = call(
        &server,
        "kv_enqueue",
        json!({"value": "1", "backoffSchedule": [1, 2, 3, 4, 5, 6]}),
    )
    .await;
    assert_eq!(env["isError"], json!(true));
    assert!(text(&env).starts_with("Failed to enqueue value: invalid argument"));
}

#[tokio::test]
async fn reset_requires_yes() {
    let server = memory_server();
    call(&server, "kv_set", json!({"key": ["keep"], "value": "1"})).await;

    let env = call(&server, "kv_reset", json!({"confirmation": "sure"})).await;
    assert_eq!(text(&env), "Reset cancelled. Confirmation not provided.");
    assert_eq!(env["isError"], json!(false));

    let env = call(&server, "kv_reset", json!({"confirmation": "yes"})).await;
    assert_eq!(text(&env), "Reset complete. Deleted 1 keys.");
}

#[tokio::test]
async fn schema_violations_are_protocol_errors() {
    let server = memory_server();

    let response = server
        .handle_line(&tool_call(9, "kv_list", json!({"prefix": ["a"], "limit": -1})))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, -32602);

    let response = server
        .handle_line(&tool_call(10, "kv_teleport", json!({})))
        .await
        .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert_eq!(error.message, "Unknown tool: kv_teleport");
}
