//! End-to-end properties of the operations over the in-memory engine.

use kv_mcp::prelude::*;

use crate::common::*;

fn list_all() -> Command {
    Command::List {
        prefix: Some(Key::empty()),
        start: None,
        end: None,
        limit: None,
        consistency: None,
        batch_size: None,
        reverse: None,
    }
}

#[tokio::test]
async fn set_then_get_is_deep_equal() {
    let executor = memory_executor();
    let documents = [
        json!(null),
        json!(true),
        json!(-12.5),
        json!("text with \"quotes\""),
        json!([1, [2, [3]], {"k": []}]),
        json!({"nested": {"list": [1, 2, 3], "flag": false}, "unicode": "héllo"}),
    ];
    for (i, doc) in documents.iter().enumerate() {
        let name = format!("doc{}", i);
        let k = key(&["docs", name.as_str()]);
        let env = executor
            .call(Command::Set {
                key: k.clone(),
                value: doc.to_string(),
                expire_in: None,
            })
            .await;
        assert!(!env.is_error);

        let got = payload(&envelope(
            &executor
                .call(Command::Get {
                    key: k,
                    consistency: Some(Consistency::Strong),
                })
                .await,
        ));
        assert_eq!(&got["value"], doc);
    }
}

#[tokio::test]
async fn confirmed_reset_empties_store() {
    let executor = memory_executor();
    for i in 0..130 {
        let name = format!("{:03}", i);
        executor
            .call(Command::Set {
                key: key(&["bulk", name.as_str()]),
                value: i.to_string(),
                expire_in: None,
            })
            .await;
    }

    let cancelled = executor
        .call(Command::Reset {
            confirmation: "no".into(),
        })
        .await;
    assert!(!cancelled.is_error);
    assert_eq!(
        cancelled.first_text(),
        Some("Reset cancelled. Confirmation not provided.")
    );
    let still_there = payload(&envelope(&executor.call(list_all()).await));
    assert_eq!(still_there.as_array().unwrap().len(), 100);

    let done = executor
        .call(Command::Reset {
            confirmation: "yes".into(),
        })
        .await;
    assert_eq!(done.first_text(), Some("Reset complete. Deleted 130 keys."));

    let after = payload(&envelope(&executor.call(list_all()).await));
    assert_eq!(after, json!([]));
}

#[tokio::test]
async fn get_many_marks_absent_and_null_differently() {
    let executor = memory_executor();
    executor
        .call(Command::Set {
            key: key(&["present-null"]),
            value: "null".into(),
            expire_in: None,
        })
        .await;

    let got = payload(&envelope(
        &executor
            .call(Command::GetMany {
                keys: vec![key(&["absent"]), key(&["present-null"])],
                consistency: None,
            })
            .await,
    ));
    let entries = got.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["value"], Value::Null);
    assert_eq!(entries[0]["versionstamp"], Value::Null);
    assert_eq!(entries[1]["value"], Value::Null);
    assert!(entries[1]["versionstamp"].is_string());
}

#[tokio::test]
async fn prefix_with_start_resumes_within_prefix() {
    let executor = memory_executor();
    for name in ["a1", "a2", "a3"] {
        executor
            .call(Command::Set {
                key: key(&["p", name]),
                value: "0".into(),
                expire_in: None,
            })
            .await;
    }
    executor
        .call(Command::Set {
            key: key(&["q"]),
            value: "0".into(),
            expire_in: None,
        })
        .await;

    let got = payload(&envelope(
        &executor
            .call(Command::List {
                prefix: Some(key(&["p"])),
                start: Some(key(&["p", "a2"])),
                end: None,
                limit: None,
                consistency: None,
                batch_size: Some(1),
                reverse: None,
            })
            .await,
    ));
    let keys: Vec<Value> = got
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["key"].clone())
        .collect();
    assert_eq!(keys, vec![json!(["p", "a2"]), json!(["p", "a3"])]);
}

#[tokio::test]
async fn prefix_start_end_uses_range() {
    let executor = memory_executor();
    for name in ["0", "1", "5", "9"] {
        executor
            .call(Command::Set {
                key: key(&["a", name]),
                value: "0".into(),
                expire_in: None,
            })
            .await;
    }
    let got = payload(&envelope(
        &executor
            .call(Command::List {
                prefix: Some(key(&["a"])),
                start: Some(key(&["a", "1"])),
                end: Some(key(&["a", "9"])),
                limit: None,
                consistency: None,
                batch_size: None,
                reverse: None,
            })
            .await,
    ));
    assert_eq!(got.as_array().unwrap().len(), 2);
}
