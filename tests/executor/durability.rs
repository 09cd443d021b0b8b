//! Executor over the log-backed engine: state survives close and reopen.

use kv_mcp::prelude::*;
use tempfile::TempDir;

use crate::common::*;

fn open_store(dir: &TempDir) -> Executor {
    let target = Target::parse(dir.path().join("store.kv").to_str().unwrap());
    Executor::new(open(&target).unwrap())
}

fn set(k: &[&str], value: &str) -> Command {
    Command::Set {
        key: key(k),
        value: value.to_string(),
        expire_in: None,
    }
}

fn get(k: &[&str]) -> Command {
    Command::Get {
        key: key(k),
        consistency: None,
    }
}

#[tokio::test]
async fn writes_survive_reopen() {
    let dir = TempDir::new().unwrap();

    let executor = open_store(&dir);
    assert!(!executor.call(set(&["config", "mode"], r#""fast""#)).await.is_error);
    assert!(!executor.call(set(&["config", "gone"], "1")).await.is_error);
    assert!(!executor.call(Command::Delete { key: key(&["config", "gone"]) }).await.is_error);
    executor.close().await.unwrap();

    let executor = open_store(&dir);
    let mode = payload(&envelope(&executor.call(get(&["config", "mode"])).await));
    assert_eq!(mode["value"], json!("fast"));
    let gone = payload(&envelope(&executor.call(get(&["config", "gone"])).await));
    assert_eq!(gone["versionstamp"], Value::Null);
    executor.close().await.unwrap();
}

#[tokio::test]
async fn reset_is_durable() {
    let dir = TempDir::new().unwrap();

    let executor = open_store(&dir);
    for i in 0..20 {
        let name = format!("{:02}", i);
        executor.call(set(&["items", name.as_str()], "true")).await;
    }
    let env = executor
        .call(Command::Reset {
            confirmation: "yes".into(),
        })
        .await;
    assert_eq!(env.first_text(), Some("Reset complete. Deleted 20 keys."));
    executor.close().await.unwrap();

    let executor = open_store(&dir);
    let listed = payload(&envelope(
        &executor
            .call(Command::List {
                prefix: Some(Key::empty()),
                start: None,
                end: None,
                limit: None,
                consistency: None,
                batch_size: None,
                reverse: None,
            })
            .await,
    ));
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn versionstamps_keep_increasing_after_reopen() {
    let dir = TempDir::new().unwrap();

    let executor = open_store(&dir);
    executor.call(set(&["a"], "1")).await;
    let first = payload(&envelope(&executor.call(get(&["a"])).await))["versionstamp"].clone();
    executor.close().await.unwrap();

    let executor = open_store(&dir);
    executor.call(set(&["a"], "2")).await;
    let second = payload(&envelope(&executor.call(get(&["a"])).await))["versionstamp"].clone();

    let first: Versionstamp = first.as_str().unwrap().parse().unwrap();
    let second: Versionstamp = second.as_str().unwrap().parse().unwrap();
    assert!(second > first);
}

#[test]
fn remote_target_is_not_openable() {
    let target = Target::parse("https://kv.example.com/db");
    let err = open(&target).err().unwrap();
    assert!(matches!(err, EngineError::Unsupported(_)));
}
