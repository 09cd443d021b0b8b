//! Tool definitions and argument decoding.
//!
//! Each tool advertises a JSON input schema in `tools/list`. Incoming
//! `tools/call` arguments are decoded with serde into a typed [`Command`];
//! anything that does not fit the schema is rejected here as invalid params
//! and never reaches the executor.

use std::num::{NonZeroU64, NonZeroUsize};

use kvmcp_core::{Consistency, Key};
use kvmcp_executor::Command;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{McpError, Result};

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDef {
    /// Tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema of the arguments object
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDef {
    fn new(name: &str, description: &str, properties: Value, required: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }
}

/// The fixed set of kv tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Registry with all seven tools
    pub fn new() -> Self {
        Self {
            tools: tool_definitions(),
        }
    }

    /// All tool definitions, in advertised order
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDef> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Decode a `tools/call` into a command.
    ///
    /// Missing `arguments` decode as an empty object.
    pub fn parse_call(&self, name: &str, arguments: Option<Value>) -> Result<Command> {
        let args = arguments.unwrap_or_else(|| json!({}));
        match name {
            "kv_set" => {
                let a: SetArgs = decode(name, args)?;
                Ok(Command::Set {
                    key: a.key,
                    value: a.value,
                    expire_in: a.expire_in,
                })
            }
            "kv_get" => {
                let a: GetArgs = decode(name, args)?;
                Ok(Command::Get {
                    key: a.key,
                    consistency: a.consistency,
                })
            }
            "kv_delete" => {
                let a: DeleteArgs = decode(name, args)?;
                Ok(Command::Delete { key: a.key })
            }
            "kv_getMany" => {
                let a: GetManyArgs = decode(name, args)?;
                Ok(Command::GetMany {
                    keys: a.keys,
                    consistency: a.consistency,
                })
            }
            "kv_list" => {
                let a: ListArgs = decode(name, args)?;
                Ok(Command::List {
                    prefix: a.prefix,
                    start: a.start,
                    end: a.end,
                    limit: a.limit.map(NonZeroUsize::get),
                    consistency: a.consistency,
                    batch_size: a.batch_size.map(NonZeroUsize::get),
                    reverse: a.reverse,
                })
            }
            "kv_enqueue" => {
                let a: EnqueueArgs = decode(name, args)?;
                Ok(Command::Enqueue {
                    value: a.value,
                    delay: a.delay,
                    keys_if_undelivered: a.keys_if_undelivered,
                    backoff_schedule: a
                        .backoff_schedule
                        .map(|steps| steps.into_iter().map(NonZeroU64::get).collect()),
                })
            }
            "kv_reset" => {
                let a: ResetArgs = decode(name, args)?;
                Ok(Command::Reset {
                    confirmation: a.confirmation,
                })
            }
            other => Err(McpError::UnknownTool(other.to_string())),
        }
    }
}

fn decode<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| McpError::InvalidParams(format!("{}: {}", tool, e)))
}

// =============================================================================
// Argument shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetArgs {
    key: Key,
    value: String,
    #[serde(default)]
    expire_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GetArgs {
    key: Key,
    #[serde(default)]
    consistency: Option<Consistency>,
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    key: Key,
}

#[derive(Debug, Deserialize)]
struct GetManyArgs {
    keys: Vec<Key>,
    #[serde(default)]
    consistency: Option<Consistency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    #[serde(default)]
    prefix: Option<Key>,
    #[serde(default)]
    start: Option<Key>,
    #[serde(default)]
    end: Option<Key>,
    #[serde(default)]
    limit: Option<NonZeroUsize>,
    #[serde(default)]
    consistency: Option<Consistency>,
    #[serde(default)]
    batch_size: Option<NonZeroUsize>,
    #[serde(default)]
    reverse: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnqueueArgs {
    value: String,
    #[serde(default)]
    delay: Option<u64>,
    #[serde(default)]
    keys_if_undelivered: Option<Vec<Key>>,
    #[serde(default)]
    backoff_schedule: Option<Vec<NonZeroU64>>,
}

#[derive(Debug, Deserialize)]
struct ResetArgs {
    confirmation: String,
}

// =============================================================================
// Advertised schemas
// =============================================================================

fn key_schema(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description,
    })
}

fn keys_schema(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "array", "items": { "type": "string" } },
        "description": description,
    })
}

fn consistency_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "enum": ["strong", "eventual"],
        "description": description,
    })
}

fn tool_definitions() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "kv_set",
            "Set a JSON value under a key, optionally with a time-to-live.",
            json!({
                "key": key_schema("The key to set in the key-value store"),
                "value": {
                    "type": "string",
                    "description": "The value to set in the key-value store (JSON string)",
                },
                "expireIn": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Time-to-live (TTL) for the key in milliseconds",
                },
            }),
            &["key", "value"],
        ),
        ToolDef::new(
            "kv_get",
            "Get the value stored under a key.",
            json!({
                "key": key_schema("The key to get from the key-value store"),
                "consistency": consistency_schema("The consistency level for the read operation"),
            }),
            &["key"],
        ),
        ToolDef::new(
            "kv_delete",
            "Delete a key. Deleting an absent key succeeds.",
            json!({
                "key": key_schema("The key to delete from the key-value store"),
            }),
            &["key"],
        ),
        ToolDef::new(
            "kv_getMany",
            "Get several keys at once. Results are in request order.",
            json!({
                "keys": keys_schema("The keys to get from the key-value store"),
                "consistency": consistency_schema("The consistency level for the read operation"),
            }),
            &["keys"],
        ),
        ToolDef::new(
            "kv_list",
            "List entries by prefix or key range. Returns at most `limit` entries (100 by default).",
            json!({
                "prefix": key_schema(
                    "Array of strings representing the key prefix to list. Example: [\"users\"]"
                ),
                "start": key_schema("Start key for range queries. Example: [\"orders\", \"2023\"]"),
                "end": key_schema("End key for range queries. Example: [\"orders\", \"2024\"]"),
                "limit": {
                    "type": "integer",
                    "exclusiveMinimum": 0,
                    "description": "Maximum number of entries to return",
                },
                "consistency": consistency_schema("The consistency level for the list operation"),
                "batchSize": {
                    "type": "integer",
                    "exclusiveMinimum": 0,
                    "description": "Number of entries to fetch per batch internally",
                },
                "reverse": {
                    "type": "boolean",
                    "description": "Whether to reverse the order of entries",
                },
            }),
            &[],
        ),
        ToolDef::new(
            "kv_enqueue",
            "Enqueue a JSON message for later delivery.",
            json!({
                "value": {
                    "type": "string",
                    "description": "The message value (JSON string)",
                },
                "delay": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Delay in milliseconds before the message is delivered",
                },
                "keysIfUndelivered": keys_schema(
                    "Keys to set if the message is not successfully delivered"
                ),
                "backoffSchedule": {
                    "type": "array",
                    "items": { "type": "integer", "exclusiveMinimum": 0 },
                    "description": "Retry backoff schedule in milliseconds",
                },
            }),
            &["value"],
        ),
        ToolDef::new(
            "kv_reset",
            "Delete every key in the store. Requires confirmation 'yes'.",
            json!({
                "confirmation": {
                    "type": "string",
                    "const": "yes",
                    "description": "Must be 'yes' to confirm deletion of all keys",
                },
            }),
            &["confirmation"],
        ),
    ]
}
