//! Process configuration.
//!
//! Every setting can come from a flag or its environment variable; the flag
//! wins when both are present.
//!
//! | Flag | Environment | Meaning |
//! |------|-------------|---------|
//! | `--path` | `KV_PATH` | `:memory:`, a log file path, or an `http(s)://` URL |
//! | `--access-token` | `KV_ACCESS_TOKEN` | required when the target is remote |
//! | `--log` | `KV_LOG` | tracing filter; falls back to `RUST_LOG`, then `info` |

use clap::{Arg, ArgMatches, Command};
use kvmcp_engine::Target;
use thiserror::Error;

/// Environment variable naming the store target
pub const PATH_ENV: &str = "KV_PATH";
/// Environment variable holding the remote access token
pub const ACCESS_TOKEN_ENV: &str = "KV_ACCESS_TOKEN";
/// Environment variable holding the log filter
pub const LOG_ENV: &str = "KV_LOG";

/// Fatal configuration problems, reported before the server starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No store target was given
    #[error("KV_PATH environment variable (or --path) is required")]
    MissingPath,

    /// A remote target was given without a token
    #[error("KV_ACCESS_TOKEN environment variable (or --access-token) is required when connecting to a remote KV store")]
    MissingAccessToken,
}

/// Validated process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store to open
    pub target: Target,
    /// Token for remote targets
    pub access_token: Option<String>,
    /// Explicit log filter, if any
    pub log_filter: Option<String>,
}

impl Config {
    /// Validate parsed command-line matches.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let path = non_empty(matches.get_one::<String>("path")).ok_or(ConfigError::MissingPath)?;
        let target = Target::parse(path);

        let access_token = non_empty(matches.get_one::<String>("access-token")).map(str::to_string);
        if target.is_remote() && access_token.is_none() {
            return Err(ConfigError::MissingAccessToken);
        }

        Ok(Self {
            target,
            access_token,
            log_filter: non_empty(matches.get_one::<String>("log")).map(str::to_string),
        })
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Build the command-line interface.
pub fn build_cli() -> Command {
    Command::new("kv-mcp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("MCP tool server for a durable key-value store")
        .arg(
            Arg::new("path")
                .long("path")
                .value_name("TARGET")
                .env(PATH_ENV)
                .help("Store to open: ':memory:', a file path, or an http(s) URL"),
        )
        .arg(
            Arg::new("access-token")
                .long("access-token")
                .value_name("TOKEN")
                .env(ACCESS_TOKEN_ENV)
                .hide_env_values(true)
                .help("Access token for a remote store"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILTER")
                .env(LOG_ENV)
                .help("Log filter, e.g. 'info' or 'kvmcp_engine=debug' (logs go to stderr)"),
        )
}
