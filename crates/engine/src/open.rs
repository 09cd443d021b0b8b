//! Opening an engine from a connection target.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::{EngineError, KvEngine, MemoryEngine, Result};

/// Where the engine lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Purely in-memory, nothing persisted (`:memory:`)
    Memory,
    /// Log-backed engine at a local path
    Local(PathBuf),
    /// Remote engine reached over HTTP(S)
    Remote(String),
}

impl Target {
    /// Classify a connection string.
    ///
    /// ```
    /// use kvmcp_engine::Target;
    ///
    /// assert_eq!(Target::parse(":memory:"), Target::Memory);
    /// assert!(Target::parse("https://kv.example.com/db").is_remote());
    /// assert!(matches!(Target::parse("./data/kv.log"), Target::Local(_)));
    /// ```
    pub fn parse(target: &str) -> Self {
        if target == ":memory:" {
            Target::Memory
        } else if target.starts_with("http://") || target.starts_with("https://") {
            Target::Remote(target.to_string())
        } else {
            Target::Local(PathBuf::from(target))
        }
    }

    /// True if the target needs network access and credentials
    pub fn is_remote(&self) -> bool {
        matches!(self, Target::Remote(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Memory => f.write_str(":memory:"),
            Target::Local(path) => write!(f, "{}", path.display()),
            Target::Remote(url) => f.write_str(url),
        }
    }
}

/// Open the engine named by `target`.
///
/// The returned handle is meant to be opened once per process and shared by
/// every operation until [`KvEngine::close`] is called at shutdown.
pub fn open(target: &Target) -> Result<Arc<dyn KvEngine>> {
    let engine: Arc<dyn KvEngine> = match target {
        Target::Memory => Arc::new(MemoryEngine::new()),
        Target::Local(path) => Arc::new(MemoryEngine::open_log(path)?),
        Target::Remote(url) => {
            return Err(EngineError::Unsupported(format!(
                "remote engine at {} (this build serves :memory: and local paths)",
                url
            )))
        }
    };
    info!(%target, "opened engine");
    Ok(engine)
}
