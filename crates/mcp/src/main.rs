//! kv-mcp server binary.
//!
//! Reads configuration from flags or the environment, opens the store,
//! serves MCP over stdio, and closes the store when stdin closes. Stdout is
//! reserved for protocol traffic; logs go to stderr.

use std::process;

use anyhow::Context;
use kvmcp_executor::Executor;
use kvmcp_mcp::{build_cli, Config, McpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    init_tracing(config.log_filter.as_deref());

    if let Err(e) = run(config).await {
        error!(error = %format!("{:#}", e), "server stopped");
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

async fn run(config: Config) -> anyhow::Result<()> {
    let engine = kvmcp_engine::open(&config.target)
        .with_context(|| format!("failed to open KV store at {}", config.target))?;
    info!(store = %config.target, "kv store opened");

    let server = McpServer::new(Executor::new(engine.clone()));
    info!("serving MCP on stdio");
    let served = server.run_stdio().await;

    engine.close().await.context("failed to close KV store")?;
    info!("kv store closed");

    served.context("MCP transport failed")
}
