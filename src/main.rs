//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, resolves the allowed roots and
//! serves over the configured transport.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use filesystem_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config).context("Failed to initialize the MCP server")?;

    let roots = server.guard().roots();
    if roots.is_empty() {
        warn!("No allowed roots resolved; every path will be refused");
    } else {
        info!("Allowed roots: {}", roots.display_list());
    }

    transport.run(server).await?;

    info!("Server shutting down");
    Ok(())
}

/// Log to stderr so stdout stays reserved for the STDIO transport.
///
/// `RUST_LOG` takes precedence over `MCP_LOG_LEVEL` when both are set.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
