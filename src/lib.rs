//! Filesystem MCP Server Library
//!
//! A Model Context Protocol server that lets a client read, write, list and
//! inspect files, but only inside an allow-list of root directories. Every
//! path a client supplies goes through [`PathGuard`](core::PathGuard) before
//! the filesystem is touched.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, path confinement, the confined file
//!   operations, the server handler and the transports
//! - **domains**: the MCP surface
//!   - **tools**: `read_file`, `write_file`, `list_files`, `file_info`
//!   - **resources**: `file://`, `dir://` and server information
//!   - **prompts**: `organize_files`
//!
//! # Example
//!
//! ```rust,no_run
//! use filesystem_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::new(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
