//! STDIO transport: one MCP session over stdin/stdout.
//!
//! Stdout carries protocol frames only; all logging goes to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(TransportError::service)?;

        let reason = service.waiting().await.map_err(TransportError::service)?;

        info!("STDIO session ended: {:?}", reason);
        Ok(())
    }
}
