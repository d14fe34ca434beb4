//! Read file tool definition.
//!
//! Returns the full contents of a text file inside the allowed roots.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::files::operations;
use crate::core::security::PathGuard;
use crate::domains::tools::definitions::text_result;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the read file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// Path to the file to read.
    pub path: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Read file tool - returns the contents of a text file.
pub struct ReadFileTool;

impl ReadFileTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "read_file";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Read and return the contents of a text file. The path must be inside one of the allowed directories.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &ReadFileParams, guard: &PathGuard) -> CallToolResult {
        info!("Read file tool called for path: {}", params.path);
        text_result(operations::read_text(guard, &params.path))
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        guard: Arc<PathGuard>,
    ) -> Result<serde_json::Value, String> {
        let params: ReadFileParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments for {}: {}", Self::NAME, e))?;

        let result = Self::execute(&params, &guard);
        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ReadFileParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(guard: Arc<PathGuard>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let guard = guard.clone();
            async move {
                let params: ReadFileParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &guard))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
