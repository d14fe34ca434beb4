//! Write file tool definition.
//!
//! Writes text to a file inside the allowed roots, creating parent
//! directories as needed and replacing any previous content.

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

/// Parameters for the write file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// Path where the file should be written.
    pub path: String,

    /// Text content to write to the file.
    pub content: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Write file tool - creates or overwrites a text file.
pub struct WriteFileTool;

impl WriteFileTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "write_file";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Write content to a text file, creating missing parent directories. Existing content is replaced.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path, bytes = params.content.len()))]
    pub fn execute(params: &WriteFileParams, guard: &PathGuard) -> CallToolResult {
        info!("Write file tool called for path: {}", params.path);

        let outcome = operations::write_text(guard, &params.path, &params.content)
            .map(|written| format!("Successfully wrote {} bytes to {}", written, params.path));
        text_result(outcome)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        guard: Arc<PathGuard>,
    ) -> Result<serde_json::Value, String> {
        let params: WriteFileParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments for {}: {}", Self::NAME, e))?;

        let result = Self::execute(&params, &guard);
        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<WriteFileParams>(),
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
                let params: WriteFileParams =
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::security::RootSet;
    use crate::domains::tools::definitions::result_text;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathGuard) {
        let temp = TempDir::new().unwrap();
        let base = temp.path().canonicalize().unwrap();
        fs::create_dir(base.join("data")).unwrap();
        let roots = RootSet::new([base.join("data")], None, &base);
        (temp, PathGuard::new(roots, None, base))
    }

    #[test]
    fn test_write_file_reports_bytes() {
        let (temp, guard) = setup();

        let params = WriteFileParams {
            path: "data/sub/new.txt".to_string(),
            content: "hello".to_string(),
        };
        let result = WriteFileTool::execute(&params, &guard);

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(
            result_text(&result),
            "Successfully wrote 5 bytes to data/sub/new.txt"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("data/sub/new.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_write_file_counts_utf8_bytes() {
        let (_temp, guard) = setup();

        let params = WriteFileParams {
            path: "data/accent.txt".to_string(),
            content: "caf\u{e9}".to_string(),
        };
        let result = WriteFileTool::execute(&params, &guard);
        assert!(result_text(&result).starts_with("Successfully wrote 5 bytes"));
    }

    #[test]
    fn test_write_file_outside_roots() {
        let (temp, guard) = setup();

        let params = WriteFileParams {
            path: "elsewhere/evil.txt".to_string(),
            content: "x".to_string(),
        };
        let result = WriteFileTool::execute(&params, &guard);

        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).starts_with("Error:"));
        assert!(!temp.path().join("elsewhere").exists());
    }

    #[test]
    fn test_write_file_onto_directory_fails() {
        let (_temp, guard) = setup();

        let params = WriteFileParams {
            path: "data".to_string(),
            content: "x".to_string(),
        };
        let result = WriteFileTool::execute(&params, &guard);
        assert!(result.is_error.unwrap_or(false));
    }
}
