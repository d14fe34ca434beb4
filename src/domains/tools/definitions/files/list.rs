//! List files tool definition.
//!
//! Lists the base names of directory entries matching a glob pattern.

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

use crate::core::files::{format, operations};
use crate::core::security::PathGuard;
use crate::domains::tools::definitions::text_result;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the list files tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListFilesParams {
    /// Directory to list files from.
    pub directory: String,

    /// Glob pattern to match file names (default: "*").
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "*".to_string()
}

// ============================================================================
// Tool Definition
// ============================================================================

/// List files tool - lists entries of a directory matching a pattern.
pub struct ListFilesTool;

impl ListFilesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_files";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List files in a directory matching a glob pattern (default \"*\"). Returns one file name per line.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(directory = %params.directory, pattern = %params.pattern))]
    pub fn execute(params: &ListFilesParams, guard: &PathGuard) -> CallToolResult {
        info!(
            "List files tool called for {} with pattern {}",
            params.directory, params.pattern
        );

        let outcome = operations::list_matching(guard, &params.directory, &params.pattern)
            .map(|names| {
                info!("Matched {} entries in {}", names.len(), params.directory);
                format::matches(&params.directory, &params.pattern, &names)
            });
        text_result(outcome)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        guard: Arc<PathGuard>,
    ) -> Result<serde_json::Value, String> {
        let params: ListFilesParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments for {}: {}", Self::NAME, e))?;

        let result = Self::execute(&params, &guard);
        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListFilesParams>(),
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
                let params: ListFilesParams =
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
    fn test_pattern_defaults_to_star() {
        let params: ListFilesParams =
            serde_json::from_value(serde_json::json!({ "directory": "data" })).unwrap();
        assert_eq!(params.pattern, "*");
    }

    #[test]
    fn test_list_files_execute() {
        let (temp, guard) = setup();
        fs::write(temp.path().join("data/report.csv"), "").unwrap();
        fs::write(temp.path().join("data/notes.txt"), "").unwrap();

        let params = ListFilesParams {
            directory: "data".to_string(),
            pattern: "*".to_string(),
        };
        let result = ListFilesTool::execute(&params, &guard);

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(
            result_text(&result),
            "Files in data matching '*':\nnotes.txt\nreport.csv"
        );
    }

    #[test]
    fn test_list_files_no_matches() {
        let (temp, guard) = setup();
        fs::write(temp.path().join("data/notes.txt"), "").unwrap();

        let params = ListFilesParams {
            directory: "data".to_string(),
            pattern: "*.pdf".to_string(),
        };
        let result = ListFilesTool::execute(&params, &guard);

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(
            result_text(&result),
            "No files matching '*.pdf' found in data"
        );
    }

    #[test]
    fn test_list_files_not_a_directory() {
        let (temp, guard) = setup();
        fs::write(temp.path().join("data/notes.txt"), "").unwrap();

        let params = ListFilesParams {
            directory: "data/notes.txt".to_string(),
            pattern: "*".to_string(),
        };
        let result = ListFilesTool::execute(&params, &guard);

        assert!(result.is_error.unwrap_or(false));
        assert_eq!(
            result_text(&result),
            "Error: 'data/notes.txt' is not a directory"
        );
    }

    #[test]
    fn test_list_files_outside_roots() {
        let (_temp, guard) = setup();
        let params = ListFilesParams {
            directory: "/etc".to_string(),
            pattern: "*".to_string(),
        };
        let result = ListFilesTool::execute(&params, &guard);
        assert!(result_text(&result).starts_with("Error: Path '/etc' is outside"));
    }
}
