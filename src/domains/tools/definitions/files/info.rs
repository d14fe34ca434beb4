//! File info tool definition.

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

/// Parameters for the file info tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileInfoParams {
    /// Path to the file.
    pub path: String,
}

/// File info tool - reports size, creation and modification time.
pub struct FileInfoTool;

impl FileInfoTool {
    pub const NAME: &'static str = "file_info";

    pub const DESCRIPTION: &'static str =
        "Get information about a file: size, creation time and modification time.";

    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &FileInfoParams, guard: &PathGuard) -> CallToolResult {
        info!("File info tool called for path: {}", params.path);

        let outcome = operations::stat(guard, &params.path)
            .map(|stat| format::file_info(&params.path, &stat));
        text_result(outcome)
    }

    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        guard: Arc<PathGuard>,
    ) -> Result<serde_json::Value, String> {
        let params: FileInfoParams = serde_json::from_value(arguments)
            .map_err(|e| format!("Invalid arguments for {}: {}", Self::NAME, e))?;

        let result = Self::execute(&params, &guard);
        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<FileInfoParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(guard: Arc<PathGuard>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let guard = guard.clone();
            async move {
                let params: FileInfoParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &guard))
            }
            .boxed()
        })
    }
}
