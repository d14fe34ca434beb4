//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod files;

pub use files::{FileInfoTool, ListFilesTool, ReadFileTool, WriteFileTool};

use rmcp::model::{CallToolResult, Content};
use tracing::warn;

use crate::core::files::FsError;

/// Convert an operation outcome into the text protocol spoken to clients.
///
/// Failures become a text result starting with `Error:` and flagged with
/// `isError`, so clients can rely on either signal.
pub(crate) fn text_result(outcome: Result<String, FsError>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            warn!("Tool failed: {}", e);
            CallToolResult::error(vec![Content::text(format!("Error: {}", e))])
        }
    }
}

/// Extract the text of the first content block of a tool result.
#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}
