//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::security::PathGuard;

#[cfg(feature = "http")]
use super::error::ToolError;
use super::definitions::{FileInfoTool, ListFilesTool, ReadFileTool, WriteFileTool};

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    guard: Arc<PathGuard>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(guard: Arc<PathGuard>) -> Self {
        Self { guard }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            ReadFileTool::NAME,
            WriteFileTool::NAME,
            ListFilesTool::NAME,
            FileInfoTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            ReadFileTool::to_tool(),
            WriteFileTool::to_tool(),
            ListFilesTool::to_tool(),
            FileInfoTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let guard = self.guard.clone();
        let outcome = match name {
            ReadFileTool::NAME => ReadFileTool::http_handler(arguments, guard),
            WriteFileTool::NAME => WriteFileTool::http_handler(arguments, guard),
            ListFilesTool::NAME => ListFilesTool::http_handler(arguments, guard),
            FileInfoTool::NAME => FileInfoTool::http_handler(arguments, guard),
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::not_found(name));
            }
        };
        outcome.map_err(ToolError::invalid_arguments)
    }
}
