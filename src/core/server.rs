//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services. Every service shares
//! one `PathGuard`, built once from the configured roots.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built in `domains/tools/router.rs`.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::{Config, ServerConfig};
use super::security::PathGuard;
use crate::domains::{
    prompts::PromptService,
    resources::{ResourceError, ResourceService},
    tools::build_tool_router,
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    server: Arc<ServerConfig>,

    /// Confinement shared by tools and resources.
    guard: Arc<PathGuard>,

    resource_service: Arc<ResourceService>,

    prompt_service: Arc<PromptService>,

    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server, resolving the configured roots.
    pub fn new(config: Config) -> crate::Result<Self> {
        let guard = PathGuard::from_config(&config.security)?;
        Ok(Self::with_guard(config.server, guard))
    }

    /// Create a server around an already built guard.
    pub fn with_guard(server: ServerConfig, guard: PathGuard) -> Self {
        let guard = Arc::new(guard);
        let resource_service = Arc::new(ResourceService::new(guard.clone(), server.clone()));

        Self {
            tool_router: build_tool_router::<Self>(guard.clone()),
            server: Arc::new(server),
            guard,
            resource_service,
            prompt_service: Arc::new(PromptService::new()),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.server.version
    }

    pub fn guard(&self) -> &Arc<PathGuard> {
        &self.guard
    }

    fn instructions(&self) -> String {
        format!(
            "Filesystem server confined to these directories: {}. \
             Use read_file, write_file, list_files and file_info with paths inside them; \
             anything else is refused.",
            self.guard.roots().display_list()
        )
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        ToolRegistry::new(self.guard.clone())
            .call_tool(name, arguments)
            .map_err(|e| e.to_string())
    }

    /// List all available resources (for HTTP transport).
    pub async fn list_resources(&self) -> Vec<serde_json::Value> {
        self.resource_service
            .list_resources()
            .await
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.raw.uri,
                    "name": r.raw.name,
                    "description": r.raw.description,
                    "mimeType": r.raw.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI (for HTTP transport).
    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, String> {
        self.resource_service
            .read_resource(uri)
            .await
            .map(|result| serde_json::json!({ "contents": result.contents }))
            .map_err(|e| format!("Error: {e}"))
    }

    /// List all available resource templates (for HTTP transport).
    pub async fn list_resource_templates(&self) -> Vec<serde_json::Value> {
        self.resource_service
            .list_resource_templates()
            .await
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "uriTemplate": t.raw.uri_template,
                    "name": t.raw.name,
                    "title": t.raw.title,
                    "description": t.raw.description,
                    "mimeType": t.raw.mime_type
                })
            })
            .collect()
    }

    /// List all available prompts (for HTTP transport).
    pub async fn list_prompts(&self) -> Vec<serde_json::Value> {
        self.prompt_service
            .list_prompts()
            .await
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "title": p.title,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect()
    }

    /// Get a prompt by name (for HTTP transport).
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, String> {
        let args = arguments.and_then(|v| {
            v.as_object().map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
        });

        self.prompt_service
            .get_prompt(name, args)
            .await
            .map(|result| {
                serde_json::json!({
                    "description": result.description,
                    "messages": result.messages
                })
            })
            .map_err(|e| e.to_string())
    }
}

fn resource_error_to_mcp(error: ResourceError) -> McpError {
    let message = format!("Error: {error}");
    match &error {
        e if e.is_not_found() => McpError::resource_not_found(message, None),
        ResourceError::InvalidUri(_) => McpError::invalid_params(message, None),
        ResourceError::Fs(fs) if fs.is_rejection() => McpError::invalid_params(message, None),
        _ => McpError::internal_error(message, None),
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.server.name.clone(),
                version: self.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(self.instructions()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        let templates = self.resource_service.list_resource_templates().await;
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(resource_error_to_mcp)
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.map(|map| {
            map.into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect()
        });
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::security::RootSet;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, McpServer, String) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("docs");
        fs::create_dir(&root).unwrap();
        let root = root.canonicalize().unwrap();

        let guard = PathGuard::new(
            RootSet::new([&root], None, temp.path()),
            None,
            temp.path().to_path_buf(),
        );
        let server = ServerConfig {
            name: "fs-test".to_string(),
            version: "0.1.0".to_string(),
        };
        (
            temp,
            McpServer::with_guard(server, guard),
            root.display().to_string(),
        )
    }

    #[test]
    fn test_server_identity() {
        let (_temp, server, _) = setup();
        assert_eq!(server.name(), "fs-test");
        assert_eq!(server.version(), "0.1.0");
    }

    #[test]
    fn test_get_info_mentions_roots() {
        let (_temp, server, root) = setup();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "fs-test");
        assert!(info.instructions.unwrap().contains(&root));
    }

    #[test]
    fn test_list_tools() {
        let (_temp, server, _) = setup();
        let names: Vec<String> = server
            .list_tools()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names.len(), 4);
        for expected in ["read_file", "write_file", "list_files", "file_info"] {
            assert!(names.iter().any(|n| n == expected));
        }
    }

    #[tokio::test]
    async fn test_read_resource_outside_roots() {
        let (temp, server, _) = setup();
        let uri = format!("file://{}/other.txt", temp.path().display());

        let err = server.read_resource(&uri).await.unwrap_err();
        assert!(err.starts_with("Error: Path '"));
        assert!(err.contains("is outside of allowed directories"));
    }

    #[tokio::test]
    async fn test_list_resources_and_prompts() {
        let (_temp, server, _) = setup();

        let resources = server.list_resources().await;
        assert_eq!(resources[0]["uri"], "mcp://server/info");

        let templates = server.list_resource_templates().await;
        assert_eq!(templates.len(), 2);

        let prompts = server.list_prompts().await;
        assert_eq!(prompts[0]["name"], "organize_files");
    }

    #[test]
    fn test_get_prompt_via_json_arguments() {
        let (_temp, server, _) = setup();

        let result = tokio_test::block_on(server.get_prompt(
            "organize_files",
            Some(serde_json::json!({ "directory": "/tmp/inbox" })),
        ))
        .unwrap();
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("\"/tmp/inbox\""));
    }

    #[test]
    fn test_resource_error_mapping() {
        let not_found = resource_error_to_mcp(ResourceError::not_found("x://y"));
        assert_eq!(not_found.code, ErrorCode::RESOURCE_NOT_FOUND);

        let invalid = resource_error_to_mcp(ResourceError::invalid_uri("file://"));
        assert_eq!(invalid.code, ErrorCode::INVALID_PARAMS);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_call_tool_round_trip() {
        let (_temp, server, root) = setup();
        let path = format!("{root}/note.txt");

        server
            .call_tool(
                "write_file",
                serde_json::json!({ "path": path, "content": "hi" }),
            )
            .await
            .unwrap();
        let result = server
            .call_tool("read_file", serde_json::json!({ "path": path }))
            .await
            .unwrap();
        assert_eq!(result["content"][0]["text"], "hi");
    }
}
