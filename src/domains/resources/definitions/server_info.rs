//! Server info resource definition.

use super::{ResourceBody, ResourceContext, ResourceDefinition};
use crate::domains::resources::error::ResourceError;

/// Server information resource: name, version and the allowed roots.
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "mcp://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str =
        "Information about this MCP server, including the directories it may access";
    const MIME_TYPE: &'static str = "application/json";

    fn read(ctx: &ResourceContext<'_>) -> Result<ResourceBody, ResourceError> {
        let roots: Vec<String> = ctx
            .guard
            .roots()
            .iter()
            .map(|r| r.display().to_string())
            .collect();

        let info = serde_json::json!({
            "server": ctx.server.name,
            "version": ctx.server.version,
            "allowed_roots": roots,
        });

        serde_json::to_string_pretty(&info)
            .map(ResourceBody::Text)
            .map_err(|e| ResourceError::internal(e.to_string()))
    }
}
