//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own
//! route, and every route shares the same `PathGuard`.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::security::PathGuard;

use super::definitions::{FileInfoTool, ListFilesTool, ReadFileTool, WriteFileTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(guard: Arc<PathGuard>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(ReadFileTool::create_route(guard.clone()))
        .with_route(WriteFileTool::create_route(guard.clone()))
        .with_route(ListFilesTool::create_route(guard.clone()))
        .with_route(FileInfoTool::create_route(guard))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::security::RootSet;

    struct TestServer {}

    fn test_guard() -> Arc<PathGuard> {
        let base = std::env::temp_dir();
        Arc::new(PathGuard::new(RootSet::new([&base], None, &base), None, base))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_guard());
        let tools = router.list_all();
        assert_eq!(tools.len(), 4);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"read_file"));
        assert!(names.contains(&"write_file"));
        assert!(names.contains(&"list_files"));
        assert!(names.contains(&"file_info"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let guard = test_guard();
        let registry = ToolRegistry::new(guard.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(guard);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
