//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access. Fixed resources
//! are looked up by exact URI, everything else by template prefix.
//!
//! Resources are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new resource does NOT require modifying this file.

use base64::Engine;
use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::definitions::{ResourceBody, ResourceContext};
use super::error::ResourceError;
use super::registry::{get_all_resource_templates, get_all_resources};
use crate::core::config::ServerConfig;
use crate::core::security::PathGuard;

/// Reader for a fixed resource.
pub type ResourceReader = fn(&ResourceContext<'_>) -> Result<ResourceBody, ResourceError>;

/// Reader for a templated resource, given the URI remainder.
pub type TemplateReader = fn(&str, &ResourceContext<'_>) -> Result<ResourceBody, ResourceError>;

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// Produces the content on each read.
    pub reader: ResourceReader,
}

/// A registered resource template.
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub template: ResourceTemplate,

    /// Literal URI prefix handled by this template.
    pub prefix: &'static str,

    pub reader: TemplateReader,
}

/// Service for listing and reading resources.
pub struct ResourceService {
    guard: Arc<PathGuard>,
    server: ServerConfig,

    /// Key: resource URI.
    resources: HashMap<String, ResourceEntry>,

    templates: Vec<TemplateEntry>,
}

impl ResourceService {
    pub fn new(guard: Arc<PathGuard>, server: ServerConfig) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            guard,
            server,
            resources: HashMap::new(),
            templates: get_all_resource_templates(),
        };

        for entry in get_all_resources() {
            service.register_resource(entry);
        }

        service
    }

    /// Register a resource.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        info!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.iter().map(|t| t.template.clone()).collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let ctx = ResourceContext {
            guard: &self.guard,
            server: &self.server,
        };

        let (body, mime_type) = if let Some(entry) = self.resources.get(uri) {
            ((entry.reader)(&ctx)?, entry.resource.raw.mime_type.clone())
        } else {
            let template = self
                .templates
                .iter()
                .find(|t| uri.starts_with(t.prefix))
                .ok_or_else(|| ResourceError::not_found(uri))?;

            let target = &uri[template.prefix.len()..];
            if target.is_empty() {
                return Err(ResourceError::invalid_uri(uri));
            }
            debug!(uri, target, "Reading templated resource");

            (
                (template.reader)(target, &ctx)?,
                template.template.raw.mime_type.clone(),
            )
        };

        let content = match body {
            ResourceBody::Text(text) => ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type,
                text,
                meta: None,
            },
            ResourceBody::Binary(data) => ResourceContents::BlobResourceContents {
                uri: uri.to_string(),
                mime_type: Some("application/octet-stream".to_string()),
                blob: base64::engine::general_purpose::STANDARD.encode(data),
                meta: None,
            },
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::security::RootSet;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ResourceService, String) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("data");
        fs::create_dir(&root).unwrap();
        let root = root.canonicalize().unwrap();

        let guard = PathGuard::new(
            RootSet::new([&root], None, temp.path()),
            None,
            temp.path().to_path_buf(),
        );
        let server = ServerConfig {
            name: "test-server".to_string(),
            version: "0.0.0".to_string(),
        };
        let service = ResourceService::new(Arc::new(guard), server);
        (temp, service, root.display().to_string())
    }

    fn text_of(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            other => panic!("Expected text contents, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lists_fixed_resources_and_templates() {
        let (_temp, service, _) = setup();

        let resources = service.list_resources().await;
        assert_eq!(resources.len(), 1);

        let templates = service.list_resource_templates().await;
        assert_eq!(templates.len(), 2);
    }

    #[tokio::test]
    async fn test_read_server_info() {
        let (_temp, service, root) = setup();

        let result = service.read_resource("mcp://server/info").await.unwrap();
        let json: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(json["server"], "test-server");
        assert_eq!(json["allowed_roots"][0], root.as_str());
    }

    #[tokio::test]
    async fn test_read_file_resource() {
        let (_temp, service, root) = setup();
        fs::write(format!("{root}/notes.txt"), "hello").unwrap();

        let uri = format!("file://{root}/notes.txt");
        let result = service.read_resource(&uri).await.unwrap();
        assert_eq!(text_of(&result), "hello");
    }

    #[tokio::test]
    async fn test_read_binary_file_resource_as_blob() {
        let (_temp, service, root) = setup();
        fs::write(format!("{root}/image.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let uri = format!("file://{root}/image.bin");
        let result = service.read_resource(&uri).await.unwrap();
        match &result.contents[0] {
            ResourceContents::BlobResourceContents { blob, .. } => {
                assert_eq!(blob, "//4A");
            }
            other => panic!("Expected blob contents, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_directory_resource() {
        let (_temp, service, root) = setup();
        fs::create_dir(format!("{root}/sub")).unwrap();
        fs::write(format!("{root}/a.txt"), "abc").unwrap();

        let uri = format!("dir://{root}");
        let result = service.read_resource(&uri).await.unwrap();
        let text = text_of(&result);
        assert!(text.starts_with(&format!("Directory: {root}")));
        assert!(text.contains("📄 a.txt"));
        assert!(text.contains("📁 sub/"));
    }

    #[tokio::test]
    async fn test_file_resource_outside_roots_rejected() {
        let (temp, service, _) = setup();
        fs::write(temp.path().join("secret.txt"), "nope").unwrap();

        let uri = format!("file://{}/secret.txt", temp.path().display());
        let err = service.read_resource(&uri).await.unwrap_err();
        assert!(matches!(err, ResourceError::Fs(ref e) if e.is_rejection()));
    }

    #[tokio::test]
    async fn test_missing_file_resource_is_not_found() {
        let (_temp, service, root) = setup();

        let uri = format!("file://{root}/missing.txt");
        let err = service.read_resource(&uri).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_not_found() {
        let (_temp, service, _) = setup();

        let err = service.read_resource("ftp://example/x").await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_target_is_invalid() {
        let (_temp, service, _) = setup();

        let err = service.read_resource("file://").await.unwrap_err();
        assert!(matches!(err, ResourceError::InvalidUri(_)));
    }
}
