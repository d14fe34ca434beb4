//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - URI (or URI template) and metadata
//! - A reader producing its content
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement `ResourceDefinition` (fixed URI) or
//!    `ResourceTemplateDefinition` (parameterized URI)
//! 3. Export it here
//! 4. Register in `registry.rs`

mod directory_listing;
mod file_contents;
mod server_info;

pub use directory_listing::DirectoryListingResource;
pub use file_contents::FileContentsResource;
pub use server_info::ServerInfoResource;

use super::error::ResourceError;
use crate::core::config::ServerConfig;
use crate::core::security::PathGuard;

/// Content returned by a resource reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceBody {
    /// UTF-8 text.
    Text(String),

    /// Raw bytes, delivered base64 encoded.
    Binary(Vec<u8>),
}

/// What a reader may use to produce content.
pub struct ResourceContext<'a> {
    pub guard: &'a PathGuard,
    pub server: &'a ServerConfig,
}

/// A resource with a fixed URI.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Produce the current content.
    fn read(ctx: &ResourceContext<'_>) -> Result<ResourceBody, ResourceError>;
}

/// A family of resources addressed as `<PREFIX><target>`.
pub trait ResourceTemplateDefinition {
    /// RFC 6570 template advertised to clients.
    const URI_TEMPLATE: &'static str;

    /// Literal URI prefix; the remainder of the URI is the target.
    const PREFIX: &'static str;

    const NAME: &'static str;

    const TITLE: &'static str;

    const DESCRIPTION: &'static str;

    const MIME_TYPE: &'static str;

    /// Produce the content for `target` (the URI without its prefix).
    fn read(target: &str, ctx: &ResourceContext<'_>) -> Result<ResourceBody, ResourceError>;
}
