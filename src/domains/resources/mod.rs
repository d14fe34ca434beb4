//! Resources domain module.
//!
//! Resources expose read-only views of the confined filesystem to MCP
//! clients: file contents, directory listings and server information.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - Central resource registration
//! - `service.rs` - Resource service for listing and reading
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement `ResourceDefinition` or `ResourceTemplateDefinition`
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::{ResourceBody, ResourceDefinition, ResourceTemplateDefinition};
pub use error::ResourceError;
pub use registry::{get_all_resource_templates, get_all_resources};
pub use service::{ResourceEntry, ResourceService, TemplateEntry};
