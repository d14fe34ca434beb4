//! Directory listing resource template (`dir://{directory}`).

use super::{ResourceBody, ResourceContext, ResourceTemplateDefinition};
use crate::core::files::{format, operations};
use crate::domains::resources::error::ResourceError;

/// Listing of a directory with a folder/file marker and size per entry.
pub struct DirectoryListingResource;

impl ResourceTemplateDefinition for DirectoryListingResource {
    const URI_TEMPLATE: &'static str = "dir://{directory}";
    const PREFIX: &'static str = "dir://";
    const NAME: &'static str = "Directory Listing";
    const TITLE: &'static str = "List a Directory";
    const DESCRIPTION: &'static str =
        "Entries of a directory inside the allowed directories, with sizes";
    const MIME_TYPE: &'static str = "text/plain";

    fn read(target: &str, ctx: &ResourceContext<'_>) -> Result<ResourceBody, ResourceError> {
        let entries = operations::list_entries(ctx.guard, target)?;
        Ok(ResourceBody::Text(format::directory_listing(target, &entries)))
    }
}
