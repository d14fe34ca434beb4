//! File contents resource template (`file://{path}`).

use super::{ResourceBody, ResourceContext, ResourceTemplateDefinition};
use crate::core::files::operations;
use crate::domains::resources::error::ResourceError;

/// Raw contents of a file inside the allowed roots.
///
/// Text files are delivered as text, anything that is not UTF-8 as a blob.
pub struct FileContentsResource;

impl ResourceTemplateDefinition for FileContentsResource {
    const URI_TEMPLATE: &'static str = "file://{path}";
    const PREFIX: &'static str = "file://";
    const NAME: &'static str = "File Contents";
    const TITLE: &'static str = "Read a File";
    const DESCRIPTION: &'static str =
        "Contents of a file inside the allowed directories, e.g. file:///home/me/Documents/notes.txt";
    const MIME_TYPE: &'static str = "text/plain";

    fn read(target: &str, ctx: &ResourceContext<'_>) -> Result<ResourceBody, ResourceError> {
        let bytes = operations::read_bytes(ctx.guard, target)?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => ResourceBody::Text(text),
            Err(e) => ResourceBody::Binary(e.into_bytes()),
        })
    }
}
