//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate};

use super::definitions::{
    DirectoryListingResource, FileContentsResource, ResourceDefinition,
    ResourceTemplateDefinition, ServerInfoResource,
};
use super::service::{ResourceEntry, TemplateEntry};

fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        reader: R::read,
    }
}

fn build_template<T: ResourceTemplateDefinition>() -> TemplateEntry {
    let template = RawResourceTemplate {
        uri_template: T::URI_TEMPLATE.to_string(),
        name: T::NAME.to_string(),
        title: Some(T::TITLE.to_string()),
        description: Some(T::DESCRIPTION.to_string()),
        mime_type: Some(T::MIME_TYPE.to_string()),
    }
    .no_annotation();

    TemplateEntry {
        template,
        prefix: T::PREFIX,
        reader: T::read,
    }
}

/// All resources with a fixed URI.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    vec![build_resource::<ServerInfoResource>()]
}

/// All parameterized resources (RFC 6570 URI templates).
pub fn get_all_resource_templates() -> Vec<TemplateEntry> {
    vec![
        build_template::<FileContentsResource>(),
        build_template::<DirectoryListingResource>(),
    ]
}
