//! `vsphere_content_library` resource.

use crate::error::ContentLibraryResult;
use crate::library::{expand_storage_backings, flatten_storage_backings};
use crate::schema::{Attribute, AttributeType, ResourceData, ResourceSchema};
use crate::service::ContentLibraryService;

pub const TYPE_NAME: &str = "vsphere_content_library";

pub fn schema() -> ResourceSchema {
    ResourceSchema {
        type_name: TYPE_NAME,
        attributes: vec![
            Attribute::required("name", AttributeType::String, "The name of the content library."),
            Attribute::optional(
                "description",
                AttributeType::String,
                "Optional description of the content library.",
            ),
            Attribute::required(
                "storage_backing",
                AttributeType::StringSet,
                "IDs of the datastores backing the content library.",
            ),
        ],
    }
}

pub async fn create(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let backings = expand_storage_backings(d.get_set("storage_backing"));
    let id = svc
        .libraries()
        .create_library(d.get_str("name"), d.get_str("description"), backings)
        .await?;
    d.set_id(id);
    read(svc, d).await
}

pub async fn read(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let lib = svc.libraries().from_name(d.get_str("name")).await?;
    d.set_id(lib.id());
    d.set_str("name", lib.name.as_str());
    d.set_str("description", lib.description.as_str());
    d.set_set("storage_backing", flatten_storage_backings(&lib.storage_backings));
    Ok(())
}

pub async fn update(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let libraries = svc.libraries();
    let lib = libraries.from_id(d.id()).await?;
    let backings = expand_storage_backings(d.get_set("storage_backing"));
    libraries
        .update_library(&lib, d.get_str("name"), d.get_str("description"), &backings)
        .await?;
    read(svc, d).await
}

pub async fn delete(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let libraries = svc.libraries();
    let lib = libraries.from_name(d.get_str("name")).await?;
    libraries.delete_library(&lib).await?;
    d.set_id("");
    Ok(())
}
