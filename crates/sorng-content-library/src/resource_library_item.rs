//! `vsphere_content_library_item` resource.

use crate::error::ContentLibraryResult;
use crate::schema::{Attribute, AttributeType, ResourceData, ResourceSchema};
use crate::service::ContentLibraryService;

pub const TYPE_NAME: &str = "vsphere_content_library_item";

pub fn schema() -> ResourceSchema {
    ResourceSchema {
        type_name: TYPE_NAME,
        attributes: vec![
            Attribute::required("name", AttributeType::String, "The name of the content library item."),
            Attribute::required(
                "library_id",
                AttributeType::String,
                "ID of the content library to contain the item.",
            ),
            Attribute::optional(
                "description",
                AttributeType::String,
                "Optional description of the content library item.",
            ),
            Attribute::required(
                "file_url",
                AttributeType::StringSet,
                "URIs of the files to upload into the item.",
            ),
            Attribute::optional("type", AttributeType::String, "Type of content library item.")
                .with_default("ovf"),
        ],
    }
}

pub async fn create(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let lib = svc.libraries().from_id(d.get_str("library_id")).await?;
    let files: Vec<String> = d.get_set("file_url").into_iter().collect();
    let id = svc
        .items()
        .create_library_item(
            &lib,
            d.get_str("name"),
            d.get_str("description"),
            d.get_str("type"),
            &files,
        )
        .await?;
    d.set_id(id);
    read(svc, d).await
}

pub async fn read(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let item = svc.items().item_from_id(d.id()).await?;
    d.set_str("name", item.name.as_str());
    d.set_str("description", item.description.as_str());
    d.set_str("library_id", item.library_id.as_str());
    if !item.item_type.is_empty() {
        d.set_str("type", item.item_type.as_str());
    }
    Ok(())
}

/// Only name and description change in place; the item keeps its content.
pub async fn update(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let lib = svc.libraries().from_id(d.get_str("library_id")).await?;
    let items = svc.items();
    let item = items.item_from_id(d.id()).await?;
    items
        .update_library_item(&lib, &item, d.get_str("name"), d.get_str("description"))
        .await?;
    read(svc, d).await
}

pub async fn delete(svc: &ContentLibraryService, d: &mut ResourceData) -> ContentLibraryResult<()> {
    let items = svc.items();
    let item = items.item_from_id(d.id()).await?;
    items.delete_library_item(&item).await?;
    d.set_id("");
    Ok(())
}

pub async fn exists(svc: &ContentLibraryService, d: &ResourceData) -> bool {
    svc.items().is_content_library_item(d.id()).await
}
