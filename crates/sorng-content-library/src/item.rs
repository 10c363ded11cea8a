//! Content library item operations.

use crate::api::ContentLibraryApi;
use crate::clock::Clock;
use crate::config::UploadSettings;
use crate::error::{ContentLibraryError, ContentLibraryResult};
use crate::library::single_match;
use crate::types::*;
use crate::upload::ItemUpload;

/// Library item lookup and lifecycle.
pub struct ItemManager<'a> {
    api: &'a dyn ContentLibraryApi,
    clock: &'a dyn Clock,
    settings: &'a UploadSettings,
}

impl<'a> ItemManager<'a> {
    pub fn new(
        api: &'a dyn ContentLibraryApi,
        clock: &'a dyn Clock,
        settings: &'a UploadSettings,
    ) -> Self {
        Self { api, clock, settings }
    }

    /// Find the item named exactly `name` inside `library`.
    pub async fn item_from_name(
        &self,
        library: &Library,
        name: &str,
    ) -> ContentLibraryResult<LibraryItem> {
        let ids = self.api.find_library_items(library.id(), name).await?;
        let mut matches = Vec::new();
        for id in &ids {
            if let Some(item) = self.api.get_library_item(id).await? {
                if item.name == name {
                    matches.push(item);
                }
            }
        }
        single_match(
            matches,
            || format!("content library item ({name})"),
            |i| i.id().to_string(),
        )
    }

    pub async fn item_from_id(&self, id: &str) -> ContentLibraryResult<LibraryItem> {
        self.api.get_library_item(id).await?.ok_or_else(|| {
            ContentLibraryError::not_found(format!("Unable to find content library item ({id})"))
        })
    }

    /// Whether `id` names an existing item. Lookup errors count as "no".
    pub async fn is_content_library_item(&self, id: &str) -> bool {
        match self.item_from_id(id).await {
            Ok(_) => true,
            Err(e) => {
                log::debug!("{id} is not a content library item: {e}");
                false
            }
        }
    }

    /// Create an item in `library` and upload `files` into it.
    pub async fn create_library_item(
        &self,
        library: &Library,
        name: &str,
        description: &str,
        item_type: &str,
        files: &[String],
    ) -> ContentLibraryResult<String> {
        let spec = LibraryItem {
            id: None,
            library_id: library.id().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            item_type: item_type.to_string(),
        };
        ItemUpload::new(self.api, self.clock, self.settings)
            .run(&spec, files, |p| {
                log::debug!(
                    "Waiting for {name}: {}/{} files ready after {}s",
                    p.ready_files,
                    p.total_files,
                    p.elapsed.as_secs()
                )
            })
            .await
    }

    /// Rename / re-describe an existing item in place.
    pub async fn update_library_item(
        &self,
        library: &Library,
        item: &LibraryItem,
        name: &str,
        description: &str,
    ) -> ContentLibraryResult<String> {
        let spec = LibraryItem {
            id: item.id.clone(),
            library_id: library.id().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            item_type: String::new(),
        };
        self.api.create_library_item(&spec).await
    }

    pub async fn delete_library_item(&self, item: &LibraryItem) -> ContentLibraryResult<()> {
        self.api.delete_library_item(item.id()).await?;
        log::info!("Deleted content library item {} ({})", item.name, item.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockContentLibraryApi;
    use crate::clock::ManualClock;
    use crate::error::ContentLibraryErrorKind;

    fn library() -> Library {
        Library {
            id: Some("lib-1".into()),
            name: "templates".into(),
            ..Default::default()
        }
    }

    fn item(id: &str, name: &str) -> LibraryItem {
        LibraryItem {
            id: Some(id.into()),
            library_id: "lib-1".into(),
            name: name.into(),
            description: "golden".into(),
            item_type: "ovf".into(),
        }
    }

    #[tokio::test]
    async fn item_from_name_finds_in_library() {
        let mut api = MockContentLibraryApi::new();
        api.expect_find_library_items()
            .withf(|lib, name| lib == "lib-1" && name == "base-ovf")
            .returning(|_, _| Ok(vec!["item-1".into()]));
        api.expect_get_library_item()
            .returning(|id| Ok(Some(item(id, "base-ovf"))));
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());

        let found = ItemManager::new(&api, &clock, &settings)
            .item_from_name(&library(), "base-ovf")
            .await
            .unwrap();
        assert_eq!(found.id(), "item-1");
    }

    #[tokio::test]
    async fn item_from_name_ignores_other_casings() {
        let mut api = MockContentLibraryApi::new();
        api.expect_find_library_items()
            .returning(|_, _| Ok(vec!["item-1".into(), "item-2".into()]));
        api.expect_get_library_item().returning(|id| match id {
            "item-1" => Ok(Some(item("item-1", "Base-OVF"))),
            _ => Ok(Some(item(id, "base-ovf"))),
        });
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());

        let found = ItemManager::new(&api, &clock, &settings)
            .item_from_name(&library(), "base-ovf")
            .await
            .unwrap();
        assert_eq!(found.id(), "item-2");
    }

    #[tokio::test]
    async fn item_from_name_duplicates_are_ambiguous() {
        let mut api = MockContentLibraryApi::new();
        api.expect_find_library_items()
            .returning(|_, _| Ok(vec!["item-1".into(), "item-2".into()]));
        api.expect_get_library_item()
            .returning(|id| Ok(Some(item(id, "base-ovf"))));
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());

        let err = ItemManager::new(&api, &clock, &settings)
            .item_from_name(&library(), "base-ovf")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ContentLibraryErrorKind::Ambiguous);
        assert!(err.message.contains("item-1"));
        assert!(err.message.contains("item-2"));
    }

    #[tokio::test]
    async fn item_from_name_propagates_find_errors() {
        let mut api = MockContentLibraryApi::new();
        api.expect_find_library_items()
            .returning(|_, _| Err(ContentLibraryError::api(500, "find failed")));
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());

        let err = ItemManager::new(&api, &clock, &settings)
            .item_from_name(&library(), "base-ovf")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ContentLibraryErrorKind::ApiError(500));
    }

    #[tokio::test]
    async fn item_from_name_none_is_not_found() {
        let mut api = MockContentLibraryApi::new();
        api.expect_find_library_items().returning(|_, _| Ok(vec![]));
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());

        let err = ItemManager::new(&api, &clock, &settings)
            .item_from_name(&library(), "base-ovf")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.message.contains("content library item (base-ovf)"));
    }

    #[tokio::test]
    async fn exists_true_only_for_found_item() {
        let mut api = MockContentLibraryApi::new();
        api.expect_get_library_item().returning(|id| match id {
            "item-1" => Ok(Some(item("item-1", "base-ovf"))),
            "item-2" => Ok(None),
            _ => Err(ContentLibraryError::connection("reset by peer")),
        });
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());
        let items = ItemManager::new(&api, &clock, &settings);

        assert!(items.is_content_library_item("item-1").await);
        assert!(!items.is_content_library_item("item-2").await);
        assert!(!items.is_content_library_item("item-3").await);
    }

    #[tokio::test]
    async fn update_reuses_create_with_existing_id() {
        let mut api = MockContentLibraryApi::new();
        api.expect_create_library_item()
            .withf(|spec| {
                spec.id.as_deref() == Some("item-1")
                    && spec.name == "base-ovf-v2"
                    && spec.description == "refreshed"
                    && spec.library_id == "lib-1"
            })
            .times(1)
            .returning(|spec| Ok(spec.id().to_string()));
        api.expect_create_update_session().never();
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());

        let id = ItemManager::new(&api, &clock, &settings)
            .update_library_item(&library(), &item("item-1", "base-ovf"), "base-ovf-v2", "refreshed")
            .await
            .unwrap();
        assert_eq!(id, "item-1");
    }

    #[tokio::test]
    async fn delete_uses_item_id() {
        let mut api = MockContentLibraryApi::new();
        api.expect_delete_library_item()
            .withf(|id| id == "item-1")
            .times(1)
            .returning(|_| Ok(()));
        let (clock, settings) = (ManualClock::new(), UploadSettings::default());

        ItemManager::new(&api, &clock, &settings)
            .delete_library_item(&item("item-1", "base-ovf"))
            .await
            .unwrap();
    }
}
