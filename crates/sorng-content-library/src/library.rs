//! Content library directory operations: lookup, create, delete, and
//! storage-backing mapping.

use crate::api::ContentLibraryApi;
use crate::error::{ContentLibraryError, ContentLibraryResult};
use crate::types::*;

use std::collections::BTreeSet;

/// Library lookup and lifecycle against the remote API.
pub struct LibraryManager<'a> {
    api: &'a dyn ContentLibraryApi,
}

impl<'a> LibraryManager<'a> {
    pub fn new(api: &'a dyn ContentLibraryApi) -> Self {
        Self { api }
    }

    /// Find the library whose name is exactly `name`.
    pub async fn from_name(&self, name: &str) -> ContentLibraryResult<Library> {
        let ids = self.api.find_libraries(name).await?;
        let mut matches = Vec::new();
        for id in &ids {
            if let Some(lib) = self.api.get_library(id).await? {
                if lib.name == name {
                    matches.push(lib);
                }
            }
        }
        single_match(matches, || format!("content library ({name})"), |l| l.id().to_string())
    }

    /// Fetch a library by identifier.
    pub async fn from_id(&self, id: &str) -> ContentLibraryResult<Library> {
        self.api
            .get_library(id)
            .await?
            .ok_or_else(|| ContentLibraryError::not_found(format!("Unable to find content library ({id})")))
    }

    /// Create a local library and return its identifier.
    pub async fn create_library(
        &self,
        name: &str,
        description: &str,
        backings: Vec<StorageBacking>,
    ) -> ContentLibraryResult<String> {
        if name.is_empty() {
            return Err(ContentLibraryError::invalid_config("content library name must not be empty"));
        }
        // Only local libraries can be created through this API.
        let spec = Library {
            id: None,
            name: name.to_string(),
            description: description.to_string(),
            library_type: LibraryType::Local,
            storage_backings: backings,
        };
        let id = self.api.create_library(&spec).await?;
        log::info!("Created content library {name} ({id})");
        Ok(id)
    }

    /// Libraries cannot be modified in place; every attribute forces a new
    /// resource, so this accepts the request and leaves the library as is.
    pub async fn update_library(
        &self,
        library: &Library,
        _name: &str,
        _description: &str,
        _backings: &[StorageBacking],
    ) -> ContentLibraryResult<()> {
        log::debug!("Content library {} left unchanged, in-place update unsupported", library.id());
        Ok(())
    }

    pub async fn delete_library(&self, library: &Library) -> ContentLibraryResult<()> {
        self.api.delete_library(library.id()).await?;
        log::info!("Deleted content library {} ({})", library.name, library.id());
        Ok(())
    }
}

/// Reduce name-lookup candidates to one object.
///
/// Zero candidates is `NotFound`; several is `Ambiguous` with the ids listed.
pub(crate) fn single_match<T>(
    mut matches: Vec<T>,
    what: impl FnOnce() -> String,
    id_of: impl Fn(&T) -> String,
) -> ContentLibraryResult<T> {
    match matches.len() {
        0 => Err(ContentLibraryError::not_found(format!("Unable to find {}", what()))),
        1 => Ok(matches.remove(0)),
        _ => {
            let ids: Vec<String> = matches.iter().map(id_of).collect();
            Err(ContentLibraryError::ambiguous(format!(
                "Found {} objects for {}: {}",
                ids.len(),
                what(),
                ids.join(", ")
            )))
        }
    }
}

/// Datastore ids (configuration shape) to API backing descriptors.
pub fn expand_storage_backings<I, S>(datastore_ids: I) -> Vec<StorageBacking>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    datastore_ids.into_iter().map(StorageBacking::datastore).collect()
}

/// API backing descriptors to datastore ids. Non-datastore backings are dropped.
pub fn flatten_storage_backings(backings: &[StorageBacking]) -> BTreeSet<String> {
    backings
        .iter()
        .filter(|b| b.backing_type == StorageBackingType::Datastore)
        .filter_map(|b| b.datastore_id.clone())
        .collect()
}
