//! Capability interface over the remote content library API.
//!
//! Everything above this trait (directory adapter, upload sequence,
//! resource handlers) talks to vSphere only through it, so the logic can
//! run against [`crate::vsphere::VsphereClient`] or an in-memory fake.

use crate::error::ContentLibraryResult;
use crate::types::*;

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentLibraryApi: Send + Sync {
    /// Identifiers of libraries whose name matches `name`.
    async fn find_libraries(&self, name: &str) -> ContentLibraryResult<Vec<String>>;

    /// Fetch a library; `Ok(None)` when the server has no such object.
    async fn get_library(&self, id: &str) -> ContentLibraryResult<Option<Library>>;

    /// Create a library from `spec`, returning the assigned identifier.
    async fn create_library(&self, spec: &Library) -> ContentLibraryResult<String>;

    async fn delete_library(&self, id: &str) -> ContentLibraryResult<()>;

    /// Identifiers of items in `library_id` whose name matches `name`.
    async fn find_library_items(
        &self,
        library_id: &str,
        name: &str,
    ) -> ContentLibraryResult<Vec<String>>;

    /// Fetch an item; `Ok(None)` when the server has no such object.
    async fn get_library_item(&self, id: &str) -> ContentLibraryResult<Option<LibraryItem>>;

    /// Create an item, or update its metadata in place when `spec.id` is set.
    /// Returns the item identifier.
    async fn create_library_item(&self, spec: &LibraryItem) -> ContentLibraryResult<String>;

    async fn delete_library_item(&self, id: &str) -> ContentLibraryResult<()>;

    /// Open an update session on an item, returning the session identifier.
    async fn create_update_session(&self, library_item_id: &str) -> ContentLibraryResult<String>;

    /// Attach a file to a session by reference.
    async fn add_file_from_uri(
        &self,
        session_id: &str,
        file_name: &str,
        uri: &str,
    ) -> ContentLibraryResult<()>;

    async fn get_update_session(&self, session_id: &str) -> ContentLibraryResult<UpdateSessionInfo>;

    async fn list_update_session_files(
        &self,
        session_id: &str,
    ) -> ContentLibraryResult<Vec<UpdateSessionFile>>;

    /// Finalize a session; the item content becomes visible.
    async fn complete_update_session(&self, session_id: &str) -> ContentLibraryResult<()>;
}
