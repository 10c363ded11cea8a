//! Aggregate service façade for the content library crate.
//!
//! `ContentLibraryService` owns the API handle, the clock, and the upload
//! settings, and dispatches resource lifecycle calls by resource type name.

use crate::api::ContentLibraryApi;
use crate::clock::{Clock, TokioClock};
use crate::config::{ProviderConfig, UploadSettings};
use crate::error::{ContentLibraryError, ContentLibraryResult};
use crate::item::ItemManager;
use crate::library::LibraryManager;
use crate::schema::{ResourceData, ResourceSchema};
use crate::vsphere::VsphereClient;
use crate::{resource_library, resource_library_item};

use serde_json::Value;
use std::sync::Arc;

/// Top-level service backing both content library resources.
pub struct ContentLibraryService {
    api: Arc<dyn ContentLibraryApi>,
    clock: Arc<dyn Clock>,
    upload: UploadSettings,
}

impl ContentLibraryService {
    pub fn new(
        api: Arc<dyn ContentLibraryApi>,
        clock: Arc<dyn Clock>,
        upload: UploadSettings,
    ) -> Self {
        Self { api, clock, upload }
    }

    // ── Connection ──────────────────────────────────────────────────

    /// Log in to vCenter and build a service on top of the REST client.
    pub async fn connect(config: ProviderConfig) -> ContentLibraryResult<Self> {
        let mut client = VsphereClient::new(&config.vsphere)?;
        client.login().await?;
        Ok(Self::new(Arc::new(client), Arc::new(TokioClock), config.upload))
    }

    pub fn upload_settings(&self) -> &UploadSettings {
        &self.upload
    }

    pub fn libraries(&self) -> LibraryManager<'_> {
        LibraryManager::new(self.api.as_ref())
    }

    pub fn items(&self) -> ItemManager<'_> {
        ItemManager::new(self.api.as_ref(), self.clock.as_ref(), &self.upload)
    }

    // ── Schemas ─────────────────────────────────────────────────────

    pub fn schemas(&self) -> Vec<ResourceSchema> {
        vec![resource_library::schema(), resource_library_item::schema()]
    }

    pub fn schema(&self, resource_type: &str) -> ContentLibraryResult<ResourceSchema> {
        match resource_type {
            resource_library::TYPE_NAME => Ok(resource_library::schema()),
            resource_library_item::TYPE_NAME => Ok(resource_library_item::schema()),
            other => Err(unknown(other)),
        }
    }

    /// Turn raw resource configuration into a validated record with
    /// defaults applied.
    pub fn record(&self, resource_type: &str, config: Value) -> ContentLibraryResult<ResourceData> {
        self.schema(resource_type)?.record(config)
    }

    // ── Resource lifecycle ──────────────────────────────────────────

    pub async fn create(&self, resource_type: &str, d: &mut ResourceData) -> ContentLibraryResult<()> {
        match resource_type {
            resource_library::TYPE_NAME => resource_library::create(self, d).await,
            resource_library_item::TYPE_NAME => resource_library_item::create(self, d).await,
            other => Err(unknown(other)),
        }
    }

    pub async fn read(&self, resource_type: &str, d: &mut ResourceData) -> ContentLibraryResult<()> {
        match resource_type {
            resource_library::TYPE_NAME => resource_library::read(self, d).await,
            resource_library_item::TYPE_NAME => resource_library_item::read(self, d).await,
            other => Err(unknown(other)),
        }
    }

    pub async fn update(&self, resource_type: &str, d: &mut ResourceData) -> ContentLibraryResult<()> {
        match resource_type {
            resource_library::TYPE_NAME => resource_library::update(self, d).await,
            resource_library_item::TYPE_NAME => resource_library_item::update(self, d).await,
            other => Err(unknown(other)),
        }
    }

    pub async fn delete(&self, resource_type: &str, d: &mut ResourceData) -> ContentLibraryResult<()> {
        match resource_type {
            resource_library::TYPE_NAME => resource_library::delete(self, d).await,
            resource_library_item::TYPE_NAME => resource_library_item::delete(self, d).await,
            other => Err(unknown(other)),
        }
    }

    /// Existence probe; only library items support it.
    pub async fn exists(&self, resource_type: &str, d: &ResourceData) -> ContentLibraryResult<bool> {
        match resource_type {
            resource_library_item::TYPE_NAME => Ok(resource_library_item::exists(self, d).await),
            other => Err(unknown(other)),
        }
    }
}

fn unknown(resource_type: &str) -> ContentLibraryError {
    ContentLibraryError::unknown_resource(format!("Unsupported resource type {resource_type:?}"))
}
