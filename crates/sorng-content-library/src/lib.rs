//! # SortOfRemote NG – vSphere Content Library
//!
//! Content library and content library item resources for an
//! infrastructure-as-code provider, backed by the vSphere REST API.
//!
//! ## Modules
//!
//! - **types** — Wire types (libraries, items, update sessions, files)
//! - **error** — Crate-specific error types
//! - **config** — Provider configuration (connection, upload wait policy)
//! - **api** — `ContentLibraryApi` capability trait
//! - **vsphere** — vSphere REST API HTTP client implementing the trait
//! - **clock** — Injectable time source for the upload wait loop
//! - **library** — Library lookup / create / delete, storage backings
//! - **upload** — Item upload session state machine
//! - **item** — Item lookup / create / update / delete, existence check
//! - **schema** — Resource schemas and the `ResourceData` record
//! - **resource_library** — `vsphere_content_library` handlers
//! - **resource_library_item** — `vsphere_content_library_item` handlers
//! - **service** — Aggregate facade dispatching by resource type

pub mod types;
pub mod error;
pub mod config;
pub mod api;
pub mod vsphere;
pub mod clock;
pub mod library;
pub mod upload;
pub mod item;
pub mod schema;
pub mod resource_library;
pub mod resource_library_item;
pub mod service;
