//! vSphere REST API HTTP client with session-based authentication.
//!
//! Communicates with vCenter via `https://{host}/api/...`, and implements
//! [`ContentLibraryApi`] over the content library endpoints.

use crate::api::ContentLibraryApi;
use crate::config::VsphereConfig;
use crate::error::{ContentLibraryError, ContentLibraryErrorKind, ContentLibraryResult};
use crate::types::*;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const LIBRARY: &str = "/api/content/library";
const LOCAL_LIBRARY: &str = "/api/content/local-library";
const ITEM: &str = "/api/content/library/item";
const UPDATE_SESSION: &str = "/api/content/library/item/update-session";
const UPDATE_SESSION_FILE: &str = "/api/content/library/item/updatesession/file";

/// vSphere REST API client.
pub struct VsphereClient {
    client: Client,
    base_url: String,
    session_id: Option<String>,
    config: VsphereConfig,
}

impl VsphereClient {
    /// Build a new client from config (does NOT create a session yet).
    pub fn new(config: &VsphereConfig) -> ContentLibraryResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ContentLibraryError::connection(format!("Failed to build HTTP client: {e}")))?;

        let base_url = format!("https://{}:{}", config.host, config.port);

        Ok(Self {
            client,
            base_url,
            session_id: None,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_connected(&self) -> bool {
        self.session_id.is_some()
    }

    // ── Session management ──────────────────────────────────────────

    /// Create a new API session (POST /api/session).
    pub async fn login(&mut self) -> ContentLibraryResult<String> {
        let url = format!("{}/api/session", self.base_url);

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(ContentLibraryError::auth("Invalid credentials"));
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ContentLibraryError::api(
                status.as_u16(),
                format!("Login failed: {body}"),
            ));
        }

        // Session ID comes back as a quoted JSON string
        let session_id: String = resp.json().await.map_err(|e| {
            ContentLibraryError::parse(format!("Failed to parse session response: {e}"))
        })?;

        log::info!("vSphere session established on {}", self.config.host);
        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    // ── HTTP helpers ────────────────────────────────────────────────

    fn require_session(&self) -> ContentLibraryResult<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| ContentLibraryError::auth("Not logged in, no active session"))
    }

    /// GET a JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ContentLibraryResult<T> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header("vmware-api-session-id", sid)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_response(resp).await
    }

    /// GET a JSON response, mapping 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> ContentLibraryResult<Option<T>> {
        match self.get::<T>(path).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// POST with JSON body, return parsed response.
    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ContentLibraryResult<T> {
        let resp = self.post_raw(path, body).await?;
        Self::parse_response(resp).await
    }

    /// POST with JSON body, return raw `Response`.
    async fn post_raw<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ContentLibraryResult<Response> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("vmware-api-session-id", sid)
            .json(body)
            .send()
            .await?;
        Self::check_status(resp).await
    }

    /// POST with no body, discarding the response.
    async fn post_empty(&self, path: &str) -> ContentLibraryResult<()> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("vmware-api-session-id", sid)
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// PATCH with JSON body.
    async fn patch<B: serde::Serialize>(&self, path: &str, body: &B) -> ContentLibraryResult<()> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .patch(&url)
            .header("vmware-api-session-id", sid)
            .json(body)
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// DELETE, ignoring response body.
    async fn delete(&self, path: &str) -> ContentLibraryResult<()> {
        let sid = self.require_session()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .delete(&url)
            .header("vmware-api-session-id", sid)
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn check_status(resp: Response) -> ContentLibraryResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    async fn parse_response<T: DeserializeOwned>(resp: Response) -> ContentLibraryResult<T> {
        let text = resp.text().await.map_err(|e| {
            ContentLibraryError::parse(format!("Failed to read response body: {e}"))
        })?;
        parse_body(&text)
    }
}

fn status_error(status: StatusCode, body: &str) -> ContentLibraryError {
    let code = status.as_u16();
    match status {
        StatusCode::UNAUTHORIZED => {
            ContentLibraryError::auth(format!("Session expired or invalid: {body}"))
        }
        StatusCode::FORBIDDEN => ContentLibraryError::new(
            ContentLibraryErrorKind::AccessDenied,
            format!("Access denied: {body}"),
        ),
        StatusCode::NOT_FOUND => ContentLibraryError::not_found(format!("Resource not found: {body}")),
        _ => ContentLibraryError::api(code, format!("API error {code}: {body}")),
    }
}

fn parse_body<T: DeserializeOwned>(text: &str) -> ContentLibraryResult<T> {
    if text.is_empty() {
        // Some vSphere endpoints return empty body for success
        return serde_json::from_str("null").map_err(|e| {
            ContentLibraryError::parse(format!("Cannot deserialise empty response: {e}"))
        });
    }
    serde_json::from_str(text).map_err(|e| {
        let snippet: String = text.chars().take(500).collect();
        ContentLibraryError::parse(format!("JSON parse error: {e}, body: {snippet}"))
    })
}

/// Append a fresh `client_token` to a create path.
fn with_client_token(path: &str) -> String {
    format!("{path}?client_token={}", uuid::Uuid::new_v4())
}

// ── Content library API ─────────────────────────────────────────────

#[async_trait]
impl ContentLibraryApi for VsphereClient {
    async fn find_libraries(&self, name: &str) -> ContentLibraryResult<Vec<String>> {
        let spec = FindLibrarySpec { name: name.to_string() };
        self.post(&format!("{LIBRARY}?action=find"), &spec).await
    }

    async fn get_library(&self, id: &str) -> ContentLibraryResult<Option<Library>> {
        let lib: Option<Library> = self.get_optional(&format!("{LIBRARY}/{id}")).await?;
        // Older builds omit the id in the body.
        Ok(lib.map(|mut l| {
            l.id.get_or_insert_with(|| id.to_string());
            l
        }))
    }

    async fn create_library(&self, spec: &Library) -> ContentLibraryResult<String> {
        self.post(&with_client_token(LOCAL_LIBRARY), spec).await
    }

    async fn delete_library(&self, id: &str) -> ContentLibraryResult<()> {
        self.delete(&format!("{LOCAL_LIBRARY}/{id}")).await
    }

    async fn find_library_items(
        &self,
        library_id: &str,
        name: &str,
    ) -> ContentLibraryResult<Vec<String>> {
        let spec = FindItemSpec {
            library_id: library_id.to_string(),
            name: name.to_string(),
        };
        self.post(&format!("{ITEM}?action=find"), &spec).await
    }

    async fn get_library_item(&self, id: &str) -> ContentLibraryResult<Option<LibraryItem>> {
        let item: Option<LibraryItem> = self.get_optional(&format!("{ITEM}/{id}")).await?;
        Ok(item.map(|mut i| {
            i.id.get_or_insert_with(|| id.to_string());
            i
        }))
    }

    async fn create_library_item(&self, spec: &LibraryItem) -> ContentLibraryResult<String> {
        match spec.id.as_deref() {
            Some(id) => {
                let mut update = spec.clone();
                update.id = None;
                self.patch(&format!("{ITEM}/{id}"), &update).await?;
                Ok(id.to_string())
            }
            None => self.post(&with_client_token(ITEM), spec).await,
        }
    }

    async fn delete_library_item(&self, id: &str) -> ContentLibraryResult<()> {
        self.delete(&format!("{ITEM}/{id}")).await
    }

    async fn create_update_session(&self, library_item_id: &str) -> ContentLibraryResult<String> {
        let spec = UpdateSessionCreateSpec {
            library_item_id: library_item_id.to_string(),
        };
        self.post(&with_client_token(UPDATE_SESSION), &spec).await
    }

    async fn add_file_from_uri(
        &self,
        session_id: &str,
        file_name: &str,
        uri: &str,
    ) -> ContentLibraryResult<()> {
        let spec = AddFileSpec::pull(file_name, uri);
        self.post_raw(&format!("{UPDATE_SESSION_FILE}/{session_id}?action=add"), &spec)
            .await?;
        Ok(())
    }

    async fn get_update_session(&self, session_id: &str) -> ContentLibraryResult<UpdateSessionInfo> {
        self.get(&format!("{UPDATE_SESSION}/{session_id}")).await
    }

    async fn list_update_session_files(
        &self,
        session_id: &str,
    ) -> ContentLibraryResult<Vec<UpdateSessionFile>> {
        self.get(&format!("{UPDATE_SESSION_FILE}?update_session_id={session_id}"))
            .await
    }

    async fn complete_update_session(&self, session_id: &str) -> ContentLibraryResult<()> {
        self.post_empty(&format!("{UPDATE_SESSION}/{session_id}?action=complete"))
            .await
    }
}
