//! Library item upload sequence.
//!
//! Populating an item goes through a server-side update session:
//!
//! ```text
//! Created ─► SessionOpen ─► FilesRegistered ─► WaitingForCompletion ─► Complete
//!    └────────────┴───────────────┴──────────────────────┴──────────► Failed
//! ```
//!
//! Every step returns its error to the caller. Nothing is rolled back: an
//! item whose session fails stays behind without content.

use crate::api::ContentLibraryApi;
use crate::clock::Clock;
use crate::config::UploadSettings;
use crate::error::{ContentLibraryError, ContentLibraryErrorKind, ContentLibraryResult};
use crate::types::*;

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// Nothing created yet
    Pending,
    /// Item record exists, no session
    Created,
    SessionOpen,
    /// All sources attached to the session
    FilesRegistered,
    WaitingForCompletion,
    Complete,
    Failed,
}

/// How the completion wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Server reported every file processed
    Ready,
    /// Timeout elapsed first; the session is finalized regardless
    TimedOut,
}

/// Snapshot handed to the progress callback on each pending poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitProgress {
    pub elapsed: Duration,
    pub ready_files: usize,
    pub total_files: usize,
    pub client_progress: i64,
}

/// One run of the upload sequence for a single item.
pub struct ItemUpload<'a> {
    api: &'a dyn ContentLibraryApi,
    clock: &'a dyn Clock,
    settings: &'a UploadSettings,
    state: UploadState,
    item_id: Option<String>,
    session_id: Option<String>,
    registered: Vec<String>,
}

impl<'a> ItemUpload<'a> {
    pub fn new(
        api: &'a dyn ContentLibraryApi,
        clock: &'a dyn Clock,
        settings: &'a UploadSettings,
    ) -> Self {
        Self {
            api,
            clock,
            settings,
            state: UploadState::Pending,
            item_id: None,
            session_id: None,
            registered: Vec::new(),
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Drive the whole sequence and return the new item id.
    pub async fn run<F>(
        mut self,
        spec: &LibraryItem,
        file_uris: &[String],
        mut on_progress: F,
    ) -> ContentLibraryResult<String>
    where
        F: FnMut(&WaitProgress) + Send,
    {
        let item_id = self.create_item(spec).await?;
        self.open_session().await?;
        self.register_files(file_uris).await?;
        self.wait_for_completion(&mut on_progress).await?;
        self.complete().await?;
        Ok(item_id)
    }

    /// Step 1: create the item record.
    pub async fn create_item(&mut self, spec: &LibraryItem) -> ContentLibraryResult<String> {
        self.expect_state(UploadState::Pending, "create item")?;
        let res = self.api.create_library_item(spec).await;
        let id = self.settle(res)?;
        log::info!("Created content library item {} ({id})", spec.name);
        self.item_id = Some(id.clone());
        self.state = UploadState::Created;
        Ok(id)
    }

    /// Step 2: open an update session on the item.
    pub async fn open_session(&mut self) -> ContentLibraryResult<String> {
        self.expect_state(UploadState::Created, "open session")?;
        let item_id = self.item_id.clone().unwrap_or_default();
        let res = self.api.create_update_session(&item_id).await;
        let session_id = match self.settle(res) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Content library item {item_id} left without content: {e}");
                return Err(e);
            }
        };
        log::debug!("Opened update session {session_id} for item {item_id}");
        self.session_id = Some(session_id.clone());
        self.state = UploadState::SessionOpen;
        Ok(session_id)
    }

    /// Step 3: attach every source by reference, named after its last path
    /// component.
    pub async fn register_files(&mut self, uris: &[String]) -> ContentLibraryResult<()> {
        self.expect_state(UploadState::SessionOpen, "register files")?;
        let session_id = self.session_id.clone().unwrap_or_default();
        for uri in uris {
            let name = self.settle(file_name_from_uri(uri))?;
            let res = self.api.add_file_from_uri(&session_id, &name, uri).await;
            self.settle(res)?;
            log::debug!("Registered {uri} as {name} in session {session_id}");
            self.registered.push(name);
        }
        self.state = UploadState::FilesRegistered;
        Ok(())
    }

    /// Step 4: poll until the server has ingested every file, or the
    /// timeout elapses. A timeout is not an error.
    pub async fn wait_for_completion(
        &mut self,
        on_progress: &mut (dyn FnMut(&WaitProgress) + Send),
    ) -> ContentLibraryResult<WaitOutcome> {
        self.expect_state(UploadState::FilesRegistered, "wait for completion")?;
        self.state = UploadState::WaitingForCompletion;
        let res = self.poll_session(on_progress).await;
        self.settle(res)
    }

    /// Step 5: finalize the session.
    pub async fn complete(&mut self) -> ContentLibraryResult<()> {
        self.expect_state(UploadState::WaitingForCompletion, "complete session")?;
        let session_id = self.session_id.clone().unwrap_or_default();
        let res = self.api.complete_update_session(&session_id).await;
        self.settle(res)?;
        log::info!(
            "Completed update session {session_id} for item {}",
            self.item_id.as_deref().unwrap_or_default()
        );
        self.state = UploadState::Complete;
        Ok(())
    }

    async fn poll_session(
        &self,
        on_progress: &mut (dyn FnMut(&WaitProgress) + Send),
    ) -> ContentLibraryResult<WaitOutcome> {
        let session_id = self.session_id.as_deref().unwrap_or_default();
        let timeout = self.settings.timeout();
        let interval = self.settings.poll_interval();
        let started = self.clock.now();

        loop {
            let info = self.api.get_update_session(session_id).await?;
            match info.state {
                UpdateSessionState::Done => return Ok(WaitOutcome::Ready),
                UpdateSessionState::Error => {
                    return Err(ContentLibraryError::upload(format!(
                        "Update session {session_id} failed: {}",
                        message_text(info.error_message.as_ref())
                    )))
                }
                UpdateSessionState::Canceled => {
                    return Err(ContentLibraryError::upload(format!(
                        "Update session {session_id} was canceled: {}",
                        message_text(info.error_message.as_ref())
                    )))
                }
                UpdateSessionState::Active | UpdateSessionState::Unknown => {}
            }

            let files = self.api.list_update_session_files(session_id).await?;
            if let Some(failed) = files.iter().find(|f| f.status == TransferStatus::Error) {
                return Err(ContentLibraryError::upload(format!(
                    "File {} failed in update session {session_id}: {}",
                    failed.name,
                    message_text(failed.error_message.as_ref())
                )));
            }
            let ready = files.iter().filter(|f| f.status == TransferStatus::Ready).count();
            if ready == files.len() && files.len() >= self.registered.len() {
                return Ok(WaitOutcome::Ready);
            }

            let elapsed = self.clock.now().saturating_duration_since(started);
            if elapsed >= timeout {
                log::warn!(
                    "Update session {session_id} still processing after {}s, completing anyway",
                    timeout.as_secs()
                );
                return Ok(WaitOutcome::TimedOut);
            }

            on_progress(&WaitProgress {
                elapsed,
                ready_files: ready,
                total_files: files.len(),
                client_progress: info.client_progress,
            });
            log::debug!("Waiting on update session {session_id} ({ready}/{} files ready)", files.len());
            self.clock.sleep(interval.min(timeout - elapsed)).await;
        }
    }

    fn expect_state(&self, expected: UploadState, step: &str) -> ContentLibraryResult<()> {
        if self.state == expected {
            return Ok(());
        }
        Err(ContentLibraryError::new(
            ContentLibraryErrorKind::Other,
            format!("cannot {step} while upload is {:?}", self.state),
        ))
    }

    /// Record a failed step before handing the result back.
    fn settle<T>(&mut self, res: ContentLibraryResult<T>) -> ContentLibraryResult<T> {
        if res.is_err() {
            self.state = UploadState::Failed;
        }
        res
    }
}

fn message_text(msg: Option<&LocalizableMessage>) -> &str {
    msg.map(|m| m.default_message.as_str())
        .filter(|m| !m.is_empty())
        .unwrap_or("no detail from server")
}

/// Destination file name for a source: the final path component of the URI
/// (or of the local path when it is not a URL). Local paths split on both
/// `/` and `\`.
pub fn file_name_from_uri(uri: &str) -> ContentLibraryResult<String> {
    let name = match url::Url::parse(uri) {
        // One-letter schemes are Windows drive letters, not URLs.
        Ok(u) if !u.cannot_be_a_base() && u.scheme().len() > 1 => u
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        _ => uri
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
    };
    name.filter(|n| !n.is_empty()).ok_or_else(|| {
        ContentLibraryError::invalid_config(format!("Cannot derive a file name from {uri:?}"))
    })
}
