//! In-memory stand-in for the vSphere content library endpoints.

#![allow(dead_code)]

use async_trait::async_trait;
use sorng_content_library::api::ContentLibraryApi;
use sorng_content_library::error::{ContentLibraryError, ContentLibraryResult};
use sorng_content_library::types::*;

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct FakeSession {
    pub item_id: String,
    pub files: Vec<(String, String)>,
    pub polls: u32,
    pub completed: bool,
}

#[derive(Default)]
struct State {
    next_id: u32,
    libraries: BTreeMap<String, Library>,
    items: BTreeMap<String, LibraryItem>,
    sessions: BTreeMap<String, FakeSession>,
    /// File listings report READY once a session was polled this many times;
    /// `None` keeps them transferring forever.
    ready_after: Option<u32>,
    failing: HashSet<&'static str>,
}

impl State {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

pub struct FakeVsphere {
    state: Mutex<State>,
}

impl FakeVsphere {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                ready_after: Some(0),
                ..Default::default()
            }),
        }
    }

    pub fn ready_after(&self, polls: Option<u32>) {
        self.state.lock().unwrap().ready_after = polls;
    }

    /// Make every call of `op` fail with a 500.
    pub fn fail_on(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn insert_library(&self, name: &str) -> String {
        let mut st = self.state.lock().unwrap();
        let id = st.next("lib");
        st.libraries.insert(
            id.clone(),
            Library {
                id: Some(id.clone()),
                name: name.to_string(),
                ..Default::default()
            },
        );
        id
    }

    pub fn library(&self, id: &str) -> Option<Library> {
        self.state.lock().unwrap().libraries.get(id).cloned()
    }

    pub fn library_count(&self) -> usize {
        self.state.lock().unwrap().libraries.len()
    }

    pub fn item(&self, id: &str) -> Option<LibraryItem> {
        self.state.lock().unwrap().items.get(id).cloned()
    }

    pub fn sessions(&self) -> Vec<FakeSession> {
        self.state.lock().unwrap().sessions.values().cloned().collect()
    }

    fn check(&self, op: &'static str) -> ContentLibraryResult<()> {
        if self.state.lock().unwrap().failing.contains(op) {
            return Err(ContentLibraryError::api(500, format!("{op} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentLibraryApi for FakeVsphere {
    async fn find_libraries(&self, name: &str) -> ContentLibraryResult<Vec<String>> {
        self.check("find_libraries")?;
        let st = self.state.lock().unwrap();
        // vCenter matches names case-insensitively.
        Ok(st
            .libraries
            .values()
            .filter(|l| l.name.eq_ignore_ascii_case(name))
            .map(|l| l.id().to_string())
            .collect())
    }

    async fn get_library(&self, id: &str) -> ContentLibraryResult<Option<Library>> {
        self.check("get_library")?;
        Ok(self.library(id))
    }

    async fn create_library(&self, spec: &Library) -> ContentLibraryResult<String> {
        self.check("create_library")?;
        let mut st = self.state.lock().unwrap();
        let id = st.next("lib");
        let mut lib = spec.clone();
        lib.id = Some(id.clone());
        st.libraries.insert(id.clone(), lib);
        Ok(id)
    }

    async fn delete_library(&self, id: &str) -> ContentLibraryResult<()> {
        self.check("delete_library")?;
        let mut st = self.state.lock().unwrap();
        st.libraries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ContentLibraryError::not_found(format!("Resource not found: {id}")))
    }

    async fn find_library_items(
        &self,
        library_id: &str,
        name: &str,
    ) -> ContentLibraryResult<Vec<String>> {
        self.check("find_library_items")?;
        let st = self.state.lock().unwrap();
        Ok(st
            .items
            .values()
            .filter(|i| i.library_id == library_id && i.name == name)
            .map(|i| i.id().to_string())
            .collect())
    }

    async fn get_library_item(&self, id: &str) -> ContentLibraryResult<Option<LibraryItem>> {
        self.check("get_library_item")?;
        Ok(self.item(id))
    }

    async fn create_library_item(&self, spec: &LibraryItem) -> ContentLibraryResult<String> {
        self.check("create_library_item")?;
        let mut st = self.state.lock().unwrap();
        if let Some(id) = spec.id.clone() {
            let item = st
                .items
                .get_mut(&id)
                .ok_or_else(|| ContentLibraryError::not_found(format!("Resource not found: {id}")))?;
            item.name = spec.name.clone();
            item.description = spec.description.clone();
            return Ok(id);
        }
        if !st.libraries.contains_key(&spec.library_id) {
            return Err(ContentLibraryError::api(400, "library does not exist"));
        }
        let id = st.next("item");
        let mut item = spec.clone();
        item.id = Some(id.clone());
        st.items.insert(id.clone(), item);
        Ok(id)
    }

    async fn delete_library_item(&self, id: &str) -> ContentLibraryResult<()> {
        self.check("delete_library_item")?;
        let mut st = self.state.lock().unwrap();
        st.items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ContentLibraryError::not_found(format!("Resource not found: {id}")))
    }

    async fn create_update_session(&self, library_item_id: &str) -> ContentLibraryResult<String> {
        self.check("create_update_session")?;
        let mut st = self.state.lock().unwrap();
        let id = st.next("session");
        st.sessions.insert(
            id.clone(),
            FakeSession {
                item_id: library_item_id.to_string(),
                files: Vec::new(),
                polls: 0,
                completed: false,
            },
        );
        Ok(id)
    }

    async fn add_file_from_uri(
        &self,
        session_id: &str,
        file_name: &str,
        uri: &str,
    ) -> ContentLibraryResult<()> {
        self.check("add_file_from_uri")?;
        let mut st = self.state.lock().unwrap();
        let session = st
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| ContentLibraryError::not_found(session_id.to_string()))?;
        session.files.push((file_name.to_string(), uri.to_string()));
        Ok(())
    }

    async fn get_update_session(&self, session_id: &str) -> ContentLibraryResult<UpdateSessionInfo> {
        self.check("get_update_session")?;
        let st = self.state.lock().unwrap();
        let session = st
            .sessions
            .get(session_id)
            .ok_or_else(|| ContentLibraryError::not_found(session_id.to_string()))?;
        Ok(UpdateSessionInfo {
            library_item_id: session.item_id.clone(),
            state: if session.completed {
                UpdateSessionState::Done
            } else {
                UpdateSessionState::Active
            },
            client_progress: 0,
            error_message: None,
        })
    }

    async fn list_update_session_files(
        &self,
        session_id: &str,
    ) -> ContentLibraryResult<Vec<UpdateSessionFile>> {
        self.check("list_update_session_files")?;
        let mut st = self.state.lock().unwrap();
        let ready_after = st.ready_after;
        let session = st
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| ContentLibraryError::not_found(session_id.to_string()))?;
        let ready = ready_after.map(|n| session.polls >= n).unwrap_or(false);
        session.polls += 1;
        Ok(session
            .files
            .iter()
            .map(|(name, _)| UpdateSessionFile {
                name: name.clone(),
                status: if ready {
                    TransferStatus::Ready
                } else {
                    TransferStatus::Transferring
                },
                error_message: None,
            })
            .collect())
    }

    async fn complete_update_session(&self, session_id: &str) -> ContentLibraryResult<()> {
        self.check("complete_update_session")?;
        let mut st = self.state.lock().unwrap();
        let session = st
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| ContentLibraryError::not_found(session_id.to_string()))?;
        session.completed = true;
        Ok(())
    }
}
