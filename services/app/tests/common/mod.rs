//! Shared in-memory fakes for the three backend collaborators, with
//! failure-injection switches so each pipeline phase can be made to fail on
//! demand.

#![allow(dead_code)]

use app_lib::{config::Config, state::AppState};
use async_trait::async_trait;
use bytes::Bytes;
use daily_memo_core::domain::{NewNote, Note, NoteId, UserId};
use daily_memo_core::ports::{
    AuthService, BlobStore, NoteSnapshots, NoteStore, PortError, PortResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::Level;
use uuid::Uuid;

//=========================================================================================
// In-Memory Note Store
//=========================================================================================

#[derive(Default)]
pub struct NoteStoreFailures {
    pub add: AtomicBool,
    pub patch: AtomicBool,
    pub query: AtomicBool,
}

#[derive(Clone)]
pub struct InMemoryNoteStore {
    docs: Arc<Mutex<HashMap<NoteId, Note>>>,
    changed: broadcast::Sender<()>,
    pub fail: Arc<NoteStoreFailures>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        let (changed, _) = broadcast::channel(64);
        Self {
            docs: Arc::new(Mutex::new(HashMap::new())),
            changed,
            fail: Arc::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<Note> {
        self.docs.lock().unwrap().values().cloned().collect()
    }

    fn snapshot(&self, owner: &UserId) -> PortResult<Vec<Note>> {
        if self.fail.query.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("live query failed".to_string()));
        }
        let docs = self.docs.lock().unwrap();
        let mut notes: Vec<Note> = docs
            .values()
            .filter(|note| &note.owner_id == owner)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notes)
    }

    fn notify(&self) {
        let _ = self.changed.send(());
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn add_note(&self, note: NewNote) -> PortResult<NoteId> {
        if self.fail.add.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("write failed".to_string()));
        }
        let id = NoteId(Uuid::new_v4().to_string());
        self.docs.lock().unwrap().insert(
            id.clone(),
            Note {
                id: id.clone(),
                text: note.text,
                timestamp: note.timestamp,
                owner_id: note.owner_id,
                photo_url: None,
            },
        );
        self.notify();
        Ok(id)
    }

    async fn get_note(&self, id: &NoteId) -> PortResult<Note> {
        self.docs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(id.to_string()))
    }

    async fn set_photo_url(&self, id: &NoteId, url: &str) -> PortResult<()> {
        if self.fail.patch.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("patch failed".to_string()));
        }
        {
            let mut docs = self.docs.lock().unwrap();
            let note = docs
                .get_mut(id)
                .ok_or_else(|| PortError::NotFound(id.to_string()))?;
            note.photo_url = Some(url.to_string());
        }
        self.notify();
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId) -> PortResult<()> {
        self.docs.lock().unwrap().remove(id);
        self.notify();
        Ok(())
    }

    async fn watch_notes(&self, owner: &UserId) -> PortResult<NoteSnapshots> {
        let store = self.clone();
        let owner = owner.clone();
        let mut changed = self.changed.subscribe();
        let stream = async_stream::stream! {
            loop {
                yield store.snapshot(&owner);
                match changed.recv().await {
                    Ok(()) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

//=========================================================================================
// In-Memory Blob Store
//=========================================================================================

#[derive(Default)]
pub struct BlobStoreFailures {
    pub upload: AtomicBool,
    pub url: AtomicBool,
}

#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Bytes>>>,
    pub fail: Arc<BlobStoreFailures>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, path: &str, data: Bytes) -> PortResult<()> {
        if self.fail.upload.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("upload failed".to_string()));
        }
        self.blobs.lock().unwrap().insert(path.to_string(), data);
        Ok(())
    }

    async fn download_url(&self, path: &str) -> PortResult<String> {
        if self.fail.url.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("url fetch failed".to_string()));
        }
        if !self.contains(path) {
            return Err(PortError::NotFound(path.to_string()));
        }
        Ok(format!("https://blobs.test/{}?alt=media", path))
    }

    async fn delete(&self, path: &str) -> PortResult<()> {
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}

//=========================================================================================
// Static Auth and Test Wiring
//=========================================================================================

pub struct StaticAuth {
    pub user: UserId,
}

#[async_trait]
impl AuthService for StaticAuth {
    async fn sign_in(&self, _email: &str, _password: &str) -> PortResult<UserId> {
        Ok(self.user.clone())
    }

    async fn register(&self, _email: &str, _password: &str) -> PortResult<UserId> {
        Ok(self.user.clone())
    }

    fn current_user(&self) -> Option<UserId> {
        Some(self.user.clone())
    }
}

pub fn test_config() -> Config {
    Config {
        project_id: "test-project".to_string(),
        api_key: "test-key".to_string(),
        storage_bucket: "test-project.appspot.com".to_string(),
        log_level: Level::INFO,
        feed_poll_interval: Duration::from_millis(20),
        email: "memo@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

/// An `AppState` wired to in-memory fakes, with handles kept for assertions.
pub struct TestBackend {
    pub state: AppState,
    pub notes: InMemoryNoteStore,
    pub blobs: InMemoryBlobStore,
}

pub fn test_backend(owner: &UserId) -> TestBackend {
    let notes = InMemoryNoteStore::new();
    let blobs = InMemoryBlobStore::new();
    let state = AppState {
        notes: Arc::new(notes.clone()),
        blobs: Arc::new(blobs.clone()),
        auth: Arc::new(StaticAuth {
            user: owner.clone(),
        }),
        config: Arc::new(test_config()),
    };
    TestBackend {
        state,
        notes,
        blobs,
    }
}
