//! crates/daily_memo_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete cloud backend the adapters talk to.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::domain::{NewNote, Note, NoteId, UserId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external services
/// (document database, object storage, identity provider).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// The live query's output: every item is a full snapshot of the owner's
/// notes, ordered by timestamp descending. The stream is infinite; an `Err`
/// item reports a failed push without ending the subscription.
pub type NoteSnapshots = Pin<Box<dyn Stream<Item = PortResult<Vec<Note>>> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Writes a new note document and returns the id the store assigned.
    async fn add_note(&self, note: NewNote) -> PortResult<NoteId>;

    /// Point read of a single note. Absence is `PortError::NotFound`.
    async fn get_note(&self, id: &NoteId) -> PortResult<Note>;

    /// Patches the single `photoUrl` field of an existing note.
    async fn set_photo_url(&self, id: &NoteId, url: &str) -> PortResult<()>;

    /// Removes a note document. Deleting an id that no longer exists is a
    /// no-op.
    async fn delete_note(&self, id: &NoteId) -> PortResult<()>;

    /// Opens a live query over all notes owned by `owner`, ordered by
    /// timestamp descending. The initial snapshot and every subsequent
    /// change are pushed to the returned stream.
    async fn watch_notes(&self, owner: &UserId) -> PortResult<NoteSnapshots>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `data` under `path`, replacing any existing object.
    async fn upload(&self, path: &str, data: Bytes) -> PortResult<()>;

    /// Returns the public download URL for an uploaded object.
    async fn download_url(&self, path: &str) -> PortResult<String>;

    /// Removes an object. Deleting a path that does not exist is a no-op.
    async fn delete(&self, path: &str) -> PortResult<()>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> PortResult<UserId>;

    async fn register(&self, email: &str, password: &str) -> PortResult<UserId>;

    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;
}
