//! crates/daily_memo_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any backend or serialization format.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// The identifier a note document receives from the remote store on
/// creation. Opaque and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteId(pub String);

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        NoteId(value.to_string())
    }
}

/// Identifier of an authenticated user. A note is only ever visible to the
/// user whose id matches its `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

/// A single journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    /// Assigned by the writer at creation time. The sole sort and grouping
    /// key; on the wire it travels as integer milliseconds since epoch.
    pub timestamp: DateTime<Utc>,
    pub owner_id: UserId,
    /// Absent until the associated photo upload completes; once set it is
    /// never changed again.
    pub photo_url: Option<String>,
}

/// The fields of a note before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub owner_id: UserId,
}

/// An image supplied alongside a new note, already read off the device.
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Bytes,
}
