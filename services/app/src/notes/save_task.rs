//! services/app/src/notes/save_task.rs
//!
//! This module contains the asynchronous pipeline responsible for saving a
//! single note: write the text document first, then attach the optional
//! photo and patch its public URL back onto the document.

use crate::state::AppState;
use chrono::Utc;
use daily_memo_core::domain::{NewNote, NoteId, Photo, UserId};
use daily_memo_core::ports::PortError;
use tracing::info;

/// Everything that can terminate a save attempt. Each variant names one
/// phase of the pipeline, so every partial outcome stays distinguishable:
/// `WriteFailed` leaves no state behind, while the photo-phase variants
/// leave a note permanently without its photo.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Note cannot be empty")]
    EmptyText,
    #[error("Failed to save note: {0}")]
    WriteFailed(PortError),
    #[error("Note saved, but the photo upload failed: {0}")]
    PhotoUploadFailed(PortError),
    #[error("Note saved, but fetching the photo URL failed: {0}")]
    UrlFetchFailed(PortError),
    #[error("Note saved, but attaching the photo URL failed: {0}")]
    PatchFailed(PortError),
}

/// The blob path a note's photo is uploaded under.
pub fn photo_path(owner: &UserId, note: &NoteId) -> String {
    format!("notes/{}/{}.jpg", owner, note)
}

/// Saves a note for `owner`, with an optional photo attachment.
///
/// Two-phase, at-least-once intent, no rollback: the text document is
/// written first, and only then is the photo uploaded and its URL patched
/// in. No step is retried; every failure is terminal for this invocation and
/// maps to its own `SaveError` variant. A failure after phase 1 leaves the
/// note visible without a photo.
pub async fn save_note(
    state: &AppState,
    owner: &UserId,
    text: &str,
    photo: Option<Photo>,
) -> Result<NoteId, SaveError> {
    if text.is_empty() {
        return Err(SaveError::EmptyText);
    }

    let note = NewNote {
        text: text.to_string(),
        timestamp: Utc::now(),
        owner_id: owner.clone(),
    };
    let id = state
        .notes
        .add_note(note)
        .await
        .map_err(SaveError::WriteFailed)?;
    info!("Saved note {} for {}", id, owner);

    if let Some(photo) = photo {
        let path = photo_path(owner, &id);
        state
            .blobs
            .upload(&path, photo.bytes)
            .await
            .map_err(SaveError::PhotoUploadFailed)?;
        let url = state
            .blobs
            .download_url(&path)
            .await
            .map_err(SaveError::UrlFetchFailed)?;
        state
            .notes
            .set_photo_url(&id, &url)
            .await
            .map_err(SaveError::PatchFailed)?;
        info!("Attached photo to note {}", id);
    }

    Ok(id)
}
