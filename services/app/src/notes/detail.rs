//! services/app/src/notes/detail.rs
//!
//! Point read and delete for the note detail view.

use crate::notes::save_task::photo_path;
use crate::state::AppState;
use daily_memo_core::domain::{Note, NoteId};
use daily_memo_core::ports::PortError;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DetailError {
    #[error("Note {0} does not exist")]
    NotFound(NoteId),
    #[error("Failed to load note: {0}")]
    Load(PortError),
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("Failed to delete note: {0}")]
    Store(PortError),
}

/// The full date line the detail view shows, e.g. `05 Jan 2024, 14:00`.
pub fn date_line(note: &Note) -> String {
    note.timestamp.format("%d %b %Y, %H:%M").to_string()
}

/// Fetches a single note by id. A missing document surfaces as
/// `DetailError::NotFound` instead of an empty view.
pub async fn get_note(state: &AppState, id: &NoteId) -> Result<Note, DetailError> {
    match state.notes.get_note(id).await {
        Ok(note) => Ok(note),
        Err(PortError::NotFound(_)) => Err(DetailError::NotFound(id.clone())),
        Err(e) => Err(DetailError::Load(e)),
    }
}

/// Deletes a note and, best effort, its photo blob so the bucket does not
/// accumulate orphans. Deleting an id that is already gone is a no-op.
pub async fn delete_note(state: &AppState, id: &NoteId) -> Result<(), DeleteError> {
    // The owner is looked up first so the blob path can be derived.
    let owner = match state.notes.get_note(id).await {
        Ok(note) => Some(note.owner_id),
        Err(PortError::NotFound(_)) => None,
        Err(e) => return Err(DeleteError::Store(e)),
    };

    state
        .notes
        .delete_note(id)
        .await
        .map_err(DeleteError::Store)?;
    info!("Deleted note {}", id);

    if let Some(owner) = owner {
        let path = photo_path(&owner, id);
        if let Err(e) = state.blobs.delete(&path).await {
            // The note itself is already gone; an orphaned blob is logged
            // rather than surfaced.
            warn!("Deleted note {} but not its photo blob: {}", id, e);
        }
    }
    Ok(())
}
