//! Integration tests for the note detail accessor: point reads, deletion,
//! and the delete-on-delete photo blob policy.

mod common;

use app_lib::notes::detail::{date_line, delete_note, get_note, DetailError};
use app_lib::notes::save_task::{photo_path, save_note};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use common::test_backend;
use daily_memo_core::domain::{Note, NoteId, Photo, UserId};

fn owner() -> UserId {
    UserId::from("user-1")
}

#[tokio::test]
async fn missing_note_surfaces_not_found() {
    let backend = test_backend(&owner());

    let result = get_note(&backend.state, &NoteId::from("no-such-note")).await;

    assert!(matches!(result, Err(DetailError::NotFound(_))));
}

#[tokio::test]
async fn get_returns_the_saved_note() {
    let backend = test_backend(&owner());
    let id = save_note(&backend.state, &owner(), "remember this", None)
        .await
        .unwrap();

    let note = get_note(&backend.state, &id).await.unwrap();

    assert_eq!(note.id, id);
    assert_eq!(note.text, "remember this");
    assert_eq!(note.owner_id, owner());
}

#[tokio::test]
async fn delete_removes_the_note_and_its_photo_blob() {
    let backend = test_backend(&owner());
    let photo = Photo {
        bytes: Bytes::from_static(b"jpeg bytes"),
    };
    let id = save_note(&backend.state, &owner(), "with photo", Some(photo))
        .await
        .unwrap();
    assert!(backend.blobs.contains(&photo_path(&owner(), &id)));

    delete_note(&backend.state, &id).await.unwrap();

    let result = get_note(&backend.state, &id).await;
    assert!(matches!(result, Err(DetailError::NotFound(_))));
    assert!(!backend.blobs.contains(&photo_path(&owner(), &id)));
}

#[tokio::test]
async fn deleting_the_same_note_twice_is_a_noop() {
    let backend = test_backend(&owner());
    let id = save_note(&backend.state, &owner(), "short lived", None)
        .await
        .unwrap();

    delete_note(&backend.state, &id).await.unwrap();
    delete_note(&backend.state, &id).await.unwrap();

    assert_eq!(backend.notes.len(), 0);
}

#[test]
fn detail_date_line_shows_day_month_year_and_time() {
    let note = Note {
        id: NoteId::from("n-1"),
        text: "remember this".to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 5, 14, 0, 0).unwrap(),
        owner_id: owner(),
        photo_url: None,
    };

    assert_eq!(date_line(&note), "05 Jan 2024, 14:00");
}

#[tokio::test]
async fn deleting_a_note_without_a_photo_works() {
    let backend = test_backend(&owner());
    let id = save_note(&backend.state, &owner(), "plain", None)
        .await
        .unwrap();

    delete_note(&backend.state, &id).await.unwrap();

    assert_eq!(backend.notes.len(), 0);
    assert!(backend.blobs.is_empty());
}
