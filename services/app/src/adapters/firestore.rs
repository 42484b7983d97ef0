//! services/app/src/adapters/firestore.rs
//!
//! This module contains the document database adapter, the concrete
//! implementation of the `NoteStore` port from the `core` crate. It talks to
//! the backend's REST interface; notes live in the `notes` collection.
//!
//! The REST surface has no push channel, so the live query is realized by
//! re-running the owner's query on a configured interval and emitting a
//! snapshot whenever the result set differs from the previous one.

use async_trait::async_trait;
use chrono::DateTime;
use daily_memo_core::domain::{NewNote, Note, NoteId, UserId};
use daily_memo_core::ports::{NoteSnapshots, NoteStore, PortError, PortResult};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::check;

const COLLECTION: &str = "notes";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A document database adapter that implements the `NoteStore` port.
#[derive(Clone)]
pub struct FirestoreAdapter {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
}

impl FirestoreAdapter {
    /// Creates a new `FirestoreAdapter` for the given project.
    pub fn new(
        http: reqwest::Client,
        project_id: &str,
        api_key: String,
        poll_interval: Duration,
    ) -> Self {
        let base_url = format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            project_id
        );
        Self {
            http,
            base_url,
            api_key,
            poll_interval,
        }
    }

    /// Overrides the backend endpoint, e.g. to point at a local emulator.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn document_url(&self, id: &NoteId) -> String {
        format!("{}/{}/{}", self.base_url, COLLECTION, id)
    }
}

//=========================================================================================
// Wire Encoding and Decoding
//=========================================================================================

fn encode_fields(note: &NewNote) -> Value {
    json!({
        "fields": {
            "text": { "stringValue": note.text },
            "date": { "integerValue": note.timestamp.timestamp_millis().to_string() },
            "userId": { "stringValue": note.owner_id.0 },
        }
    })
}

fn decode_document(doc: &Value) -> PortResult<Note> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| PortError::Unexpected("document without a name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name);

    let fields = doc
        .get("fields")
        .ok_or_else(|| PortError::Unexpected(format!("document {} without fields", id)))?;

    let millis = fields
        .get("date")
        .and_then(|f| f.get("integerValue"))
        .and_then(Value::as_str)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        PortError::Unexpected(format!("document {} carries an unrepresentable date", id))
    })?;

    Ok(Note {
        id: NoteId(id.to_string()),
        text: string_field(fields, "text").unwrap_or_default(),
        timestamp,
        owner_id: UserId(string_field(fields, "userId").unwrap_or_default()),
        photo_url: string_field(fields, "photoUrl"),
    })
}

fn string_field(fields: &Value, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(|f| f.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Runs the owner's filtered, descending-ordered query once and decodes the
/// resulting snapshot.
async fn run_query(
    http: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    owner: &UserId,
) -> PortResult<Vec<Note>> {
    let body = json!({
        "structuredQuery": {
            "from": [{ "collectionId": COLLECTION }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "userId" },
                    "op": "EQUAL",
                    "value": { "stringValue": owner.0 }
                }
            },
            "orderBy": [{ "field": { "fieldPath": "date" }, "direction": "DESCENDING" }]
        }
    });

    let resp = http
        .post(format!("{}:runQuery", base_url))
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    let resp = check(resp)?;

    let rows: Vec<Value> = resp
        .json()
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

    // The last row of an empty result set carries only read metadata.
    let mut notes = Vec::new();
    for row in &rows {
        if let Some(doc) = row.get("document") {
            notes.push(decode_document(doc)?);
        }
    }
    Ok(notes)
}

//=========================================================================================
// `NoteStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl NoteStore for FirestoreAdapter {
    async fn add_note(&self, note: NewNote) -> PortResult<NoteId> {
        let resp = self
            .http
            .post(format!("{}/{}", self.base_url, COLLECTION))
            .query(&[("key", self.api_key.as_str())])
            .json(&encode_fields(&note))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let resp = check(resp)?;

        let doc: Value = resp
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| PortError::Unexpected("create response without a name".to_string()))?;
        let id = name.rsplit('/').next().unwrap_or(name);
        debug!("Created note document {}", id);
        Ok(NoteId(id.to_string()))
    }

    async fn get_note(&self, id: &NoteId) -> PortResult<Note> {
        let resp = self
            .http
            .get(self.document_url(id))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(id.to_string()));
        }
        let resp = check(resp)?;

        let doc: Value = resp
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        decode_document(&doc)
    }

    async fn set_photo_url(&self, id: &NoteId, url: &str) -> PortResult<()> {
        let body = json!({ "fields": { "photoUrl": { "stringValue": url } } });
        let resp = self
            .http
            .patch(self.document_url(id))
            .query(&[
                ("key", self.api_key.as_str()),
                ("updateMask.fieldPaths", "photoUrl"),
            ])
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(id.to_string()));
        }
        check(resp)?;
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId) -> PortResult<()> {
        // The backend reports deletion of a missing document as success,
        // which gives the idempotent semantics the detail flow relies on.
        let resp = self
            .http
            .delete(self.document_url(id))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        check(resp)?;
        debug!("Deleted note document {}", id);
        Ok(())
    }

    async fn watch_notes(&self, owner: &UserId) -> PortResult<NoteSnapshots> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let api_key = self.api_key.clone();
        let owner = owner.clone();
        let interval = self.poll_interval;

        let stream = async_stream::stream! {
            let mut ticker = tokio::time::interval(interval);
            let mut last: Option<Vec<Note>> = None;
            loop {
                ticker.tick().await;
                match run_query(&http, &base_url, &api_key, &owner).await {
                    Ok(notes) => {
                        if last.as_ref() != Some(&notes) {
                            last = Some(notes.clone());
                            yield Ok(notes);
                        }
                    }
                    Err(e) => yield Err(e),
                }
            }
        };
        Ok(Box::pin(stream))
    }
}
