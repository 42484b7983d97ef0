//! services/app/src/adapters/storage.rs
//!
//! This module contains the object storage adapter, the concrete
//! implementation of the `BlobStore` port from the `core` crate. Photo blobs
//! are uploaded under `notes/{userId}/{noteId}.jpg` and served through a
//! tokened public download URL.

use async_trait::async_trait;
use bytes::Bytes;
use daily_memo_core::ports::{BlobStore, PortError, PortResult};
use serde_json::Value;
use tracing::debug;

use super::check;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An object storage adapter that implements the `BlobStore` port.
#[derive(Clone)]
pub struct StorageAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl StorageAdapter {
    /// Creates a new `StorageAdapter` for the given bucket.
    pub fn new(http: reqwest::Client, bucket: &str) -> Self {
        Self {
            http,
            base_url: format!("https://firebasestorage.googleapis.com/v0/b/{}/o", bucket),
        }
    }

    /// Overrides the backend endpoint, e.g. to point at a local emulator.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, encode_object_path(path))
    }
}

/// Percent-encodes an object path for use as a single URL segment. The
/// storage API expects the `/` separators inside an object name encoded.
fn encode_object_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

//=========================================================================================
// `BlobStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl BlobStore for StorageAdapter {
    async fn upload(&self, path: &str, data: Bytes) -> PortResult<()> {
        let resp = self
            .http
            .post(&self.base_url)
            .query(&[("uploadType", "media"), ("name", path)])
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(data)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        check(resp)?;
        debug!("Uploaded blob {}", path);
        Ok(())
    }

    async fn download_url(&self, path: &str) -> PortResult<String> {
        let resp = self
            .http
            .get(self.object_url(path))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let resp = check(resp)?;

        let meta: Value = resp
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let token = meta
            .get("downloadTokens")
            .and_then(Value::as_str)
            .and_then(|tokens| tokens.split(',').next())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                PortError::Unexpected(format!("object {} has no download token", path))
            })?;

        Ok(format!(
            "{}?alt=media&token={}",
            self.object_url(path),
            token
        ))
    }

    async fn delete(&self, path: &str) -> PortResult<()> {
        let resp = self
            .http
            .delete(self.object_url(path))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        // An object that is already gone deletes as a no-op.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        check(resp)?;
        debug!("Deleted blob {}", path);
        Ok(())
    }
}
