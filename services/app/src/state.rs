//! services/app/src/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use daily_memo_core::ports::{AuthService, BlobStore, NoteStore};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to every
/// pipeline. The backend handles are explicit trait objects so tests can
/// substitute in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub auth: Arc<dyn AuthService>,
    pub config: Arc<Config>,
}
