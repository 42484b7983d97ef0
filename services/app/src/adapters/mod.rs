use daily_memo_core::ports::{PortError, PortResult};

pub mod firestore;
pub mod identity;
pub mod storage;

pub use firestore::FirestoreAdapter;
pub use identity::IdentityAdapter;
pub use storage::StorageAdapter;

/// Maps an HTTP response's status onto the port error taxonomy shared by all
/// backend adapters.
pub(crate) fn check(resp: reqwest::Response) -> PortResult<reqwest::Response> {
    let status = resp.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(PortError::NotFound(resp.url().path().to_string()));
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(PortError::Unauthorized);
    }
    resp.error_for_status()
        .map_err(|e| PortError::Unexpected(e.to_string()))
}
