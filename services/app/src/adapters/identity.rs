//! services/app/src/adapters/identity.rs
//!
//! This module contains the identity provider adapter, the concrete
//! implementation of the `AuthService` port from the `core` crate. Sign-in
//! and registration go through the provider's REST endpoints; the signed-in
//! user is kept in process memory.

use async_trait::async_trait;
use daily_memo_core::domain::UserId;
use daily_memo_core::ports::{AuthService, PortError, PortResult};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::info;

use super::check;

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "localId")]
    local_id: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An identity provider adapter that implements the `AuthService` port.
pub struct IdentityAdapter {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    current: RwLock<Option<UserId>>,
}

impl IdentityAdapter {
    /// Creates a new `IdentityAdapter`.
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            current: RwLock::new(None),
        }
    }

    /// Overrides the backend endpoint, e.g. to point at a local emulator.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn authenticate(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> PortResult<UserId> {
        let resp = self
            .http
            .post(format!("{}/accounts:{}", self.base_url, action))
            .query(&[("key", self.api_key.as_str())])
            .json(&CredentialsBody {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // The identity endpoint reports rejected credentials as 400.
        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(PortError::Unauthorized);
        }
        let resp = check(resp)?;

        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let user = UserId(auth.local_id);
        if let Ok(mut current) = self.current.write() {
            *current = Some(user.clone());
        }
        info!("Authenticated as {}", user);
        Ok(user)
    }
}

//=========================================================================================
// `AuthService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthService for IdentityAdapter {
    async fn sign_in(&self, email: &str, password: &str) -> PortResult<UserId> {
        self.authenticate("signInWithPassword", email, password)
            .await
    }

    async fn register(&self, email: &str, password: &str) -> PortResult<UserId> {
        self.authenticate("signUp", email, password).await
    }

    fn current_user(&self) -> Option<UserId> {
        match self.current.read() {
            Ok(current) => current.clone(),
            Err(_) => None,
        }
    }
}
