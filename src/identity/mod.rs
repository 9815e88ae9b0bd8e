//! Identity resolution: turn the current token into the canonical, up-to-date
//! profile. The cached copy is never trusted on its own; the subject comes
//! out of the token payload and the profile comes from the backend.

use crate::{
    client::{error_message, ApiClient},
    error::AuthError,
    session::{token::decode_subject, SessionStore, UserProfile},
};
use reqwest::Method;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{instrument, warn};

pub struct IdentityResolver {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
}

impl IdentityResolver {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, store: Arc<SessionStore>) -> Self {
        Self { client, store }
    }

    /// Fetches the canonical profile for the current token. The caller is
    /// responsible for merging it into the session.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a token, `MalformedToken` when the payload
    /// cannot be decoded or lacks a subject, `ProfileFetchFailed` when the
    /// backend is unreachable or rejects the fetch.
    #[instrument(skip(self))]
    pub async fn resolve_current_user(&self) -> Result<UserProfile, AuthError> {
        let token = self
            .store
            .current_token()
            .ok_or(AuthError::NotAuthenticated)?;
        let subject = decode_subject(token.expose_secret())?;

        let response = self
            .client
            .send(self.client.request(Method::GET, &format!("/users/{subject}")))
            .await
            .map_err(|e| AuthError::ProfileFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            let message = error_message(response, "the profile could not be fetched").await;
            return Err(AuthError::ProfileFetchFailed(message));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::ProfileFetchFailed(format!("unreadable profile: {e}")))
    }

    /// Resolves the current user and merges the fresh profile into the
    /// session, unless the session was replaced while the fetch was in
    /// flight.
    ///
    /// # Errors
    ///
    /// Same as [`resolve_current_user`](Self::resolve_current_user).
    pub async fn refresh(&self) -> Result<UserProfile, AuthError> {
        let epoch = self.store.epoch();
        let profile = self.resolve_current_user().await?;
        if self.store.epoch() == epoch {
            self.store.set_user(profile.clone());
        } else {
            warn!("dropping profile fetched for a stale session");
        }
        Ok(profile)
    }
}
