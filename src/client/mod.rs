//! HTTP plumbing shared by every backend call. The client owns the reqwest
//! handle (cookie store included, the refresh token rides a cookie) and
//! attaches the current bearer token at send time, so a token installed by
//! the OTP flow is visible to the very next outbound request without call
//! sites knowing about sessions.

use crate::{error::AuthError, session::SessionStore, APP_USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

pub struct ApiClient {
    base_url: Url,
    store: Arc<SessionStore>,
    http: RwLock<Client>,
}

impl ApiClient {
    /// Builds a client for the given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` when the base URL does not parse or
    /// uses an unsupported scheme.
    pub fn new(base_url: &str, store: Arc<SessionStore>) -> Result<Self, AuthError> {
        let url = Url::parse(base_url)
            .map_err(|e| AuthError::InvalidInput(format!("invalid API URL: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AuthError::InvalidInput(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        Ok(Self {
            base_url: url,
            store,
            http: RwLock::new(build_http()?),
        })
    }

    /// Store backing this client's Authorization header.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Joins the base URL with an endpoint path.
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{}", endpoint.trim_start_matches('/'))
    }

    /// Starts a request with the current bearer token attached, if any. The
    /// store is consulted at call time; no token means no Authorization
    /// header and the backend decides what to do with that.
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.endpoint_url(endpoint);
        let builder = self.http().request(method, url);
        match self.store.current_token() {
            Some(token) => {
                builder.header("Authorization", format!("Bearer {}", token.expose_secret()))
            }
            None => builder,
        }
    }

    /// Sends a request, mapping connectivity failures to `NetworkUnavailable`.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, AuthError> {
        builder.send().await.map_err(|e| {
            debug!("request failed: {e:?}");
            AuthError::NetworkUnavailable(e.to_string())
        })
    }

    /// Drops the cookie jar, and with it the refresh-token cookie.
    pub fn reset_cookies(&self) {
        match build_http() {
            Ok(fresh) => {
                *self
                    .http
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner) = fresh;
            }
            Err(e) => warn!("Could not rebuild HTTP client, cookies kept: {e}"),
        }
    }

    fn http(&self) -> Client {
        self.http
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

fn build_http() -> Result<Client, AuthError> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .cookie_store(true)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AuthError::NetworkUnavailable(format!("could not build HTTP client: {e}")))
}

/// Pulls a user-facing message out of an error response, preferring the
/// server-supplied one and falling back to the given generic message.
pub(crate) async fn error_message(response: Response, fallback: &str) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if let Ok(value) = serde_json::from_str::<Value>(&body) {
        if let Some(message) = value["message"].as_str().or_else(|| value["error"].as_str()) {
            let trimmed = message.trim();
            if !trimmed.is_empty() {
                return trimmed.chars().take(MAX_ERROR_CHARS).collect();
            }
        }
    }
    format!("{fallback} ({status})")
}
