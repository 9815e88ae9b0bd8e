//! Consent gate: blocks the whole app until the signed-in identity has
//! acknowledged current terms. Evaluation is a pure function of the cached
//! profile; acknowledging is optimistic and never re-fetches on success. An
//! unacknowledged consent must never silently unblock the app.

use crate::{
    client::{error_message, ApiClient},
    error::AuthError,
    session::{SessionStore, UserProfile},
};
use reqwest::Method;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{debug, instrument, warn};

/// Whether the app may be used right now.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GateState {
    Allowed,
    Blocked,
}

/// Pure evaluation: a present profile without consent blocks the app;
/// anything else (including no profile yet) is allowed.
#[must_use]
pub fn evaluate(profile: Option<&UserProfile>) -> GateState {
    match profile {
        Some(user) if !user.consent_given => GateState::Blocked,
        _ => GateState::Allowed,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConsentRequest<'a> {
    consent_text: &'a str,
}

pub struct ConsentGate {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
    // At most one acknowledgment in flight per process; a second trigger
    // while one is pending is ignored, not fired in parallel.
    in_flight: AtomicBool,
}

impl ConsentGate {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, store: Arc<SessionStore>) -> Self {
        Self {
            client,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Gate state for the current session.
    pub fn state(&self) -> GateState {
        evaluate(self.store.snapshot().user.as_ref())
    }

    /// Submits a consent acknowledgment for the current user. Idempotent:
    /// once consent is recorded locally, repeat calls return `Allowed`
    /// without touching the network.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a cached profile, `ConsentSubmitFailed`
    /// when the backend rejects the record, `NetworkUnavailable` when it
    /// cannot be reached; the gate stays blocked and the call is safely
    /// retriable.
    #[instrument(skip_all)]
    pub async fn acknowledge(&self, consent_text: &str) -> Result<GateState, AuthError> {
        let Some(user) = self.store.snapshot().user else {
            return Err(AuthError::NotAuthenticated);
        };
        if user.consent_given {
            debug!("consent already recorded, nothing to submit");
            return Ok(GateState::Allowed);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // One submission is already pending; report the current state.
            debug!("consent submission already in flight, ignoring trigger");
            return Ok(self.state());
        }
        let _latch = InFlightLatch(&self.in_flight);

        let epoch = self.store.epoch();
        let request = ConsentRequest { consent_text };
        let response = self
            .client
            .send(
                self.client
                    .request(Method::PATCH, &format!("/users/{}/consent", user.id))
                    .json(&request),
            )
            .await?;

        if !response.status().is_success() {
            let message = error_message(response, "consent could not be recorded").await;
            return Err(AuthError::ConsentSubmitFailed(message));
        }

        if self.store.epoch() == epoch {
            // Optimistic local flip; no profile re-fetch required.
            self.store.mark_consented();
        } else {
            warn!("dropping consent result for a stale session");
        }
        Ok(GateState::Allowed)
    }
}

struct InFlightLatch<'a>(&'a AtomicBool);

impl Drop for InFlightLatch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::IdentityClass;

    fn profile(consented: bool) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            identity_class: IdentityClass::User,
            name: "Asha".to_string(),
            state: None,
            mandi_name: None,
            consent_given: consented,
        }
    }

    #[test]
    fn no_profile_is_allowed() {
        assert_eq!(evaluate(None), GateState::Allowed);
    }

    #[test]
    fn a_profile_without_consent_blocks() {
        assert_eq!(evaluate(Some(&profile(false))), GateState::Blocked);
    }

    #[test]
    fn a_consented_profile_is_allowed() {
        assert_eq!(evaluate(Some(&profile(true))), GateState::Allowed);
    }

    #[test]
    fn consent_request_wire_name_is_camel_case() {
        let value = serde_json::to_value(ConsentRequest {
            consent_text: "I agree",
        })
        .expect("encodes");
        assert_eq!(value["consentText"], "I agree");
    }
}
