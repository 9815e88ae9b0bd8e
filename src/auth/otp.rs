//! The OTP handshake orchestrator. Drives request-code, verify-code, and
//! complete-registration against the backend and interprets the returned
//! directive. Each step is user-triggered; there is no automatic retry.

use crate::{
    auth::{
        directive::{Directive, OtpChallenge, OtpStep},
        types::{
            NewUser, RegisterRequest, RegisterResponse, SendOtpRequest, SendOtpResponse,
            VerifyOtpRequest, VerifyOtpResponse,
        },
        valid_mobile,
    },
    client::{error_message, ApiClient},
    error::AuthError,
    session::SessionStore,
};
use reqwest::Method;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

pub struct OtpOrchestrator {
    client: Arc<ApiClient>,
    store: Arc<SessionStore>,
    challenge: Mutex<Option<OtpChallenge>>,
}

impl OtpOrchestrator {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, store: Arc<SessionStore>) -> Self {
        Self {
            client,
            store,
            challenge: Mutex::new(None),
        }
    }

    /// Current handshake step, if a challenge is in progress.
    pub fn challenge_step(&self) -> Option<OtpStep> {
        self.lock_challenge().as_ref().map(OtpChallenge::step)
    }

    /// Asks the backend to send a one-time code to the given number.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an implausible number, `NetworkUnavailable` when
    /// the backend cannot be reached, `OtpSendFailed` otherwise.
    #[instrument(skip(self))]
    pub async fn request_code(&self, mobile_number: &str) -> Result<Option<String>, AuthError> {
        let mobile = mobile_number.trim();
        if !valid_mobile(mobile) {
            return Err(AuthError::InvalidInput(
                "a valid mobile number is required".to_string(),
            ));
        }

        let request = SendOtpRequest {
            mobile_number: mobile.to_string(),
        };
        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, "/auth/send-otp")
                    .json(&request),
            )
            .await?;

        if !response.status().is_success() {
            let message = error_message(response, "could not send the one-time code").await;
            return Err(AuthError::OtpSendFailed(message));
        }

        let body: SendOtpResponse = response
            .json()
            .await
            .unwrap_or(SendOtpResponse { message: None });

        let mut challenge = OtpChallenge::new(mobile.to_string());
        challenge.code_sent();
        *self.lock_challenge() = Some(challenge);

        debug!("one-time code requested");
        Ok(body.message)
    }

    /// Submits the code the user received and interprets the directive.
    ///
    /// If the response carries a token the session store is populated before
    /// this returns, so the very next outbound call is authenticated. A
    /// missing local challenge is tolerated; the backend is authoritative.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the number differs from the pending challenge,
    /// `InvalidOtp` when the backend rejects the code.
    #[instrument(skip(self, otp))]
    pub async fn verify_code(
        &self,
        mobile_number: &str,
        otp: &str,
    ) -> Result<Directive, AuthError> {
        let mobile = mobile_number.trim();
        if let Some(challenge) = self.lock_challenge().as_ref() {
            // The mobile number is fixed once a challenge exists.
            if challenge.mobile_number() != mobile {
                return Err(AuthError::InvalidInput(
                    "the code was requested for a different number".to_string(),
                ));
            }
        }

        let epoch = self.store.epoch();
        let request = VerifyOtpRequest {
            mobile_number: mobile.to_string(),
            otp: otp.trim().to_string(),
        };
        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, "/auth/verify-otp")
                    .json(&request),
            )
            .await?;

        if !response.status().is_success() {
            let message = error_message(response, "the one-time code was not accepted").await;
            return Err(AuthError::InvalidOtp(message));
        }

        let body: VerifyOtpResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidOtp(format!("unreadable response: {e}")))?;

        if self.store.epoch() != epoch {
            // The session was cleared or replaced while this was in flight.
            warn!("dropping verify-otp result for a stale session");
            return Ok(body.next);
        }

        if let Some(token) = body.access_token {
            self.store.set_token(Some(SecretString::from(token)));
        }
        if let Some(user) = body.user {
            self.store.set_user(user);
        }

        let mut challenge = self.lock_challenge();
        match body.next {
            Directive::Register => match challenge.as_mut() {
                Some(pending) => pending.verified(),
                None => {
                    let mut fresh = OtpChallenge::new(mobile.to_string());
                    fresh.verified();
                    *challenge = Some(fresh);
                }
            },
            Directive::LoginVerify | Directive::Home => *challenge = None,
        }

        Ok(body.next)
    }

    /// Completes registration after a `REGISTER` directive. A token is always
    /// issued on success and installed before this returns.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when no verified challenge exists,
    /// `RegistrationFailed` when the backend rejects the profile.
    #[instrument(skip(self, profile))]
    pub async fn complete_registration(&self, profile: NewUser) -> Result<(), AuthError> {
        let mobile = match self.lock_challenge().as_ref() {
            Some(challenge) if challenge.can_register() => challenge.mobile_number().to_string(),
            _ => {
                return Err(AuthError::InvalidInput(
                    "verify the one-time code before registering".to_string(),
                ))
            }
        };

        let epoch = self.store.epoch();
        let request = RegisterRequest {
            name: profile.name,
            mobile_number: mobile,
            state: profile.state,
        };
        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, "/auth/register")
                    .json(&request),
            )
            .await?;

        if !response.status().is_success() {
            let message = error_message(response, "registration was not accepted").await;
            return Err(AuthError::RegistrationFailed(message));
        }

        let body: RegisterResponse = response
            .json()
            .await
            .map_err(|e| AuthError::RegistrationFailed(format!("unreadable response: {e}")))?;

        if self.store.epoch() != epoch {
            warn!("dropping registration result for a stale session");
            return Ok(());
        }

        self.store.set_token(Some(SecretString::from(body.access_token)));
        if let Some(user) = body.user {
            self.store.set_user(user);
        }
        *self.lock_challenge() = None;

        Ok(())
    }

    fn lock_challenge(&self) -> std::sync::MutexGuard<'_, Option<OtpChallenge>> {
        self.challenge
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
