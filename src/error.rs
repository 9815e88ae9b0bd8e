//! Typed errors for the session and consent subsystem. Variants carry the
//! server-supplied message when one was returned, otherwise a generic one, so
//! callers can surface them directly in the UI.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("Could not send the one-time code: {0}")]
    OtpSendFailed(String),

    #[error("One-time code verification failed: {0}")]
    InvalidOtp(String),

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Agent registration failed: {0}")]
    AgentRegistrationFailed(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Could not fetch the user profile: {0}")]
    ProfileFetchFailed(String),

    #[error("Could not submit consent: {0}")]
    ConsentSubmitFailed(String),

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
