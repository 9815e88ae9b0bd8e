//! Single-shot agent registration. No OTP handshake: the application fields
//! and the aadhaar document photo go up as one multipart payload and a token
//! comes back directly on success.

use crate::{
    auth::types::{AgentApplication, AgentRegisterResponse},
    client::{error_message, ApiClient},
    error::AuthError,
    session::SessionStore,
};
use reqwest::{
    multipart::{Form, Part},
    Method,
};
use secrecy::SecretString;
use tracing::{instrument, warn};

/// Submits an agent application and installs the issued token.
///
/// # Errors
///
/// `AgentRegistrationFailed` with the server message when the application is
/// rejected, `NetworkUnavailable` when the backend cannot be reached.
#[instrument(skip_all, fields(agent = %application.agent_name))]
pub async fn register_agent(
    client: &ApiClient,
    store: &SessionStore,
    application: AgentApplication,
    photo_file_name: String,
    photo: Vec<u8>,
) -> Result<(), AuthError> {
    let epoch = store.epoch();

    let form = Form::new()
        .text("agentName", application.agent_name)
        .text("phoneNumber", application.phone_number)
        .text("state", application.state)
        .text("mandiName", application.mandi_name)
        .text("aadhaarNumber", application.aadhaar_number)
        .part("aadhaarPhoto", Part::bytes(photo).file_name(photo_file_name));

    let response = client
        .send(
            client
                .request(Method::POST, "/auth/agent-register")
                .multipart(form),
        )
        .await?;

    if !response.status().is_success() {
        let message = error_message(response, "the agent application was not accepted").await;
        return Err(AuthError::AgentRegistrationFailed(message));
    }

    let body: AgentRegisterResponse = response
        .json()
        .await
        .map_err(|e| AuthError::AgentRegistrationFailed(format!("unreadable response: {e}")))?;

    if store.epoch() != epoch {
        warn!("dropping agent registration result for a stale session");
        return Ok(());
    }

    store.set_token(Some(SecretString::from(body.access_token)));
    Ok(())
}
