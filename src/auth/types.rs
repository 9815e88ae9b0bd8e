//! Request and response types for the auth endpoints. Wire names are
//! camelCase per the backend contract. These payloads carry one-time codes
//! and tokens, so they must never be logged.

use crate::{auth::directive::Directive, session::UserProfile};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub mobile_number: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SendOtpResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub mobile_number: String,
    pub otp: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub next: Directive,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Profile fields submitted when the server directed the client to register.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub state: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub mobile_number: String,
    pub state: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Agent application fields; the aadhaar photo travels as a separate
/// multipart part.
#[derive(Clone, Debug)]
pub struct AgentApplication {
    pub agent_name: String,
    pub phone_number: String,
    pub state: String,
    pub mandi_name: String,
    pub aadhaar_number: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRegisterResponse {
    pub access_token: String,
}
