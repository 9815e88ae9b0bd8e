//! Client core for the Beema consumer app: OTP onboarding, session
//! persistence, authenticated requests, identity resolution, and the consent
//! gate that blocks the app until current terms are acknowledged.
//!
//! Flow Overview: a UI action drives the OTP orchestrator; on success the
//! session store is populated, every subsequent request carries the bearer
//! token, the identity resolver hydrates the canonical profile, and the
//! consent gate re-evaluates whether the app is allowed to proceed.

pub mod auth;
pub mod cli;
pub mod client;
pub mod consent;
pub mod error;
pub mod identity;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
