//! OTP onboarding flows.
//!
//! Flow Overview: `request_code` asks the backend to text a one-time code,
//! `verify_code` exchanges it for a directive, and depending on that
//! directive the caller either has a session already or continues with
//! `complete_registration`. Agents go through a parallel single-shot
//! multipart flow with no OTP.

pub mod agent;
pub mod directive;
pub mod otp;
pub mod types;

pub use directive::{Directive, OtpChallenge, OtpStep};
pub use otp::OtpOrchestrator;

use regex::Regex;

/// Checks that a mobile number is a plausible phone identifier: digits with
/// an optional leading `+`, 10 to 14 digits long.
#[must_use]
pub fn valid_mobile(mobile: &str) -> bool {
    Regex::new(r"^\+?[0-9]{10,14}$").map_or(false, |re| re.is_match(mobile.trim()))
}
