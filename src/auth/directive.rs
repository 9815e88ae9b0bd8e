//! Server directives and the OTP challenge state machine. The backend tells
//! the client which onboarding step comes next; the challenge tracks where a
//! given mobile number is in the handshake and never advances on failure.

use serde::{Deserialize, Serialize};

/// Next step the server instructed the client to perform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directive {
    /// Existing user, session established with the returned token.
    LoginVerify,
    /// New user, the client must complete registration for the same number.
    Register,
    /// Direct login, already normalized by the server.
    Home,
}

impl Directive {
    /// Directives that end the handshake with an authenticated session.
    #[must_use]
    pub fn is_terminal_login(self) -> bool {
        matches!(self, Self::LoginVerify | Self::Home)
    }
}

/// Where an OTP handshake currently stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OtpStep {
    AwaitingCode,
    CodeSent,
    Verified,
}

/// Transient record of an in-progress handshake. The mobile number is fixed
/// at creation; a different number means a new challenge.
#[derive(Clone, Debug)]
pub struct OtpChallenge {
    mobile_number: String,
    step: OtpStep,
}

impl OtpChallenge {
    #[must_use]
    pub fn new(mobile_number: String) -> Self {
        Self {
            mobile_number,
            step: OtpStep::AwaitingCode,
        }
    }

    #[must_use]
    pub fn mobile_number(&self) -> &str {
        &self.mobile_number
    }

    #[must_use]
    pub fn step(&self) -> OtpStep {
        self.step
    }

    /// The backend confirmed it sent a code.
    pub fn code_sent(&mut self) {
        self.step = OtpStep::CodeSent;
    }

    /// The backend accepted the code; registration becomes callable.
    pub fn verified(&mut self) {
        self.step = OtpStep::Verified;
    }

    /// Whether `complete_registration` is valid for this challenge.
    #[must_use]
    pub fn can_register(&self) -> bool {
        self.step == OtpStep::Verified
    }
}
