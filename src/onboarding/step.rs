//! Closed catalog of flow steps and flow error codes.
//!
//! Step names are the state names the host flow runtime knows about; the engine
//! only ever hands them over in order and never interprets them further.

use serde::{Deserialize, Serialize};

/// A unit of work the host flow runtime presents to the user next.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    LoginOtp,
    LoginSecurityKey,
    LoginPasswordRecovery,
    OnboardingCreatePasskey,
    PasswordCreation,
    CredentialOnboardingChooser,
    OnboardingUsername,
    OnboardingEmail,
    /// Entry point of the delegated "trust this device" sub-flow.
    DeviceTrust,
    Error,
    Success,
}

impl Step {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoginOtp => "login_otp",
            Self::LoginSecurityKey => "login_security_key",
            Self::LoginPasswordRecovery => "login_password_recovery",
            Self::OnboardingCreatePasskey => "onboarding_create_passkey",
            Self::PasswordCreation => "password_creation",
            Self::CredentialOnboardingChooser => "credential_onboarding_chooser",
            Self::OnboardingUsername => "onboarding_username",
            Self::OnboardingEmail => "onboarding_email",
            Self::DeviceTrust => "device_trust",
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal error codes rendered by the host's error step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowErrorCode {
    /// The user only owns a security key, the client cannot use it and no OTP
    /// fallback is available.
    PlatformAuthenticatorRequired,
}

impl FlowErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlatformAuthenticatorRequired => "platform_authenticator_required",
        }
    }
}

impl std::fmt::Display for FlowErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
