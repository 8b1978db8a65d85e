//! MFA requirement evaluation.
//!
//! Evaluation order, first match wins:
//! 1) MFA disabled for the tenant.
//! 2) The user logged in with a passkey, which already counts as strong auth.
//! 3) The device is trusted for this user.
//! 4) Security key if enabled and owned, falling back to OTP when the client
//!    cannot use the key; OTP alone otherwise.

use crate::onboarding::{
    config::MfaConfig,
    stash::SessionState,
    step::{FlowErrorCode, Step},
};
use std::collections::HashSet;
use uuid::Uuid;

/// Remembered-device lookup.
pub trait DeviceTrust {
    fn is_trusted(&self, user_id: Uuid) -> bool;
}

impl<F> DeviceTrust for F
where
    F: Fn(Uuid) -> bool,
{
    fn is_trusted(&self, user_id: Uuid) -> bool {
        self(user_id)
    }
}

/// Fixed set of users whose current device is trusted.
#[derive(Clone, Debug, Default)]
pub struct TrustedDevices {
    users: HashSet<Uuid>,
}

impl TrustedDevices {
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }
}

impl DeviceTrust for TrustedDevices {
    fn is_trusted(&self, user_id: Uuid) -> bool {
        self.users.contains(&user_id)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MfaSkipReason {
    Disabled,
    PasskeyLogin,
    TrustedDevice,
    NoUsableFactor,
}

/// Outcome of the MFA evaluation; maps to at most one step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MfaRequirement {
    Skipped(MfaSkipReason),
    SecurityKey,
    Otp,
    /// Security-key-only user on a client that cannot attach the key.
    PlatformAuthenticatorRequired,
}

impl MfaRequirement {
    #[must_use]
    pub fn steps(self) -> Vec<Step> {
        match self {
            Self::Skipped(_) => Vec::new(),
            Self::SecurityKey => vec![Step::LoginSecurityKey],
            Self::Otp => vec![Step::LoginOtp],
            Self::PlatformAuthenticatorRequired => vec![Step::Error],
        }
    }

    #[must_use]
    pub fn flow_error(self) -> Option<FlowErrorCode> {
        match self {
            Self::PlatformAuthenticatorRequired => Some(FlowErrorCode::PlatformAuthenticatorRequired),
            _ => None,
        }
    }
}

/// Decide which MFA step, if any, the login needs.
pub fn evaluate(config: &MfaConfig, state: &SessionState, trust: &dyn DeviceTrust) -> MfaRequirement {
    if !config.enabled {
        return MfaRequirement::Skipped(MfaSkipReason::Disabled);
    }

    if state.logged_in_with_passkey() {
        return MfaRequirement::Skipped(MfaSkipReason::PasskeyLogin);
    }

    if trust.is_trusted(state.user_id) {
        return MfaRequirement::Skipped(MfaSkipReason::TrustedDevice);
    }

    let can_use_otp = config.totp_enabled && state.user_has_otp_secret;

    if config.security_keys_enabled && state.user_has_security_key {
        if state.security_key_attachment_supported {
            MfaRequirement::SecurityKey
        } else if can_use_otp {
            MfaRequirement::Otp
        } else {
            MfaRequirement::PlatformAuthenticatorRequired
        }
    } else if can_use_otp {
        MfaRequirement::Otp
    } else {
        MfaRequirement::Skipped(MfaSkipReason::NoUsableFactor)
    }
}
