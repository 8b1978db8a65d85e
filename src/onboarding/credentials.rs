//! Credential onboarding: which of password and passkey must still be created.
//!
//! Each credential carries an [`AcquirePolicy`]. While a password recovery is
//! pending the password policy is treated as `Never` so the reset is not
//! interrupted by a creation prompt. The `optional` flags only decide the order
//! when both credentials are required at once.

use crate::onboarding::{
    config::{AcquirePolicy, PolicyConfig},
    stash::SessionState,
    step::Step,
};

/// Inputs of the credential decision, projected from the session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CredentialState {
    pub has_passkey: bool,
    pub has_password: bool,
    pub webauthn_available: bool,
    pub recovery_pending: bool,
}

impl From<&SessionState> for CredentialState {
    fn from(state: &SessionState) -> Self {
        Self {
            has_passkey: state.user_has_passkey,
            has_password: state.user_has_password,
            webauthn_available: state.webauthn_available,
            recovery_pending: state.password_recovery_pending,
        }
    }
}

/// Credential policies after applying session overrides.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct EffectivePolicy {
    passkey_enabled: bool,
    password_enabled: bool,
    passkey: AcquirePolicy,
    password: AcquirePolicy,
    password_first: bool,
}

impl EffectivePolicy {
    fn new(config: &PolicyConfig, state: CredentialState) -> Self {
        let password = if state.recovery_pending {
            AcquirePolicy::Never
        } else {
            config.password.acquire_on_login
        };

        Self {
            passkey_enabled: state.webauthn_available && config.passkey.enabled,
            password_enabled: config.password.enabled,
            passkey: config.passkey.acquire_on_login,
            password,
            password_first: !config.password.optional && config.passkey.optional,
        }
    }
}

/// Decide which credential creation steps to schedule, in order.
#[must_use]
pub fn evaluate(config: &PolicyConfig, state: CredentialState) -> Vec<Step> {
    let policy = EffectivePolicy::new(config, state);

    match (policy.passkey_enabled, policy.password_enabled) {
        (true, true) => both_enabled(&policy, state),
        (true, false) => single(policy.passkey, state.has_passkey, Step::OnboardingCreatePasskey),
        (false, true) => single(policy.password, state.has_password, Step::PasswordCreation),
        (false, false) => Vec::new(),
    }
}

fn single(policy: AcquirePolicy, has_credential: bool, step: Step) -> Vec<Step> {
    match policy {
        AcquirePolicy::Always | AcquirePolicy::Conditional if !has_credential => vec![step],
        _ => Vec::new(),
    }
}

fn both_enabled(policy: &EffectivePolicy, state: CredentialState) -> Vec<Step> {
    use AcquirePolicy::{Always, Conditional, Never};
    use Step::{CredentialOnboardingChooser, OnboardingCreatePasskey, PasswordCreation};

    let CredentialState {
        has_passkey,
        has_password,
        ..
    } = state;
    let has_neither = !has_passkey && !has_password;

    match (policy.passkey, policy.password) {
        (Always, Always) => match (has_passkey, has_password) {
            (false, false) if policy.password_first => vec![PasswordCreation, OnboardingCreatePasskey],
            (false, false) => vec![OnboardingCreatePasskey, PasswordCreation],
            (true, false) => vec![PasswordCreation],
            (false, true) => vec![OnboardingCreatePasskey],
            (true, true) => Vec::new(),
        },
        // Skipping the passkey leads the host to offer the password instead.
        (Always, Conditional) if !has_passkey => vec![OnboardingCreatePasskey],
        (Conditional, Always) if !has_password => vec![PasswordCreation],
        (Conditional, Conditional) if has_neither => vec![CredentialOnboardingChooser],
        (Conditional, Never) if has_neither => vec![OnboardingCreatePasskey],
        (Never, Conditional) if has_neither => vec![PasswordCreation],
        (Never, Always) if !has_password => vec![PasswordCreation],
        (Always, Never) if !has_passkey => vec![OnboardingCreatePasskey],
        (Always | Conditional | Never, Always | Conditional | Never) => Vec::new(),
    }
}
