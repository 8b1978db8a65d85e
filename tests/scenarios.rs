use onboarding_policy::onboarding::{
    config::{CredentialConfig, IdentifierConfig, MfaConfig},
    AcquirePolicy, DeviceTrustPolicy, FlowContext, FlowErrorCode, MemoryStash,
    NoDeviceOnboarding, OnboardingPolicyEngine, PolicyConfig, Stash, Step, StepQueue,
    TrustDeviceOnboarding, TrustedDevices,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const POLICIES: [AcquirePolicy; 3] = [
    AcquirePolicy::Always,
    AcquirePolicy::Conditional,
    AcquirePolicy::Never,
];

fn credential(acquire_on_login: AcquirePolicy, optional: bool) -> CredentialConfig {
    CredentialConfig {
        enabled: true,
        optional,
        acquire_on_login,
    }
}

fn base_config() -> PolicyConfig {
    PolicyConfig {
        mfa: MfaConfig {
            enabled: true,
            totp_enabled: true,
            security_keys_enabled: true,
            device_trust_policy: DeviceTrustPolicy::Prompt,
        },
        passkey: credential(AcquirePolicy::Always, true),
        password: credential(AcquirePolicy::Never, true),
        username: IdentifierConfig::default(),
        email: IdentifierConfig {
            enabled: true,
            acquire_on_login: true,
        },
    }
}

fn session(fields: Value) -> MemoryStash {
    let mut stash = MemoryStash::from_value(fields).unwrap();
    if stash.get("user_id").is_none() {
        stash
            .set("user_id", Value::from(Uuid::new_v4().to_string()))
            .unwrap();
    }
    stash
}

fn schedule(config: PolicyConfig, stash: &mut MemoryStash) -> StepQueue {
    let config = Arc::new(config);
    let engine = OnboardingPolicyEngine::new(
        config.clone(),
        TrustedDevices::default(),
        TrustDeviceOnboarding::new(config.mfa.clone(), TrustedDevices::default()),
    );
    let mut queue = StepQueue::new();
    engine
        .schedule(&mut FlowContext::new(stash, &mut queue))
        .unwrap();
    queue
}

#[test]
fn mfa_disabled_passkey_login_without_gaps() {
    let mut config = base_config();
    config.mfa.enabled = false;
    let mut stash = session(json!({
        "login_method": "passkey",
        "user_has_passkey": true,
        "user_has_emails": true,
        "webauthn_available": true,
    }));

    let queue = schedule(config, &mut stash);
    assert_eq!(queue.steps(), &[Step::Success]);
    assert_eq!(queue.flow_error(), None);
}

#[test]
fn security_key_on_unsupported_client_without_totp() {
    let mut config = base_config();
    config.mfa.totp_enabled = false;
    let mut stash = session(json!({
        "login_method": "password",
        "user_has_security_key": true,
        "security_key_attachment_supported": false,
        "user_has_passkey": true,
        "user_has_emails": true,
        "webauthn_available": true,
    }));

    let queue = schedule(config, &mut stash);
    assert_eq!(queue.steps().first(), Some(&Step::Error));
    assert_eq!(
        queue.flow_error(),
        Some(FlowErrorCode::PlatformAuthenticatorRequired)
    );
}

#[test]
fn mandatory_password_is_created_before_optional_passkey() {
    let mut config = base_config();
    config.passkey = credential(AcquirePolicy::Always, true);
    config.password = credential(AcquirePolicy::Always, false);
    let mut stash = session(json!({
        "login_method": "passcode",
        "user_has_emails": true,
        "webauthn_available": true,
    }));

    let queue = schedule(config, &mut stash);
    assert_eq!(
        queue.steps(),
        &[
            Step::PasswordCreation,
            Step::OnboardingCreatePasskey,
            Step::Success
        ]
    );
}

#[test]
fn conditional_credentials_offer_the_chooser() {
    let mut config = base_config();
    config.passkey = credential(AcquirePolicy::Conditional, true);
    config.password = credential(AcquirePolicy::Conditional, true);
    let mut stash = session(json!({
        "login_method": "passcode",
        "webauthn_available": true,
    }));

    let queue = schedule(config, &mut stash);
    assert!(queue.steps().contains(&Step::CredentialOnboardingChooser));
}

#[test]
fn missing_username_is_requested_but_present_email_is_not() {
    let mut config = base_config();
    config.username = IdentifierConfig {
        enabled: true,
        acquire_on_login: true,
    };
    let mut stash = session(json!({
        "login_method": "passkey",
        "user_has_passkey": true,
        "user_has_emails": true,
        "webauthn_available": true,
    }));

    let queue = schedule(config, &mut stash);
    assert!(queue.steps().contains(&Step::OnboardingUsername));
    assert!(!queue.steps().contains(&Step::OnboardingEmail));
}

#[test]
fn repeated_invocation_schedules_once() {
    let mut stash = session(json!({
        "login_method": "password",
        "user_has_otp_secret": true,
        "webauthn_available": true,
    }));

    let first = schedule(base_config(), &mut stash);
    assert_eq!(first.steps().last(), Some(&Step::Success));

    let second = schedule(base_config(), &mut stash);
    assert!(second.steps().is_empty());
}

/// Position of a step in the global ordering.
fn rank(step: Step) -> u8 {
    match step {
        Step::LoginOtp | Step::LoginSecurityKey | Step::Error => 0,
        Step::LoginPasswordRecovery => 1,
        Step::OnboardingUsername | Step::OnboardingEmail => 2,
        Step::OnboardingCreatePasskey | Step::PasswordCreation | Step::CredentialOnboardingChooser => 3,
        Step::DeviceTrust => 4,
        Step::Success => 5,
    }
}

const SESSION_FLAGS: [&str; 9] = [
    "user_has_security_key",
    "user_has_otp_secret",
    "security_key_attachment_supported",
    "user_has_password",
    "user_has_passkey",
    "webauthn_available",
    "user_has_username",
    "user_has_emails",
    "pw_recovery_pending",
];

#[test]
fn global_ordering_and_policy_properties_hold() {
    for passkey in POLICIES {
        for password in POLICIES {
            for mfa_enabled in [false, true] {
                for bits in 0u16..(1 << (SESSION_FLAGS.len() + 1)) {
                    let mut config = base_config();
                    config.mfa.enabled = mfa_enabled;
                    config.passkey.acquire_on_login = passkey;
                    config.password.acquire_on_login = password;
                    config.username = IdentifierConfig {
                        enabled: true,
                        acquire_on_login: true,
                    };

                    let mut fields = serde_json::Map::new();
                    for (index, flag) in SESSION_FLAGS.iter().enumerate() {
                        fields.insert((*flag).to_string(), Value::Bool(bits & (1 << index) != 0));
                    }
                    let passkey_login = bits & (1 << SESSION_FLAGS.len()) != 0;
                    fields.insert(
                        "login_method".to_string(),
                        Value::from(if passkey_login { "passkey" } else { "password" }),
                    );
                    let recovery_pending = fields["pw_recovery_pending"] == Value::Bool(true);

                    let mut stash = session(Value::Object(fields));
                    let queue = schedule(config, &mut stash);
                    let steps = queue.steps();
                    let context = format!("{passkey:?}/{password:?} mfa={mfa_enabled} bits={bits:#b}");

                    assert_eq!(steps.last(), Some(&Step::Success), "{context}");
                    assert!(
                        steps.windows(2).all(|pair| rank(pair[0]) <= rank(pair[1])),
                        "{context}: {steps:?}"
                    );
                    assert!(
                        steps.iter().filter(|step| rank(**step) == 0).count() <= 1,
                        "{context}: {steps:?}"
                    );

                    if !mfa_enabled || passkey_login {
                        assert!(steps.iter().all(|step| rank(*step) != 0), "{context}");
                        assert_eq!(queue.flow_error(), None, "{context}");
                    }

                    if recovery_pending {
                        assert!(!steps.contains(&Step::PasswordCreation), "{context}");
                        assert!(steps.contains(&Step::LoginPasswordRecovery), "{context}");
                    } else {
                        assert!(!steps.contains(&Step::LoginPasswordRecovery), "{context}");
                    }
                }
            }
        }
    }
}

#[test]
fn trusted_device_skips_mfa_regardless_of_factors() {
    let user_id = Uuid::new_v4();
    let config = Arc::new(base_config());
    let engine = OnboardingPolicyEngine::new(
        config.clone(),
        TrustedDevices::new([user_id]),
        NoDeviceOnboarding,
    );
    let mut stash = session(json!({
        "login_method": "password",
        "user_id": user_id.to_string(),
        "user_has_security_key": true,
        "security_key_attachment_supported": true,
        "user_has_otp_secret": true,
        "user_has_passkey": true,
        "user_has_emails": true,
        "webauthn_available": true,
    }));

    let mut queue = StepQueue::new();
    engine
        .schedule(&mut FlowContext::new(&mut stash, &mut queue))
        .unwrap();
    assert_eq!(queue.steps(), &[Step::Success]);
}

#[test]
fn partial_email_section_still_requests_email() {
    let config = PolicyConfig::from_json_str(
        r#"{"mfa": {"enabled": false}, "email": {"acquire_on_login": true}}"#,
    )
    .unwrap();
    let mut stash = session(json!({
        "login_method": "password",
        "user_has_passkey": true,
        "webauthn_available": true,
    }));

    let queue = schedule(config, &mut stash);
    assert_eq!(queue.steps(), &[Step::OnboardingEmail, Step::Success]);
}
