use crate::{
    onboarding::{
        FlowContext, MemoryStash, OnboardingPolicyEngine, PolicyConfig, StepQueue,
        TrustDeviceOnboarding, TrustedDevices,
    },
    GIT_COMMIT_HASH,
};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::{fs, path::PathBuf, sync::Arc};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub session: PathBuf,
    pub trusted_users: Vec<Uuid>,
}

/// Scheduled steps plus the stash as the engine left it.
#[derive(Debug, Serialize)]
pub struct Output {
    #[serde(flatten)]
    pub queue: StepQueue,
    pub stash: Value,
}

/// Run one scheduling pass over the session snapshot.
///
/// # Errors
/// Returns an error if the config or session cannot be loaded, or scheduling fails.
pub fn run(args: Args) -> Result<Output> {
    let config = match &args.config {
        Some(path) => PolicyConfig::load(path)
            .with_context(|| format!("Failed to load policy config: {}", path.display()))?,
        None => PolicyConfig::default(),
    };

    let session = fs::read_to_string(&args.session)
        .with_context(|| format!("Failed to read session: {}", args.session.display()))?;
    let session: Value = serde_json::from_str(&session).context("Invalid session JSON")?;
    let mut stash = MemoryStash::from_value(session).context("Invalid session stash")?;

    debug!(
        build = GIT_COMMIT_HASH,
        trusted_users = args.trusted_users.len(),
        "planning onboarding"
    );

    let trusted = TrustedDevices::new(args.trusted_users);
    let engine = OnboardingPolicyEngine::new(
        Arc::new(config.clone()),
        trusted.clone(),
        TrustDeviceOnboarding::new(config.mfa, trusted),
    );

    let mut queue = StepQueue::new();
    engine
        .schedule(&mut FlowContext::new(&mut stash, &mut queue))
        .context("Failed to schedule onboarding steps")?;

    Ok(Output {
        queue,
        stash: stash.into_inner(),
    })
}

/// Execute the plan action and print the result as JSON.
///
/// # Errors
/// Returns an error if planning fails or the output cannot be serialized.
pub fn execute(args: Args) -> Result<()> {
    let output = run(args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::{FlowErrorCode, Step};
    use serde_json::json;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(contents: &Value) -> Self {
            let path = std::env::temp_dir().join(format!("onboarding-{}.json", Uuid::new_v4()));
            fs::write(&path, contents.to_string()).unwrap();
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn plans_with_default_config() {
        let user_id = Uuid::new_v4();
        let session = TempFile::new(&json!({
            "login_method": "password",
            "user_id": user_id.to_string(),
            "user_has_otp_secret": true,
            "user_has_passkey": true,
            "webauthn_available": true,
        }));

        let output = run(Args {
            config: None,
            session: session.0.clone(),
            trusted_users: Vec::new(),
        })
        .unwrap();

        assert_eq!(
            output.queue.steps(),
            &[Step::LoginOtp, Step::DeviceTrust, Step::Success]
        );
        assert_eq!(output.stash["login_onboarding_scheduled"], json!(true));
    }

    #[test]
    fn trusted_user_skips_mfa_and_prompt() {
        let user_id = Uuid::new_v4();
        let session = TempFile::new(&json!({
            "login_method": "password",
            "user_id": user_id.to_string(),
            "user_has_otp_secret": true,
            "user_has_passkey": true,
            "webauthn_available": true,
        }));

        let output = run(Args {
            config: None,
            session: session.0.clone(),
            trusted_users: vec![user_id],
        })
        .unwrap();

        assert_eq!(output.queue.steps(), &[Step::Success]);
    }

    #[test]
    fn uses_config_file() {
        let config = TempFile::new(&json!({
            "mfa": {"security_keys_enabled": true, "totp_enabled": false},
        }));
        let session = TempFile::new(&json!({
            "login_method": "password",
            "user_id": Uuid::new_v4().to_string(),
            "user_has_security_key": true,
            "user_has_passkey": true,
            "webauthn_available": true,
        }));

        let output = run(Args {
            config: Some(config.0.clone()),
            session: session.0.clone(),
            trusted_users: Vec::new(),
        })
        .unwrap();

        assert_eq!(
            output.queue.flow_error(),
            Some(FlowErrorCode::PlatformAuthenticatorRequired)
        );
        assert_eq!(output.queue.steps()[0], Step::Error);

        let encoded = serde_json::to_value(&output).unwrap();
        assert_eq!(encoded["flow_error"], json!("platform_authenticator_required"));
        assert_eq!(encoded["steps"][0], json!("error"));
    }

    #[test]
    fn rejects_non_object_session() {
        let session = TempFile::new(&json!(["not", "an", "object"]));
        let err = run(Args {
            config: None,
            session: session.0.clone(),
            trusted_users: Vec::new(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("Invalid session stash"));
    }

    #[test]
    fn reports_missing_session_file() {
        let err = run(Args {
            config: None,
            session: PathBuf::from("/nonexistent/session.json"),
            trusted_users: Vec::new(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read session"));
    }
}
