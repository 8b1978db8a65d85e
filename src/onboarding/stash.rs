//! Per-session key-value stash and the typed session snapshot read from it.
//!
//! The host runtime owns the stash and carries it across flow steps. Values are
//! JSON and addressed by dotted paths (`user.profile.email`). The engine reads
//! the session fields listed below and writes only the idempotency flag.

use crate::onboarding::error::StashError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const PATH_LOGIN_METHOD: &str = "login_method";
pub const PATH_USER_ID: &str = "user_id";
pub const PATH_LOGIN_ONBOARDING_SCHEDULED: &str = "login_onboarding_scheduled";
pub const PATH_USER_HAS_SECURITY_KEY: &str = "user_has_security_key";
pub const PATH_USER_HAS_OTP_SECRET: &str = "user_has_otp_secret";
pub const PATH_SECURITY_KEY_ATTACHMENT_SUPPORTED: &str = "security_key_attachment_supported";
pub const PATH_USER_HAS_PASSWORD: &str = "user_has_password";
pub const PATH_USER_HAS_PASSKEY: &str = "user_has_passkey";
pub const PATH_WEBAUTHN_AVAILABLE: &str = "webauthn_available";
pub const PATH_USER_HAS_USERNAME: &str = "user_has_username";
pub const PATH_USER_HAS_EMAILS: &str = "user_has_emails";
pub const PATH_PASSWORD_RECOVERY_PENDING: &str = "pw_recovery_pending";

/// Typed access to the host's session stash.
pub trait Stash {
    fn get(&self, path: &str) -> Option<&Value>;

    /// # Errors
    /// Returns an error if the value cannot be stored at `path`.
    fn set(&mut self, path: &str, value: Value) -> Result<(), StashError>;

    /// Missing or non-boolean values read as `false`.
    fn get_bool(&self, path: &str) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Missing or non-string values read as an empty string.
    fn get_str(&self, path: &str) -> &str {
        self.get(path).and_then(Value::as_str).unwrap_or_default()
    }
}

/// In-memory stash backed by a JSON object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStash {
    root: Map<String, Value>,
}

impl MemoryStash {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON document.
    ///
    /// # Errors
    /// Returns an error if `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, StashError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(StashError::NotAnObject(type_name(&other).to_string())),
        }
    }

    #[must_use]
    pub fn into_inner(self) -> Value {
        Value::Object(self.root)
    }
}

impl Stash for MemoryStash {
    fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), StashError> {
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(StashError::EmptyPath);
        }

        let (parents, leaf) = match path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };

        let mut current = &mut self.root;
        if let Some(parents) = parents {
            for segment in parents.split('.') {
                let entry = current
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                current = entry
                    .as_object_mut()
                    .ok_or_else(|| StashError::NotAnObject(segment.to_string()))?;
            }
        }

        current.insert(leaf.to_string(), value);
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// How the user authenticated in the current login flow.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    Passcode,
    Password,
    Passkey,
    ThirdParty,
}

impl LoginMethod {
    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim() {
            "passcode" => Some(Self::Passcode),
            "password" => Some(Self::Password),
            "passkey" => Some(Self::Passkey),
            "third_party" => Some(Self::ThirdParty),
            _ => None,
        }
    }
}

/// Read-only snapshot of the stash fields the engine decides on.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionState {
    pub login_method: Option<LoginMethod>,
    pub user_id: Uuid,
    pub onboarding_scheduled: bool,
    pub user_has_security_key: bool,
    pub user_has_otp_secret: bool,
    pub security_key_attachment_supported: bool,
    pub user_has_password: bool,
    pub user_has_passkey: bool,
    pub webauthn_available: bool,
    pub user_has_username: bool,
    pub user_has_email: bool,
    pub password_recovery_pending: bool,
}

impl SessionState {
    /// Project the stash into a typed snapshot. An unparsable user id becomes
    /// the nil UUID.
    pub fn from_stash(stash: &dyn Stash) -> Self {
        Self {
            login_method: LoginMethod::from_str(stash.get_str(PATH_LOGIN_METHOD)),
            user_id: Uuid::parse_str(stash.get_str(PATH_USER_ID)).unwrap_or_default(),
            onboarding_scheduled: stash.get_bool(PATH_LOGIN_ONBOARDING_SCHEDULED),
            user_has_security_key: stash.get_bool(PATH_USER_HAS_SECURITY_KEY),
            user_has_otp_secret: stash.get_bool(PATH_USER_HAS_OTP_SECRET),
            security_key_attachment_supported: stash
                .get_bool(PATH_SECURITY_KEY_ATTACHMENT_SUPPORTED),
            user_has_password: stash.get_bool(PATH_USER_HAS_PASSWORD),
            user_has_passkey: stash.get_bool(PATH_USER_HAS_PASSKEY),
            webauthn_available: stash.get_bool(PATH_WEBAUTHN_AVAILABLE),
            user_has_username: stash.get_bool(PATH_USER_HAS_USERNAME),
            user_has_email: stash.get_bool(PATH_USER_HAS_EMAILS),
            password_recovery_pending: stash.get_bool(PATH_PASSWORD_RECOVERY_PENDING),
        }
    }

    #[must_use]
    pub fn logged_in_with_passkey(&self) -> bool {
        self.login_method == Some(LoginMethod::Passkey)
    }
}
