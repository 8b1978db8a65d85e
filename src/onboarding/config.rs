//! Per-tenant policy configuration.
//!
//! Loaded once per tenant and treated as immutable by the engine. Every field
//! has a default, so partial JSON documents are valid configurations.

use crate::onboarding::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Whether a credential must be created during login.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquirePolicy {
    /// Creation is required.
    Always,
    /// Creation is offered but can be skipped.
    Conditional,
    /// Never prompted during login.
    #[default]
    Never,
}

/// How devices become trusted after a successful MFA login.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTrustPolicy {
    /// The host trusts the device without asking.
    Always,
    /// The user is asked whether to trust the device.
    #[default]
    Prompt,
    /// Devices are never remembered.
    Never,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfaConfig {
    pub enabled: bool,
    pub totp_enabled: bool,
    pub security_keys_enabled: bool,
    pub device_trust_policy: DeviceTrustPolicy,
}

impl Default for MfaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            totp_enabled: true,
            security_keys_enabled: true,
            device_trust_policy: DeviceTrustPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CredentialConfig {
    pub enabled: bool,
    /// Only affects ordering when both credentials must be created.
    pub optional: bool,
    pub acquire_on_login: AcquirePolicy,
}

impl CredentialConfig {
    fn passkey() -> Self {
        Self {
            enabled: true,
            optional: true,
            acquire_on_login: AcquirePolicy::Always,
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            optional: true,
            acquire_on_login: AcquirePolicy::Never,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct IdentifierConfig {
    pub enabled: bool,
    pub acquire_on_login: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolicyDocument")]
pub struct PolicyConfig {
    pub mfa: MfaConfig,
    pub passkey: CredentialConfig,
    pub password: CredentialConfig,
    pub username: IdentifierConfig,
    pub email: IdentifierConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mfa: MfaConfig::default(),
            passkey: CredentialConfig::passkey(),
            password: CredentialConfig::default(),
            username: IdentifierConfig::default(),
            email: IdentifierConfig {
                enabled: true,
                acquire_on_login: false,
            },
        }
    }
}

/// Policy document as written; every field left out keeps the value of
/// [`PolicyConfig::default`] for its section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PolicyDocument {
    mfa: MfaConfig,
    passkey: CredentialSection,
    password: CredentialSection,
    username: IdentifierSection,
    email: IdentifierSection,
}

#[derive(Debug, Default, Deserialize)]
struct CredentialSection {
    enabled: Option<bool>,
    optional: Option<bool>,
    acquire_on_login: Option<AcquirePolicy>,
}

impl CredentialSection {
    fn over(self, base: CredentialConfig) -> CredentialConfig {
        CredentialConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            optional: self.optional.unwrap_or(base.optional),
            acquire_on_login: self.acquire_on_login.unwrap_or(base.acquire_on_login),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct IdentifierSection {
    enabled: Option<bool>,
    acquire_on_login: Option<bool>,
}

impl IdentifierSection {
    fn over(self, base: IdentifierConfig) -> IdentifierConfig {
        IdentifierConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            acquire_on_login: self.acquire_on_login.unwrap_or(base.acquire_on_login),
        }
    }
}

impl From<PolicyDocument> for PolicyConfig {
    fn from(document: PolicyDocument) -> Self {
        let defaults = Self::default();
        Self {
            mfa: document.mfa,
            passkey: document.passkey.over(defaults.passkey),
            password: document.password.over(defaults.password),
            username: document.username.over(defaults.username),
            email: document.email.over(defaults.email),
        }
    }
}

impl PolicyConfig {
    /// Parse a JSON policy document.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON or has wrongly typed fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON policy file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
