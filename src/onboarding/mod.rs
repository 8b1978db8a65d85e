//! Post-login onboarding step policy.
//!
//! Flow Overview:
//! 1) The host runtime calls [`OnboardingPolicyEngine::schedule`] once the user
//!    has authenticated.
//! 2) The `login_onboarding_scheduled` flag is committed to the stash; a session
//!    that already carries it is left untouched.
//! 3) MFA, profile detail and credential policies are evaluated independently
//!    from a snapshot of the stash.
//! 4) Steps are appended in a fixed order: MFA, password recovery (if pending),
//!    username/email, credential creation, device onboarding, `Success`.
//!
//! Security boundaries:
//! - A security-key-only user on a client that cannot attach the key gets a
//!   terminal `Error` step with `platform_authenticator_required` instead of a
//!   silently skipped MFA check.
//! - A pending password recovery is never interrupted by a password creation
//!   prompt.

pub mod config;
pub mod credentials;
pub mod device;
pub mod engine;
pub mod error;
pub mod flow;
pub mod mfa;
pub mod stash;
pub mod step;
pub mod user_detail;

pub use config::{AcquirePolicy, DeviceTrustPolicy, PolicyConfig};
pub use device::{DeviceOnboarding, NoDeviceOnboarding, TrustDeviceOnboarding};
pub use engine::{OnboardingPolicyEngine, Plan};
pub use error::{ConfigError, HookError, OnboardingError, StashError};
pub use flow::{FlowContext, FlowErrors, FlowHost, Scheduler, StepQueue};
pub use mfa::{DeviceTrust, MfaRequirement, MfaSkipReason, TrustedDevices};
pub use stash::{LoginMethod, MemoryStash, SessionState, Stash};
pub use step::{FlowErrorCode, Step};
