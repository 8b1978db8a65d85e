//! Device onboarding hook invoked once per scheduling pass.

use crate::onboarding::{
    config::{DeviceTrustPolicy, MfaConfig},
    error::HookError,
    flow::FlowContext,
    mfa::DeviceTrust,
    stash::SessionState,
    step::Step,
};
use tracing::debug;

/// Delegated sub-decision scheduling device related steps.
pub trait DeviceOnboarding {
    /// # Errors
    /// Any error aborts the scheduling pass and is returned to the caller unchanged.
    fn execute(&self, ctx: &mut FlowContext<'_>) -> Result<(), HookError>;
}

/// Hook that schedules nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDeviceOnboarding;

impl DeviceOnboarding for NoDeviceOnboarding {
    fn execute(&self, _ctx: &mut FlowContext<'_>) -> Result<(), HookError> {
        Ok(())
    }
}

/// Offers the "trust this device" step when the tenant prompts for it.
///
/// The step is offered only to users who own an MFA factor, did not log in with
/// a passkey, and whose current device is not trusted yet. A missing or
/// unparsable user id reads as the nil id, which is never trusted.
#[derive(Clone, Debug)]
pub struct TrustDeviceOnboarding<T> {
    mfa: MfaConfig,
    device_trust: T,
}

impl<T: DeviceTrust> TrustDeviceOnboarding<T> {
    pub fn new(mfa: MfaConfig, device_trust: T) -> Self {
        Self { mfa, device_trust }
    }
}

impl<T: DeviceTrust> DeviceOnboarding for TrustDeviceOnboarding<T> {
    fn execute(&self, ctx: &mut FlowContext<'_>) -> Result<(), HookError> {
        if !self.mfa.enabled || self.mfa.device_trust_policy != DeviceTrustPolicy::Prompt {
            return Ok(());
        }

        let state = SessionState::from_stash(&*ctx.stash);
        if state.logged_in_with_passkey()
            || !(state.user_has_otp_secret || state.user_has_security_key)
        {
            return Ok(());
        }

        if self.device_trust.is_trusted(state.user_id) {
            debug!(user_id = %state.user_id, "device already trusted");
            return Ok(());
        }

        ctx.host.schedule(&[Step::DeviceTrust]);
        Ok(())
    }
}
