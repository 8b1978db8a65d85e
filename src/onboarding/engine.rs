//! Onboarding policy engine.
//!
//! One scheduling pass per session. The pass is guarded by the
//! `login_onboarding_scheduled` stash flag, which is committed before any
//! decision is made; a repeated invocation is a no-op.

use crate::onboarding::{
    config::PolicyConfig,
    credentials::{self, CredentialState},
    device::DeviceOnboarding,
    error::{OnboardingError, Result},
    flow::FlowContext,
    mfa::{self, DeviceTrust, MfaRequirement},
    stash::{SessionState, PATH_LOGIN_ONBOARDING_SCHEDULED},
    step::Step,
    user_detail,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, field, info, instrument, warn, Span};

/// Evaluator outputs for one session snapshot, in scheduling order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    pub mfa: MfaRequirement,
    pub password_recovery: bool,
    pub user_details: Vec<Step>,
    pub credentials: Vec<Step>,
}

impl Plan {
    /// Steps scheduled ahead of the device onboarding hook.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = self.mfa.steps();
        if self.password_recovery {
            steps.push(Step::LoginPasswordRecovery);
        }
        steps.extend_from_slice(&self.user_details);
        steps.extend_from_slice(&self.credentials);
        steps
    }
}

pub struct OnboardingPolicyEngine<T, H> {
    config: Arc<PolicyConfig>,
    device_trust: T,
    device_onboarding: H,
}

impl<T: DeviceTrust, H: DeviceOnboarding> OnboardingPolicyEngine<T, H> {
    pub fn new(config: Arc<PolicyConfig>, device_trust: T, device_onboarding: H) -> Self {
        Self {
            config,
            device_trust,
            device_onboarding,
        }
    }

    /// Run every evaluator against a snapshot without touching the session.
    pub fn plan(&self, state: &SessionState) -> Plan {
        let mfa = mfa::evaluate(&self.config.mfa, state, &self.device_trust);
        let user_details = user_detail::evaluate(&self.config, state);
        let credentials = credentials::evaluate(&self.config, CredentialState::from(state));

        debug!(
            ?mfa,
            password_recovery = state.password_recovery_pending,
            ?user_details,
            ?credentials,
            "evaluated onboarding policy"
        );

        Plan {
            mfa,
            password_recovery: state.password_recovery_pending,
            user_details,
            credentials,
        }
    }

    /// Schedule the onboarding steps for the current login.
    ///
    /// # Errors
    /// Returns [`OnboardingError::StashWrite`] if the idempotency flag cannot be
    /// stored, in which case nothing is scheduled, and [`OnboardingError::Hook`]
    /// if the device onboarding hook fails, in which case the steps scheduled
    /// before it stay in place and `Success` is not scheduled.
    #[instrument(skip_all, fields(user_id = field::Empty))]
    pub fn schedule(&self, ctx: &mut FlowContext<'_>) -> Result<()> {
        if ctx.stash.get_bool(PATH_LOGIN_ONBOARDING_SCHEDULED) {
            debug!("onboarding already scheduled for this session");
            return Ok(());
        }

        ctx.stash
            .set(PATH_LOGIN_ONBOARDING_SCHEDULED, Value::Bool(true))
            .map_err(OnboardingError::StashWrite)?;

        let state = SessionState::from_stash(&*ctx.stash);
        Span::current().record("user_id", field::display(state.user_id));

        let plan = self.plan(&state);

        if let Some(code) = plan.mfa.flow_error() {
            warn!(%code, "security key cannot be used on this client and no OTP fallback exists");
            ctx.host.set_flow_error(code);
        }

        ctx.host.schedule(&plan.mfa.steps());
        if plan.password_recovery {
            ctx.host.schedule(&[Step::LoginPasswordRecovery]);
        }
        ctx.host.schedule(&plan.user_details);
        ctx.host.schedule(&plan.credentials);

        self.device_onboarding.execute(ctx)?;

        ctx.host.schedule(&[Step::Success]);

        info!(planned_steps = ?plan.steps(), "onboarding scheduled");

        Ok(())
    }
}
