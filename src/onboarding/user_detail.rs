//! Profile detail onboarding (username and email).

use crate::onboarding::{config::PolicyConfig, stash::SessionState, step::Step};

/// Username is always asked before email.
#[must_use]
pub fn evaluate(config: &PolicyConfig, state: &SessionState) -> Vec<Step> {
    let acquire_username =
        config.username.enabled && config.username.acquire_on_login && !state.user_has_username;
    let acquire_email = config.email.enabled && config.email.acquire_on_login && !state.user_has_email;

    let mut steps = Vec::with_capacity(2);
    if acquire_username {
        steps.push(Step::OnboardingUsername);
    }
    if acquire_email {
        steps.push(Step::OnboardingEmail);
    }
    steps
}
