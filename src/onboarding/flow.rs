//! Host flow runtime capabilities the engine schedules into.

use crate::onboarding::{
    stash::Stash,
    step::{FlowErrorCode, Step},
};
use serde::Serialize;

/// Ordered queue of steps owned by the host. Appended steps are never
/// reordered or removed by the engine.
pub trait Scheduler {
    fn schedule(&mut self, steps: &[Step]);
}

/// Terminal error code consumed by the host's error step.
pub trait FlowErrors {
    fn set_flow_error(&mut self, code: FlowErrorCode);
}

/// Both host capabilities behind one object.
pub trait FlowHost: Scheduler + FlowErrors {}

impl<T: Scheduler + FlowErrors> FlowHost for T {}

/// Everything one scheduling pass may touch.
pub struct FlowContext<'a> {
    pub stash: &'a mut dyn Stash,
    pub host: &'a mut dyn FlowHost,
}

impl<'a> FlowContext<'a> {
    pub fn new(stash: &'a mut dyn Stash, host: &'a mut dyn FlowHost) -> Self {
        Self { stash, host }
    }
}

/// In-memory host recording what was scheduled.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StepQueue {
    steps: Vec<Step>,
    flow_error: Option<FlowErrorCode>,
}

impl StepQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn flow_error(&self) -> Option<FlowErrorCode> {
        self.flow_error
    }
}

impl Scheduler for StepQueue {
    fn schedule(&mut self, steps: &[Step]) {
        self.steps.extend_from_slice(steps);
    }
}

impl FlowErrors for StepQueue {
    fn set_flow_error(&mut self, code: FlowErrorCode) {
        self.flow_error = Some(code);
    }
}
