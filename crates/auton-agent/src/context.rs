//! Read-only state passed to every agent callback.

use auton_core::{AgentId, Position, SimClock, Tmu};

/// A read-only snapshot of the step being executed.
///
/// Built once per macro or micro step by the orchestrator and shared
/// immutably by every callback in that step.
///
/// # Lifetimes
///
/// The clock borrow lives for the duration of one step.  The orchestrator
/// never advances the clock while a `StepContext` is live.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    /// The tmu being executed.
    pub tmu: Tmu,

    /// Run parameters and tmu ↔ seconds conversion.
    pub clock: &'a SimClock,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(tmu: Tmu, clock: &'a SimClock) -> Self {
        Self { tmu, clock }
    }

    /// Simulated seconds at this step.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.clock.secs_for(self.tmu)
    }
}

/// What a behavior model may know about the agent it is driving.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentView {
    pub id:       AgentId,
    pub position: Position,
}
