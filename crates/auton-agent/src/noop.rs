//! A no-op behavior model for scripted agents that never act.

use auton_core::AgentRng;

use crate::{Action, AgentView, BehaviorModel, BehaviorResult, ScriptMemory, StepContext};

/// A [`BehaviorModel`] that always returns an empty action list.
///
/// Registered as `"noop"`.  Useful in tests and for populations that only
/// occupy space.
pub struct NoopBehavior;

impl BehaviorModel for NoopBehavior {
    fn on_query(
        &self,
        _view:   &AgentView,
        _memory: &mut ScriptMemory,
        _ctx:    &StepContext<'_>,
        _rng:    &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>> {
        Ok(vec![])
    }
}
