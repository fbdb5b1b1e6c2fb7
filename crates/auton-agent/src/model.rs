//! The `BehaviorModel` trait, the extension point behind scripted agents.

use std::collections::BTreeMap;

use auton_core::AgentRng;
use auton_events::InternalEvent;

use crate::{Action, AgentView, BehaviorResult, StepContext};

/// Pluggable decision logic for [`Scripted`][crate::Scripted] agents.
///
/// One model instance is shared (through an `Arc`) by every agent running
/// the same script, so the model itself holds no per-agent state.  Anything
/// an agent needs to remember between callbacks goes in its
/// [`ScriptMemory`]; randomness comes from the agent's own [`AgentRng`].
///
/// # Required methods
///
/// Only [`on_query`][Self::on_query] is required.  Models that ignore
/// incoming events can rely on the default [`on_event`][Self::on_event].
///
/// # Rules
///
/// Callbacks must not block or do I/O: they run inside the simulation loop,
/// possibly on a Rayon worker.  Return an error to abort the run.
///
/// # Example
///
/// ```rust,ignore
/// struct Metronome;
///
/// impl BehaviorModel for Metronome {
///     fn on_query(&self, _view: &AgentView, _mem: &mut ScriptMemory,
///                 _ctx: &StepContext<'_>, _rng: &mut AgentRng)
///         -> BehaviorResult<Vec<Action>>
///     {
///         Ok(vec![Action::Emit(Signal::new("tick", 1.0))])
///     }
/// }
/// ```
pub trait BehaviorModel: Send + Sync + 'static {
    /// Called once per macro step for every agent running this model.
    fn on_query(
        &self,
        view:   &AgentView,
        memory: &mut ScriptMemory,
        ctx:    &StepContext<'_>,
        rng:    &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>>;

    /// Called when an internal event addressed to the agent is delivered.
    ///
    /// Default: the event is ignored.
    fn on_event(
        &self,
        _view:   &AgentView,
        _memory: &mut ScriptMemory,
        _event:  &InternalEvent,
        _ctx:    &StepContext<'_>,
        _rng:    &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>> {
        Ok(vec![])
    }
}

// ── ScriptMemory ──────────────────────────────────────────────────────────────

/// Per-agent scalar scratch space for scripted behaviors.
///
/// Ordered so that debug dumps and comparisons are stable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptMemory {
    slots: BTreeMap<String, f64>,
}

impl ScriptMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.slots.get(key).copied()
    }

    /// Value under `key`, or `default` if unset.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.slots.insert(key.into(), value);
    }

    /// Add `by` to the slot (starting from 0) and return the new value.
    pub fn bump(&mut self, key: &str, by: f64) -> f64 {
        let slot = self.slots.entry(key.to_owned()).or_insert(0.0);
        *slot += by;
        *slot
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
