//! Agent actions: what an agent asks the orchestrator to do on its behalf.

use auton_core::AgentId;
use auton_events::{ExternalKind, Signal};

/// An effect an agent wants applied after the current step.
///
/// Actions are produced by [`Auton::on_query`][crate::Auton::on_query] and
/// [`Auton::on_event`][crate::Auton::on_event] and consumed by the
/// orchestrator, which owns the event queue.
///
/// Several actions may be returned from one callback; they are applied in
/// the order given.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Make `Signal` observable from the agent's position.
    ///
    /// Recorded as an `Emission` external event and delivered as an internal
    /// event to every listening agent in range, delayed by distance.
    Emit(Signal),

    /// Deliver `signal` directly to `target` after `delay` ticks.
    ///
    /// The event lands at least one tick after the current tmu; a zero
    /// delay is treated as one.
    Notify {
        target: AgentId,
        delay:  u64,
        signal: Signal,
    },

    /// Record an external event at the agent's position without delivering
    /// anything to other agents.
    Record {
        kind:   ExternalKind,
        signal: Signal,
    },
}

impl Action {
    /// Shorthand for a detection record, the usual reaction to hearing
    /// something.
    pub fn detect(signal: Signal) -> Self {
        Action::Record { kind: ExternalKind::Detection, signal }
    }
}
