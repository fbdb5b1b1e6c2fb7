//! `ChorusBehavior`: a small call-and-response script.
//!
//! * On a macro step the agent calls (`Emit("call")`) with a fixed
//!   probability.
//! * Hearing another agent's call, it records a detection and sends that
//!   agent a direct `reply` after a short delay.
//! * Hearing a reply, it records a detection.
//! * A call with no origin (an injected stimulus) makes it call straight
//!   away, which is how a seeded event starts a chorus.
//!
//! Counters are kept in the agent's [`ScriptMemory`] under [`CALLS`],
//! [`REPLIES_SENT`] and [`REPLIES_HEARD`].

use auton_core::AgentRng;
use auton_events::{InternalEvent, Signal};

use crate::{
    Action, AgentView, BehaviorError, BehaviorModel, BehaviorResult, ScriptMemory, StepContext,
};

pub const CALL_TAG: &str = "call";
pub const REPLY_TAG: &str = "reply";

pub const CALLS: &str = "calls";
pub const REPLIES_SENT: &str = "replies_sent";
pub const REPLIES_HEARD: &str = "replies_heard";

#[derive(Clone, Debug, PartialEq)]
pub struct ChorusBehavior {
    call_probability: f64,
    reply_delay_secs: f64,
}

impl Default for ChorusBehavior {
    fn default() -> Self {
        Self { call_probability: 0.01, reply_delay_secs: 0.000_5 }
    }
}

impl ChorusBehavior {
    /// Fails if the probability is outside `[0, 1]` or the delay is negative
    /// or non-finite.
    pub fn new(call_probability: f64, reply_delay_secs: f64) -> BehaviorResult<Self> {
        if !(0.0..=1.0).contains(&call_probability) {
            return Err(BehaviorError::Config(format!(
                "chorus call probability must be in [0, 1], got {call_probability}"
            )));
        }
        if !(reply_delay_secs >= 0.0) || !reply_delay_secs.is_finite() {
            return Err(BehaviorError::Config(format!(
                "chorus reply delay must be a finite non-negative number, got {reply_delay_secs}"
            )));
        }
        Ok(Self { call_probability, reply_delay_secs })
    }

    fn call(memory: &mut ScriptMemory) -> Action {
        let n = memory.bump(CALLS, 1.0);
        Action::Emit(Signal::new(CALL_TAG, n))
    }
}

impl BehaviorModel for ChorusBehavior {
    fn on_query(
        &self,
        _view:  &AgentView,
        memory: &mut ScriptMemory,
        _ctx:   &StepContext<'_>,
        rng:    &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>> {
        if rng.gen_bool(self.call_probability) {
            Ok(vec![Self::call(memory)])
        } else {
            Ok(vec![])
        }
    }

    fn on_event(
        &self,
        view:   &AgentView,
        memory: &mut ScriptMemory,
        event:  &InternalEvent,
        ctx:    &StepContext<'_>,
        _rng:   &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>> {
        match (event.signal.tag.as_str(), event.origin) {
            (CALL_TAG, None) => Ok(vec![Self::call(memory)]),
            (CALL_TAG, Some(caller)) if caller != view.id => {
                memory.bump(REPLIES_SENT, 1.0);
                Ok(vec![
                    Action::detect(event.signal.clone()),
                    Action::Notify {
                        target: caller,
                        delay:  ctx.clock.ticks_for_secs(self.reply_delay_secs),
                        signal: Signal::new(REPLY_TAG, event.signal.value),
                    },
                ])
            }
            (REPLY_TAG, _) => {
                memory.bump(REPLIES_HEARD, 1.0);
                Ok(vec![Action::detect(event.signal.clone())])
            }
            _ => Ok(vec![Action::detect(event.signal.clone())]),
        }
    }
}
