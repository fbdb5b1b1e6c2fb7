//! Plain data row types written by output backends.

use auton_core::SimClock;
use auton_events::ExternalEvent;
use auton_sim::StatusSnapshot;

/// One recorded external event.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalEventRow {
    pub id:      u64,
    pub tmu:     u64,
    /// `tmu * time_resolution`.
    pub seconds: f64,
    pub kind:    &'static str,
    /// Emitting or detecting agent; `None` for injected events.
    pub origin:  Option<u32>,
    pub x:       f64,
    pub y:       f64,
    pub tag:     String,
    pub value:   f64,
}

impl ExternalEventRow {
    pub fn from_event(event: &ExternalEvent, clock: &SimClock) -> Self {
        Self {
            id:      event.id.0,
            tmu:     event.tmu.0,
            seconds: clock.secs_for(event.tmu),
            kind:    event.kind.as_str(),
            origin:  event.origin.map(|a| a.0),
            x:       event.position.x,
            y:       event.position.y,
            tag:     event.signal.tag.clone(),
            value:   event.signal.value,
        }
    }
}

/// One status report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusRow {
    pub tmu:              u64,
    pub seconds:          f64,
    pub percent_complete: f64,
    pub events_initiated: u64,
    pub internal_queue:   u64,
    pub external_queue:   u64,
    pub macro_steps:      u64,
    pub micro_steps:      u64,
}

impl From<&StatusSnapshot> for StatusRow {
    fn from(s: &StatusSnapshot) -> Self {
        Self {
            tmu:              s.current_tmu.0,
            seconds:          s.elapsed_secs,
            percent_complete: s.percent_complete,
            events_initiated: s.events_initiated,
            internal_queue:   s.internal_queue_depth as u64,
            external_queue:   s.external_queue_depth as u64,
            macro_steps:      s.macro_steps,
            micro_steps:      s.micro_steps,
        }
    }
}
