//! Core event types: `Signal`, `InternalEvent`, `ExternalEvent`.
//!
//! # Internal vs. external
//!
//! An [`InternalEvent`] is a cause travelling through the simulation: a
//! signal on its way to one agent, or the activation of a pre-seeded
//! stimulus.  It is delivered exactly once, at its tmu, during a micro step.
//!
//! An [`ExternalEvent`] is an observable occurrence: an agent emitting,
//! an agent detecting something, or a stimulus injected from outside.  It
//! is the durable log of a run and is never removed by the simulation loop.

use std::fmt;
use std::str::FromStr;

use auton_core::{AgentId, EventId, Position, Tmu};

use crate::EventError;

// ── Signal ────────────────────────────────────────────────────────────────────

/// Payload carried by every event.
///
/// `tag` names the action ("scream", "call", "heard", …) and `value` carries
/// one scalar (intensity, frequency, counter …).  Behaviors agree on the
/// meaning; the kernel only copies it around.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub tag:   String,
    pub value: f64,
}

impl Signal {
    pub fn new(tag: impl Into<String>, value: f64) -> Self {
        Self { tag: tag.into(), value }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.tag, self.value)
    }
}

// ── InternalEvent ─────────────────────────────────────────────────────────────

/// Who an internal event is delivered to.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// Handed to one agent's `on_event`.
    Agent(AgentId),
    /// Propagated from a point to every listening agent in range.  Used to
    /// activate injected initialization events.
    Broadcast(Position),
}

/// A causal action scheduled for future delivery.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InternalEvent {
    pub id:     EventId,
    pub tmu:    Tmu,
    /// Agent whose action produced this event; `None` for injected stimuli.
    pub origin: Option<AgentId>,
    /// External event this one descends from (the emission being heard).
    pub cause:  Option<EventId>,
    pub target: Target,
    pub signal: Signal,
}

// ── ExternalEvent ─────────────────────────────────────────────────────────────

/// What an external event records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExternalKind {
    /// Pre-seeded stimulus injected before the run.
    Initialization,
    /// An agent made its action observable to others.
    Emission,
    /// An agent observed something.
    Detection,
}

impl ExternalKind {
    /// Label used in exported logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ExternalKind::Initialization => "initialization",
            ExternalKind::Emission       => "emission",
            ExternalKind::Detection      => "detection",
        }
    }
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExternalKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "initialization" => Ok(ExternalKind::Initialization),
            "emission"       => Ok(ExternalKind::Emission),
            "detection"      => Ok(ExternalKind::Detection),
            other => Err(EventError::Parse(format!(
                "unknown event kind {other:?}: expected \"initialization\", \"emission\", or \"detection\""
            ))),
        }
    }
}

/// An observable, recordable occurrence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalEvent {
    pub id:       EventId,
    pub tmu:      Tmu,
    pub kind:     ExternalKind,
    pub origin:   Option<AgentId>,
    pub position: Position,
    pub signal:   Signal,
}

// ── InitialEvent ──────────────────────────────────────────────────────────────

/// A stimulus to inject before a run, as read from a seed file.
///
/// Ids are not part of the record: the orchestrator assigns them when the
/// stimulus is injected.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialEvent {
    pub tmu:      Tmu,
    pub position: Position,
    pub signal:   Signal,
}
