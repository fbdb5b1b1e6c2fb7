//! The `Auton` trait and the three built-in agent variants.
//!
//! | Variant      | On query                              | On event                       |
//! |--------------|---------------------------------------|--------------------------------|
//! | [`Screamer`] | emits `scream` with fixed probability | deaf: never receives events    |
//! | [`Listener`] | nothing                               | records a detection            |
//! | [`Scripted`] | delegates to its `BehaviorModel`      | delegates to its `BehaviorModel` |
//!
//! Each agent owns its [`AgentRng`], seeded from the run seed and its id, so
//! an agent's draws depend only on how often it was asked to decide.

use std::fmt;
use std::sync::Arc;

use auton_core::{AgentId, AgentRng, Position};
use auton_events::{InternalEvent, Signal};

use crate::{Action, AgentView, BehaviorModel, BehaviorResult, ScriptMemory, StepContext};

/// Tag carried by screamer emissions.
pub const SCREAM_TAG: &str = "scream";

// ── Auton ─────────────────────────────────────────────────────────────────────

/// Which built-in variant an agent is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AutonKind {
    Screamer,
    Listener,
    Scripted,
}

impl AutonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AutonKind::Screamer => "screamer",
            AutonKind::Listener => "listener",
            AutonKind::Scripted => "scripted",
        }
    }
}

impl fmt::Display for AutonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An autonomous agent living in one Nestene.
///
/// `Send` so that Nestenes can be queried on Rayon workers.  Callbacks take
/// `&mut self`: an agent may update its own state and RNG, nothing else.
pub trait Auton: Send {
    fn id(&self) -> AgentId;

    fn kind(&self) -> AutonKind;

    /// Fixed for the agent's lifetime: agents never move between Nestenes.
    fn position(&self) -> Position;

    /// Whether emissions from other agents are delivered to this one.
    fn listens(&self) -> bool {
        true
    }

    /// Called once per macro step.
    fn on_query(&mut self, ctx: &StepContext<'_>) -> BehaviorResult<Vec<Action>>;

    /// Called when an internal event addressed to this agent is delivered.
    fn on_event(
        &mut self,
        event: &InternalEvent,
        ctx:   &StepContext<'_>,
    ) -> BehaviorResult<Vec<Action>>;
}

// ── Screamer ──────────────────────────────────────────────────────────────────

/// Emits a `scream` on a macro step with a fixed probability.
#[derive(Clone, Debug)]
pub struct Screamer {
    id:          AgentId,
    position:    Position,
    probability: f64,
    rng:         AgentRng,
    screams:     u64,
}

impl Screamer {
    pub fn new(id: AgentId, position: Position, probability: f64, rng: AgentRng) -> Self {
        Self { id, position, probability, rng, screams: 0 }
    }

    /// Number of screams emitted so far.
    pub fn screams(&self) -> u64 {
        self.screams
    }
}

impl Auton for Screamer {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> AutonKind {
        AutonKind::Screamer
    }

    fn position(&self) -> Position {
        self.position
    }

    fn listens(&self) -> bool {
        false
    }

    fn on_query(&mut self, _ctx: &StepContext<'_>) -> BehaviorResult<Vec<Action>> {
        if self.rng.gen_bool(self.probability) {
            self.screams += 1;
            Ok(vec![Action::Emit(Signal::new(SCREAM_TAG, 1.0))])
        } else {
            Ok(vec![])
        }
    }

    fn on_event(
        &mut self,
        _event: &InternalEvent,
        _ctx:   &StepContext<'_>,
    ) -> BehaviorResult<Vec<Action>> {
        Ok(vec![])
    }
}

// ── Listener ──────────────────────────────────────────────────────────────────

/// Passive receiver: records a detection for every signal that reaches it.
#[derive(Clone, Debug)]
pub struct Listener {
    id:       AgentId,
    position: Position,
    heard:    u64,
}

impl Listener {
    pub fn new(id: AgentId, position: Position) -> Self {
        Self { id, position, heard: 0 }
    }

    /// Number of signals received so far.
    pub fn heard(&self) -> u64 {
        self.heard
    }
}

impl Auton for Listener {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> AutonKind {
        AutonKind::Listener
    }

    fn position(&self) -> Position {
        self.position
    }

    fn on_query(&mut self, _ctx: &StepContext<'_>) -> BehaviorResult<Vec<Action>> {
        Ok(vec![])
    }

    fn on_event(
        &mut self,
        event: &InternalEvent,
        _ctx:  &StepContext<'_>,
    ) -> BehaviorResult<Vec<Action>> {
        self.heard += 1;
        Ok(vec![Action::detect(event.signal.clone())])
    }
}

// ── Scripted ──────────────────────────────────────────────────────────────────

/// Agent whose decisions come from a shared [`BehaviorModel`].
pub struct Scripted {
    id:       AgentId,
    position: Position,
    script:   String,
    model:    Arc<dyn BehaviorModel>,
    memory:   ScriptMemory,
    rng:      AgentRng,
}

impl Scripted {
    pub fn new(
        id:       AgentId,
        position: Position,
        script:   impl Into<String>,
        model:    Arc<dyn BehaviorModel>,
        rng:      AgentRng,
    ) -> Self {
        Self {
            id,
            position,
            script: script.into(),
            model,
            memory: ScriptMemory::new(),
            rng,
        }
    }

    /// Identifier of the script this agent runs.
    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn memory(&self) -> &ScriptMemory {
        &self.memory
    }

    fn view(&self) -> AgentView {
        AgentView { id: self.id, position: self.position }
    }
}

impl fmt::Debug for Scripted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scripted")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("script", &self.script)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

impl Auton for Scripted {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> AutonKind {
        AutonKind::Scripted
    }

    fn position(&self) -> Position {
        self.position
    }

    fn on_query(&mut self, ctx: &StepContext<'_>) -> BehaviorResult<Vec<Action>> {
        let view = self.view();
        self.model.on_query(&view, &mut self.memory, ctx, &mut self.rng)
    }

    fn on_event(
        &mut self,
        event: &InternalEvent,
        ctx:   &StepContext<'_>,
    ) -> BehaviorResult<Vec<Action>> {
        let view = self.view();
        self.model.on_event(&view, &mut self.memory, event, ctx, &mut self.rng)
    }
}
