//! `Nestene`: one cell of the partition and the agents living in it.

use auton_agent::{Action, Auton, StepContext};
use auton_core::{AgentId, NestId, Position, Rect};

use crate::{SimError, SimResult};

/// Actions one agent produced during a query, waiting to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingActions {
    pub agent:    AgentId,
    pub position: Position,
    pub actions:  Vec<Action>,
}

/// A fixed rectangular region owning every agent spawned inside it.
///
/// Created once per environment, never resized.  Agents are appended by
/// [`place`](Self::place) and never removed or moved to another Nestene.
pub struct Nestene {
    id:     NestId,
    bounds: Rect,
    agents: Vec<Box<dyn Auton>>,
}

impl Nestene {
    pub fn new(id: NestId, bounds: Rect) -> Self {
        Self { id, bounds, agents: Vec::new() }
    }

    #[inline]
    pub fn id(&self) -> NestId {
        self.id
    }

    #[inline]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Take ownership of `agent` and return its slot index.
    pub fn place(&mut self, agent: Box<dyn Auton>) -> SimResult<usize> {
        let position = agent.position();
        if !self.bounds.contains(position) {
            return Err(SimError::OutOfBounds { agent: agent.id(), position });
        }
        self.agents.push(agent);
        Ok(self.agents.len() - 1)
    }

    pub fn agents(&self) -> impl Iterator<Item = &dyn Auton> + '_ {
        self.agents.iter().map(|a| a.as_ref())
    }

    pub fn agent(&self, slot: usize) -> Option<&dyn Auton> {
        self.agents.get(slot).map(|a| a.as_ref())
    }

    pub fn agent_mut(&mut self, slot: usize) -> Option<&mut (dyn Auton + 'static)> {
        self.agents.get_mut(slot).map(|a| a.as_mut())
    }

    /// Query every agent for `ctx.tmu`, appending non-empty action lists to
    /// `out` in slot order.
    ///
    /// Stops at the first behavior failure.
    pub fn query_step(
        &mut self,
        ctx: &StepContext<'_>,
        out: &mut Vec<PendingActions>,
    ) -> SimResult<()> {
        for agent in &mut self.agents {
            let actions = agent.on_query(ctx).map_err(|source| SimError::Behavior {
                agent: agent.id(),
                tmu: ctx.tmu,
                source,
            })?;
            if !actions.is_empty() {
                out.push(PendingActions {
                    agent:    agent.id(),
                    position: agent.position(),
                    actions,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Nestene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nestene")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("agents", &self.agents.len())
            .finish()
    }
}
