//! Fluent factory for boxed agents.
//!
//! # Usage
//!
//! ```rust
//! use auton_agent::{Auton, AutonFactory, AutonKind};
//! use auton_core::{AgentId, Position};
//!
//! let factory = AutonFactory::new(/*seed=*/ 42).scream_probability(0.2);
//!
//! let agent = factory
//!     .build(AutonKind::Screamer, AgentId(0), Position::new(10.0, 10.0))
//!     .unwrap();
//! assert_eq!(agent.kind(), AutonKind::Screamer);
//! ```

use std::sync::Arc;

use auton_core::{AgentId, AgentRng, Position};

use crate::{
    Auton, AutonKind, BehaviorError, BehaviorModel, BehaviorResult, Listener, Scripted, Screamer,
};

/// Default per-macro-step scream probability.
pub const DEFAULT_SCREAM_PROBABILITY: f64 = 0.05;

/// Builds agents of every variant from one run seed.
///
/// Each agent's RNG is seeded from `(seed, id)`, so the same ids always get
/// the same random streams regardless of creation order.
#[derive(Clone)]
pub struct AutonFactory {
    seed:               u64,
    scream_probability: f64,
    script:             Option<(String, Arc<dyn BehaviorModel>)>,
}

impl AutonFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            scream_probability: DEFAULT_SCREAM_PROBABILITY,
            script: None,
        }
    }

    /// Probability that a screamer emits on any given macro step.
    pub fn scream_probability(mut self, p: f64) -> Self {
        self.scream_probability = p;
        self
    }

    /// Model used for every scripted agent.  Required before building one.
    pub fn script(mut self, name: impl Into<String>, model: Arc<dyn BehaviorModel>) -> Self {
        self.script = Some((name.into(), model));
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn build(
        &self,
        kind:     AutonKind,
        id:       AgentId,
        position: Position,
    ) -> BehaviorResult<Box<dyn Auton>> {
        let rng = AgentRng::new(self.seed, id);
        let agent: Box<dyn Auton> = match kind {
            AutonKind::Screamer => {
                Box::new(Screamer::new(id, position, self.scream_probability, rng))
            }
            AutonKind::Listener => Box::new(Listener::new(id, position)),
            AutonKind::Scripted => {
                let (name, model) = self.script.as_ref().ok_or_else(|| {
                    BehaviorError::Config("scripted agent requested but no script set".into())
                })?;
                Box::new(Scripted::new(id, position, name.clone(), Arc::clone(model), rng))
            }
        };
        Ok(agent)
    }
}
