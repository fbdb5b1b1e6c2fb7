use auton_agent::BehaviorError;
use auton_core::{AgentId, CoreError, Position, Tmu};
use auton_events::EventError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Event(#[from] EventError),

    /// Agent construction failed (e.g. scripted agents without a script).
    #[error("agent setup failed: {0}")]
    Setup(#[from] BehaviorError),

    #[error("{agent} failed at {tmu}: {source}")]
    Behavior {
        agent:  AgentId,
        tmu:    Tmu,
        source: BehaviorError,
    },

    #[error("no agent with id {0}")]
    UnknownAgent(AgentId),

    #[error("population error: {0}")]
    Population(String),

    #[error("{agent} at {position} lies outside its Nestene")]
    OutOfBounds {
        agent:    AgentId,
        position: Position,
    },

    #[error("this environment has already been run")]
    AlreadyRun,
}

pub type SimResult<T> = Result<T, SimError>;
