use auton_events::EventError;
use auton_output::OutputError;
use auton_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an environment already exists; tear it down before generating another")]
    AlreadyGenerated,

    #[error("a simulation run is in progress")]
    RunInProgress,

    #[error("no environment has been generated")]
    NoEnvironment,

    #[error("the environment has not completed a run yet")]
    NoCompletedRun,

    #[error("this environment has already been run; generate a fresh one")]
    EnvironmentSpent,

    #[error("no simulation is running")]
    NotRunning,

    #[error("unknown behavior script `{0}`")]
    UnknownBehavior(String),

    #[error("simulation run failed: {0}")]
    RunFailed(#[source] SimError),

    #[error("simulation worker panicked; the environment was lost")]
    WorkerPanicked,

    #[error("invalid environment configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
