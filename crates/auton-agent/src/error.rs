use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error("no behavior registered under {0:?}")]
    UnknownScript(String),

    #[error("script {script:?} failed: {reason}")]
    Script { script: String, reason: String },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
