use auton_core::{EventId, Tmu};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    /// Scheduling into the past; always a causality bug upstream.
    #[error("invalid event {id}: scheduled at {tmu} but the queue is already at {now}")]
    InvalidEvent { id: EventId, tmu: Tmu, now: Tmu },

    #[error("malformed event {id}: {reason}")]
    Malformed { id: EventId, reason: String },

    #[error("event {0} is already queued")]
    Duplicate(EventId),

    #[error("advancing to {now} would skip internal events due at {due}")]
    SkippedDue { due: Tmu, now: Tmu },

    #[error("event log parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EventResult<T> = Result<T, EventError>;
