//! Kernel-wide base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::Tmu;

/// Errors raised by the clock/config service.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A numeric configuration parameter is out of range.  Raised before any
    /// state is mutated.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("clock cannot move backwards from {current} to {requested}")]
    ClockRegression { current: Tmu, requested: Tmu },
}

/// Shorthand result type for `auton-core`.
pub type CoreResult<T> = Result<T, CoreError>;
