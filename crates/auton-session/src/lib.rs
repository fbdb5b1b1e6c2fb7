//! `auton-session` — environment configuration and the run session.
//!
//! A [`Session`] holds at most one environment (a populated
//! `auton_sim::Master`).  Runs happen on a named worker thread that owns the
//! Master until [`Session::wait`] joins it; the controlling thread can poll
//! [`Session::status`] and call [`Session::request_stop`] meanwhile.
//!
//! # Usage
//!
//! ```rust,no_run
//! use auton_session::{EnvironmentConfig, Layout, Session};
//! use auton_sim::LogObserver;
//!
//! let config = EnvironmentConfig { scripted: 16, layout: Layout::Square, ..Default::default() };
//! let mut session = Session::new();
//! session.generate_environment(&config)?;
//! session.run_simulation(0.5, Box::new(LogObserver))?;
//! let summary = session.wait()?;
//! println!("{} macro steps", summary.counters.macro_steps);
//! session.export_external_events(std::path::Path::new("./out"))?;
//! # Ok::<(), auton_session::SessionError>(())
//! ```

pub mod config;
pub mod error;
pub mod session;

#[cfg(test)]
mod tests;

pub use config::{EnvironmentConfig, Layout};
pub use error::{SessionError, SessionResult};
pub use session::{Phase, Session, WORKER_NAME};
