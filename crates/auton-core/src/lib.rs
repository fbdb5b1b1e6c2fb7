//! `auton-core` — foundational types for the auton simulation kernel.
//!
//! This crate is a dependency of every other `auton-*` crate.  It has no
//! `auton-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                |
//! |-----------|---------------------------------------------------------|
//! | [`ids`]   | `AgentId`, `EventId`, `NestId`, `IdAllocator`           |
//! | [`geo`]   | `Position`, `Rect`                                      |
//! | [`time`]  | `Tmu`, `SimClock`, `SimConfig`                          |
//! | [`rng`]   | `AgentRng` (per-agent), `SimRng` (global)               |
//! | [`error`] | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Position, Rect};
pub use ids::{AgentId, EventId, IdAllocator, NestId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tmu};
