//! `auton-sim` — Master orchestrator for the auton simulation kernel.
//!
//! # Macro/micro step loop
//!
//! ```text
//! for each visited tick `current` in 0..iterations:
//!   ① Micro:  drain internal events due at `current`, hand each to its
//!              target agent (or propagate a broadcast), apply actions.
//!   ② Macro:  every `macro_factor` ticks, query every agent in every
//!              Nestene (parallel with the `parallel` feature), then apply
//!              the collected actions in Nestene order, agent order.
//!   ③ Jump:   next tick = min(next macro, next internal due), ≤ iterations.
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`partition`] | `Partition`: grid of cells covering the area               |
//! | [`nestene`]   | `Nestene`, `PendingActions`                               |
//! | [`master`]    | `Master`, `Propagation`, `next_tick`, `lattice`           |
//! | [`builder`]   | `MasterBuilder`                                           |
//! | [`status`]    | `StatusSnapshot`, `RunSummary`, `PositionSnapshot`        |
//! | [`observer`]  | `SimObserver`, `NoopObserver`, `LogObserver`              |
//! | [`error`]     | `SimError`, `SimResult<T>`                                |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the macro-step query phase on Rayon's thread pool.|
//!
//! # Quick-start
//!
//! ```rust
//! use std::sync::atomic::AtomicBool;
//!
//! use auton_core::SimConfig;
//! use auton_sim::{MasterBuilder, NoopObserver};
//!
//! let mut master = MasterBuilder::new(SimConfig::default()).nestenes(4).build().unwrap();
//! master.populate(4, 8, 0).unwrap();
//! let summary = master.run(5_000, &AtomicBool::new(false), &mut NoopObserver).unwrap();
//! assert_eq!(summary.counters.macro_steps, 5);
//! ```

pub mod builder;
pub mod error;
pub mod master;
pub mod nestene;
pub mod observer;
pub mod partition;
pub mod status;

#[cfg(test)]
mod tests;

pub use builder::MasterBuilder;
pub use error::{SimError, SimResult};
pub use master::{Master, Propagation, lattice, next_tick};
pub use nestene::{Nestene, PendingActions};
pub use observer::{LogObserver, NoopObserver, SimObserver};
pub use partition::Partition;
pub use status::{
    DEFAULT_STATUS_INTERVAL, PositionSnapshot, RunCounters, RunOutcome, RunSummary, StatusSnapshot,
};
