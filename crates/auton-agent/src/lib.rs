//! `auton-agent` — agents, their actions, and pluggable behavior models.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`action`]   | `Action` enum (`Emit`, `Notify`, `Record`)                       |
//! | [`context`]  | `StepContext<'a>` (tmu + clock), `AgentView`                     |
//! | [`auton`]    | `Auton` trait, `AutonKind`, `Screamer`, `Listener`, `Scripted`   |
//! | [`model`]    | `BehaviorModel` trait, `ScriptMemory`                            |
//! | [`noop`]     | `NoopBehavior`: never acts                                       |
//! | [`chorus`]   | `ChorusBehavior`: calls at random, replies to calls it hears     |
//! | [`registry`] | `BehaviorRegistry`: script identifier → model                    |
//! | [`factory`]  | `AutonFactory`: builds boxed agents with seeded RNGs             |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                             |
//!
//! # Design notes
//!
//! Agents never touch the event queue.  Each callback returns a list of
//! [`Action`]s and the orchestrator applies them after every agent in the
//! step has decided:
//!
//! 1. **Decide**: `Auton::on_query` / `Auton::on_event` read the step context
//!    and mutate only the agent's own state and RNG.
//! 2. **Apply**: the orchestrator turns actions into internal and external
//!    events, in Nestene order then agent order.
//!
//! Because all per-agent state (RNG included) lives inside the agent, the
//! decide phase may run Nestenes in parallel without changing any result.

pub mod action;
pub mod auton;
pub mod chorus;
pub mod context;
pub mod error;
pub mod factory;
pub mod model;
pub mod noop;
pub mod registry;


pub use action::Action;
pub use auton::{Auton, AutonKind, Listener, Scripted, Screamer};
pub use chorus::ChorusBehavior;
pub use context::{AgentView, StepContext};
pub use error::{BehaviorError, BehaviorResult};
pub use factory::AutonFactory;
pub use model::{BehaviorModel, ScriptMemory};
pub use noop::NoopBehavior;
pub use registry::BehaviorRegistry;
