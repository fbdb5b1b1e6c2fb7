//! `auton-events` — timestamped events and the queue that owns them.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`event`]  | `Signal`, `InternalEvent`, `ExternalEvent`, `Target`, `InitialEvent` |
//! | [`queue`]  | `EventQueue` (`BTreeMap<Tmu, Vec<InternalEvent>>` + external log) |
//! | [`loader`] | `load_initial_events_csv`, `load_initial_events_reader`         |
//! | [`error`]  | `EventError`, `EventResult<T>`                                  |
//!
//! # Two kinds of event
//!
//! ```text
//! internal: cause → delivered once at its tmu → discarded
//! external: observable record → retained until exported / cleared
//! ```
//!
//! Events are plain values owned by the queue.  Agents see them by shared
//! reference during delivery and answer with newly built actions; nothing
//! holds on to an event after it has been drained.

pub mod error;
pub mod event;
pub mod loader;
pub mod queue;


pub use error::{EventError, EventResult};
pub use event::{ExternalEvent, ExternalKind, InitialEvent, InternalEvent, Signal, Target};
pub use loader::{load_initial_events_csv, load_initial_events_reader};
pub use queue::{EventQueue, QueueCounts};
