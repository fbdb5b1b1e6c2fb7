//! Strongly typed identifiers and the run-scoped identifier allocator.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Agent ids double as indices into
//! the orchestrator's agent locator, hence the `.index()` helper.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Unique agent ("auton") identifier.  Issued densely from 0, so it is
    /// also the agent's index in the orchestrator's locator table.
    pub struct AgentId(u32);
}

typed_id! {
    /// Unique identifier shared by internal and external events.  Issued in
    /// creation order, so it breaks ties between events due at the same tmu.
    pub struct EventId(u64);
}

typed_id! {
    /// Identifier of a spatial partition cell (Nestene).
    pub struct NestId(u32);
}

// ── IdAllocator ───────────────────────────────────────────────────────────────

/// Monotonic counters issuing run-scoped identifiers.
///
/// Owned by the session rather than held in process-wide statics.  Each
/// environment borrows it while it exists; the session takes it back and
/// calls [`reset`](Self::reset) exactly once on teardown, so repeated
/// simulations in one process keep their counters bounded.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next_agent: u32,
    next_event: u64,
    next_nest:  u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next agent id, or `None` once the `u32` space is exhausted.
    pub fn next_agent_id(&mut self) -> Option<AgentId> {
        let id = self.next_agent;
        if id == u32::MAX {
            return None;
        }
        self.next_agent += 1;
        Some(AgentId(id))
    }

    /// Issue the next event id.
    pub fn next_event_id(&mut self) -> EventId {
        let id = EventId(self.next_event);
        self.next_event += 1;
        id
    }

    /// Issue the next Nestene id.
    pub fn next_nest_id(&mut self) -> NestId {
        let id = NestId(self.next_nest);
        self.next_nest += 1;
        id
    }

    /// Number of agent ids issued so far.
    pub fn agents_issued(&self) -> u32 {
        self.next_agent
    }

    /// Number of agent ids still available.
    pub fn agents_remaining(&self) -> u32 {
        u32::MAX - self.next_agent
    }

    /// Number of event ids issued so far.
    pub fn events_issued(&self) -> u64 {
        self.next_event
    }

    /// `true` until the first id of any kind is issued.
    pub fn is_fresh(&self) -> bool {
        self.next_agent == 0 && self.next_event == 0 && self.next_nest == 0
    }

    /// Return every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
