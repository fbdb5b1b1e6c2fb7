//! `EventQueue`: sparse internal-event schedule plus the external event log.
//!
//! # Why a sparse map
//!
//! With a 1 µs tick and a macro step every 1000 ticks, almost every tick is
//! empty.  Keying internal events by tmu lets the orchestrator ask "when is
//! the next thing due?" in O(log W) and jump straight there instead of
//! walking the empty ticks, where W is the number of distinct pending tmus.
//!
//! Events due at the same tmu sit in one `Vec` in insertion order, so a
//! drain hands them back in exactly the order they were scheduled.
//!
//! External events are keyed by `(tmu, id)`.  Ids are issued in creation
//! order, which makes the key order "by tmu, then by insertion".

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use auton_core::{EventId, Tmu};

use crate::{EventError, EventResult, ExternalEvent, InternalEvent};

/// Sizes of both collections, for status reporting.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub internal: usize,
    pub external: usize,
}

/// Owns every pending internal event and every recorded external event.
#[derive(Default, Debug)]
pub struct EventQueue {
    internal: BTreeMap<Tmu, Vec<InternalEvent>>,
    /// Cached internal event count for O(1) `counts()`.
    internal_total: usize,
    external: BTreeMap<(Tmu, EventId), ExternalEvent>,
    now: Tmu,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tmu the queue considers "now".  Nothing may be scheduled earlier.
    #[inline]
    pub fn now(&self) -> Tmu {
        self.now
    }

    /// Move the queue's notion of now forward.
    ///
    /// Fails with [`EventError::SkippedDue`] if an internal event due before
    /// `tmu` is still pending: advancing would lose it.
    pub fn set_now(&mut self, tmu: Tmu) -> EventResult<()> {
        if let Some(due) = self.next_internal_due() {
            if due < tmu {
                return Err(EventError::SkippedDue { due, now: tmu });
            }
        }
        self.now = tmu;
        Ok(())
    }

    /// Queue an internal event for delivery at `event.tmu`.
    pub fn schedule_internal(&mut self, event: InternalEvent) -> EventResult<()> {
        if event.tmu < self.now {
            return Err(EventError::InvalidEvent {
                id:  event.id,
                tmu: event.tmu,
                now: self.now,
            });
        }
        tracing::trace!(id = event.id.0, tmu = event.tmu.0, "internal event scheduled");
        self.internal.entry(event.tmu).or_default().push(event);
        self.internal_total += 1;
        Ok(())
    }

    /// Append an external event to the log.
    pub fn schedule_external(&mut self, event: ExternalEvent) -> EventResult<()> {
        if event.tmu < self.now {
            return Err(EventError::InvalidEvent {
                id:  event.id,
                tmu: event.tmu,
                now: self.now,
            });
        }
        if !event.position.is_finite() {
            return Err(EventError::Malformed {
                id:     event.id,
                reason: format!("non-finite position {}", event.position),
            });
        }
        match self.external.entry((event.tmu, event.id)) {
            Entry::Occupied(_) => Err(EventError::Duplicate(event.id)),
            Entry::Vacant(slot) => {
                slot.insert(event);
                Ok(())
            }
        }
    }

    /// Alias of [`schedule_external`](Self::schedule_external) for events that
    /// describe something that already happened at `now`.
    #[inline]
    pub fn record_external(&mut self, event: ExternalEvent) -> EventResult<()> {
        self.schedule_external(event)
    }

    /// The earliest tmu with at least one pending internal event, or `None`.
    pub fn next_internal_due(&self) -> Option<Tmu> {
        self.internal.keys().next().copied()
    }

    /// Remove and return every internal event scheduled for exactly `tmu`,
    /// in insertion order.
    ///
    /// A second call at the same tmu with no scheduling in between returns
    /// an empty `Vec`.
    pub fn drain_internal_due(&mut self, tmu: Tmu) -> Vec<InternalEvent> {
        match self.internal.remove(&tmu) {
            None => Vec::new(),
            Some(events) => {
                self.internal_total -= events.len();
                events
            }
        }
    }

    /// Put drained events back at the head of `tmu`'s batch, ahead of
    /// anything scheduled there since the drain.  Ordering among `events` is
    /// kept.
    pub fn restore_due(&mut self, tmu: Tmu, events: Vec<InternalEvent>) {
        if events.is_empty() {
            return;
        }
        self.internal_total += events.len();
        let batch = self.internal.entry(tmu).or_default();
        batch.splice(0..0, events);
    }

    /// Every recorded external event ordered by tmu, then insertion.
    pub fn all_external(&self) -> impl Iterator<Item = &ExternalEvent> + '_ {
        self.external.values()
    }

    /// Number of pending internal events.
    pub fn internal_len(&self) -> usize {
        self.internal_total
    }

    pub fn counts(&self) -> QueueCounts {
        QueueCounts {
            internal: self.internal_total,
            external: self.external.len(),
        }
    }

    /// Number of distinct future tmus that have at least one internal event.
    pub fn internal_tick_count(&self) -> usize {
        self.internal.len()
    }

    /// Drop every pending and recorded event and rewind `now` to 0.
    pub fn clear(&mut self) {
        self.internal.clear();
        self.internal_total = 0;
        self.external.clear();
        self.now = Tmu::ZERO;
    }
}
