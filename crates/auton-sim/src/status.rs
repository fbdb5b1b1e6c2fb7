//! Run progress: status snapshots, counters, and the end-of-run summary.

use std::fmt;
use std::time::{Duration, Instant};

use auton_core::{Position, Tmu};
use auton_events::QueueCounts;

/// Minimum wall-clock gap between two status reports during a run.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(350);

/// Cumulative counters for one run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Emissions plus injected initialization events.
    pub events_initiated: u64,
    pub macro_steps:      u64,
    pub micro_steps:      u64,
    /// Internal events handed to an agent or propagated from a broadcast.
    pub events_delivered: u64,
}

/// Aggregate progress at one point of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusSnapshot {
    pub current_tmu:          Tmu,
    pub iterations:           u64,
    /// Simulated seconds at `current_tmu`.
    pub elapsed_secs:         f64,
    pub events_initiated:     u64,
    pub internal_queue_depth: usize,
    pub external_queue_depth: usize,
    /// `current_tmu / iterations` as a percentage; 100 for empty runs.
    pub percent_complete:     f64,
    pub macro_steps:          u64,
    pub micro_steps:          u64,
}

impl StatusSnapshot {
    pub(crate) fn new(
        current:    Tmu,
        iterations: u64,
        elapsed:    f64,
        counters:   &RunCounters,
        queue:      QueueCounts,
    ) -> Self {
        let percent_complete = if iterations == 0 {
            100.0
        } else {
            current.0 as f64 / iterations as f64 * 100.0
        };
        Self {
            current_tmu: current,
            iterations,
            elapsed_secs: elapsed,
            events_initiated: counters.events_initiated,
            internal_queue_depth: queue.internal,
            external_queue_depth: queue.external,
            percent_complete,
            macro_steps: counters.macro_steps,
            micro_steps: counters.micro_steps,
        }
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({:.1}%) initiated={} internal={} external={}",
            self.current_tmu.0,
            self.iterations,
            self.percent_complete,
            self.events_initiated,
            self.internal_queue_depth,
            self.external_queue_depth,
        )
    }
}

/// How a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reached the final tmu.
    Completed,
    /// The stop flag was observed before the final tmu.
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub outcome:   RunOutcome,
    pub final_tmu: Tmu,
    pub iterations: u64,
    pub counters:  RunCounters,
    pub queue:     QueueCounts,
    pub wall_time: Duration,
}

impl RunSummary {
    pub fn completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

/// Agent positions grouped by variant, each list ordered by agent id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionSnapshot {
    pub width:     f64,
    pub height:    f64,
    pub screamers: Vec<Position>,
    pub listeners: Vec<Position>,
    pub scripted:  Vec<Position>,
}

impl PositionSnapshot {
    pub fn total(&self) -> usize {
        self.screamers.len() + self.listeners.len() + self.scripted.len()
    }
}

// ── Throttle ──────────────────────────────────────────────────────────────────

/// Rate limiter for status reports, measured in wall-clock time.
#[derive(Debug)]
pub(crate) struct StatusThrottle {
    interval: Duration,
    last:     Instant,
}

impl StatusThrottle {
    pub(crate) fn new(interval: Duration) -> Self {
        Self { interval, last: Instant::now() }
    }

    /// `true` at most once per interval.
    pub(crate) fn ready(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}
