//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tmu` ("time management
//! unit") counter.  The mapping to simulated seconds is held in `SimClock`:
//!
//!   seconds = tmu * time_resolution
//!
//! Using an integer tick as the canonical time unit means all scheduling
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//! Floating point only appears at the edges: converting a run duration or a
//! propagation delay (both in seconds) into a tick count.
//!
//! Every `macro_factor` ticks all agents are queried ("macro step"); between
//! macro boundaries the orchestrator skips directly to the next tick that has
//! an internal event due ("micro step").

use std::fmt;

use crate::{CoreError, CoreResult, Rect};

/// Division round-off allowance, in ulps of the quotient, when a seconds →
/// ticks division lands a hair away from an integer (1.0 / 1e-6 evaluates to
/// 999_999.999_999_999_9 in f64).
const ROUNDING_ULPS: f64 = 4.0;

// ── Tmu ───────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`: at a 1 µs resolution a u64 lasts ~585 000 years of
/// simulated time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tmu(pub u64);

impl Tmu {
    pub const ZERO: Tmu = Tmu(0);

    /// Return the tick `n` steps after `self`, saturating at `u64::MAX`.
    #[inline]
    pub fn offset(self, n: u64) -> Tmu {
        Tmu(self.0.saturating_add(n))
    }
}

impl std::ops::Add<u64> for Tmu {
    type Output = Tmu;
    #[inline]
    fn add(self, rhs: u64) -> Tmu {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tmu {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tmu) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tmu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmu{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The clock/config service: current tick plus the immutable run parameters
/// every component reads.
///
/// Owned by the orchestrator and handed to agents by reference through the
/// step context; there is no global clock.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    time_resolution: f64,
    macro_factor:    u64,
    width:           f64,
    height:          f64,
    current:         Tmu,
}

impl SimClock {
    /// Validate the run parameters and build a clock at tick 0.
    ///
    /// Fails with [`CoreError::InvalidConfig`] if any float is non-positive or
    /// non-finite, or if `macro_factor < 1`.
    pub fn configure(
        width:           f64,
        height:          f64,
        time_resolution: f64,
        macro_factor:    u64,
    ) -> CoreResult<Self> {
        require_positive("area width", width)?;
        require_positive("area height", height)?;
        require_positive("time resolution", time_resolution)?;
        if macro_factor < 1 {
            return Err(CoreError::InvalidConfig(
                "macro factor must be at least 1".into(),
            ));
        }
        Ok(Self {
            time_resolution,
            macro_factor,
            width,
            height,
            current: Tmu::ZERO,
        })
    }

    #[inline]
    pub fn current_tmu(&self) -> Tmu {
        self.current
    }

    /// Move the clock forward to `tmu`.  Moving backwards is an error.
    pub fn advance_to(&mut self, tmu: Tmu) -> CoreResult<()> {
        if tmu < self.current {
            return Err(CoreError::ClockRegression {
                current:   self.current,
                requested: tmu,
            });
        }
        self.current = tmu;
        Ok(())
    }

    /// Return the clock to tick 0.  Run parameters are kept.
    pub fn reset(&mut self) {
        self.current = Tmu::ZERO;
    }

    /// Simulated seconds represented by one tick.
    #[inline]
    pub fn time_resolution(&self) -> f64 {
        self.time_resolution
    }

    /// Ticks per macro step.
    #[inline]
    pub fn macro_factor(&self) -> u64 {
        self.macro_factor
    }

    /// Simulated seconds per macro step.
    #[inline]
    pub fn macro_resolution(&self) -> f64 {
        self.macro_factor as f64 * self.time_resolution
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The full simulated area as a closed rectangle.
    pub fn area(&self) -> Rect {
        Rect::area(self.width, self.height)
    }

    /// Simulated seconds at `tmu`.
    #[inline]
    pub fn secs_for(&self, tmu: Tmu) -> f64 {
        tmu.0 as f64 * self.time_resolution
    }

    /// Simulated seconds elapsed at the current tick.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.secs_for(self.current)
    }

    /// Number of ticks in a run of `run_secs` seconds: `floor(run_secs /
    /// time_resolution)`, corrected for division round-off.
    ///
    /// Returns 0 for non-positive or non-finite durations.
    pub fn iterations_for(&self, run_secs: f64) -> u64 {
        if !(run_secs > 0.0) || !run_secs.is_finite() {
            return 0;
        }
        let raw = run_secs / self.time_resolution;
        match snap_to_integer(raw) {
            Some(n) => n as u64,
            None => raw.floor() as u64,
        }
    }

    /// How many ticks span `secs` seconds?  Rounds up so a delayed event is
    /// never delivered early.
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        if !(secs > 0.0) {
            return 0;
        }
        let raw = secs / self.time_resolution;
        match snap_to_integer(raw) {
            Some(n) => n as u64,
            None => raw.ceil() as u64,
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.6} s)", self.current, self.elapsed_secs())
    }
}

fn require_positive(what: &str, value: f64) -> CoreResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!(
            "{what} must be a positive finite number, got {value}"
        )))
    }
}

/// `Some(n)` when `raw` is the integer `n` up to f64 round-off.  The
/// allowance stays far below one tick at any representable tick count.
fn snap_to_integer(raw: f64) -> Option<f64> {
    let nearest = raw.round();
    ((raw - nearest).abs() <= raw.abs() * ROUNDING_ULPS * f64::EPSILON).then_some(nearest)
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run parameters needed to build a clock and seed the RNGs.
///
/// Typically assembled by the session from a TOML file and command-line
/// overrides.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated area extent in metres.
    pub width: f64,
    pub height: f64,

    /// Seconds per tick.  Default: 1 µs.
    pub time_resolution: f64,

    /// Ticks per macro step.  Default: 1000.
    pub macro_factor: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width:           600.0,
            height:          400.0,
            time_resolution: 0.000_001,
            macro_factor:    1000,
            seed:            42,
        }
    }
}

impl SimConfig {
    /// Check every numeric parameter without building anything.
    pub fn validate(&self) -> CoreResult<()> {
        self.make_clock().map(|_| ())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> CoreResult<SimClock> {
        SimClock::configure(self.width, self.height, self.time_resolution, self.macro_factor)
    }
}
