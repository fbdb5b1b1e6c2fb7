//! Fluent builder for constructing a [`Master`].

use std::sync::Arc;
use std::time::Duration;

use auton_agent::{AutonFactory, BehaviorModel};
use auton_core::{IdAllocator, SimConfig, SimRng};

use crate::master::{Master, Propagation};
use crate::partition::Partition;
use crate::status::DEFAULT_STATUS_INTERVAL;
use crate::{SimError, SimResult};

/// Fluent builder for [`Master`].
///
/// # Required inputs
///
/// - [`SimConfig`]: area extent, time resolution, macro factor, seed.
///
/// # Optional inputs (have defaults)
///
/// | Method                       | Default                         |
/// |------------------------------|---------------------------------|
/// | `.nestenes(n)`               | 1                               |
/// | `.scream_probability(p)`     | 0.05                            |
/// | `.script(name, model)`       | none (scripted agents rejected) |
/// | `.propagation_speed(v)`      | 343 m/s                         |
/// | `.interaction_range(r)`      | unlimited                       |
/// | `.status_interval(d)`        | 350 ms                          |
/// | `.ids(allocator)`            | a new allocator                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut master = MasterBuilder::new(SimConfig::default())
///     .nestenes(4)
///     .script("chorus", registry.resolve("chorus")?)
///     .build()?;
/// master.populate(10, 10, 2)?;
/// master.run_for(1.0, &AtomicBool::new(false), &mut NoopObserver)?;
/// ```
pub struct MasterBuilder {
    config:          SimConfig,
    nestenes:        u32,
    factory:         AutonFactory,
    propagation:     Propagation,
    status_interval: Duration,
    ids:             IdAllocator,
}

impl MasterBuilder {
    pub fn new(config: SimConfig) -> Self {
        let factory = AutonFactory::new(config.seed);
        Self {
            config,
            nestenes: 1,
            factory,
            propagation: Propagation::default(),
            status_interval: DEFAULT_STATUS_INTERVAL,
            ids: IdAllocator::new(),
        }
    }

    /// Number of cells the area is partitioned into.
    pub fn nestenes(mut self, n: u32) -> Self {
        self.nestenes = n;
        self
    }

    pub fn scream_probability(mut self, p: f64) -> Self {
        self.factory = self.factory.scream_probability(p);
        self
    }

    /// Model driving every scripted agent.
    pub fn script(mut self, name: impl Into<String>, model: Arc<dyn BehaviorModel>) -> Self {
        self.factory = self.factory.script(name, model);
        self
    }

    /// Signal speed in metres per second.
    pub fn propagation_speed(mut self, speed: f64) -> Self {
        self.propagation.speed = speed;
        self
    }

    /// Maximum distance a signal travels; `None` for the whole area.
    pub fn interaction_range(mut self, range: Option<f64>) -> Self {
        self.propagation.range = range;
        self
    }

    /// Minimum wall-clock gap between status reports.
    pub fn status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    /// Allocator the environment issues its ids from.  It must not have
    /// issued anything yet; recover it afterwards with
    /// [`Master::into_ids`].
    pub fn ids(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }

    /// Validate inputs, partition the area, and return an empty [`Master`].
    pub fn build(self) -> SimResult<Master> {
        let clock = self.config.make_clock()?;

        let speed = self.propagation.speed;
        if !(speed > 0.0) || !speed.is_finite() {
            return Err(SimError::Config(format!(
                "propagation speed must be positive and finite, got {speed}"
            )));
        }
        if let Some(range) = self.propagation.range {
            if !(range >= 0.0) || !range.is_finite() {
                return Err(SimError::Config(format!(
                    "interaction range must be non-negative and finite, got {range}"
                )));
            }
        }

        if !self.ids.is_fresh() {
            return Err(SimError::Config(
                "id allocator has already issued ids; reset it first".into(),
            ));
        }

        let partition = Partition::new(clock.width(), clock.height(), self.nestenes)?;
        tracing::debug!(
            cols = partition.cols(),
            rows = partition.rows(),
            width = clock.width(),
            height = clock.height(),
            "area partitioned"
        );

        Ok(Master::from_parts(
            clock,
            self.ids,
            partition,
            SimRng::new(self.config.seed),
            self.factory,
            self.propagation,
            self.status_interval,
        ))
    }
}
