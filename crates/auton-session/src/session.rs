//! `Session`: owns at most one environment and runs it on a worker thread.
//!
//! ```text
//!   Empty ──generate──▶ Ready ──run_simulation──▶ Running ──wait──▶ Finished
//!     ▲                   │                                            │
//!     └──────────────── teardown ◀─────────────────────────────────────┘
//! ```
//!
//! While `Running` the Master lives on the worker thread; the controlling
//! thread only touches the stop flag and the latest status snapshot.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use auton_agent::BehaviorRegistry;
use auton_core::IdAllocator;
use auton_events::InitialEvent;
use auton_sim::{
    DEFAULT_STATUS_INTERVAL, Master, MasterBuilder, PositionSnapshot, RunSummary, SimObserver,
    SimResult, StatusSnapshot,
};

use crate::{EnvironmentConfig, Layout, SessionError, SessionResult};

/// Thread name of the simulation worker.
pub const WORKER_NAME: &str = "auton-sim";

type Worker = JoinHandle<(Master, SimResult<RunSummary>)>;

// ── Phase ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No environment.
    Empty,
    /// Generated, not yet run.
    Ready,
    /// A worker owns the Master.
    Running,
    /// Run returned; the Master and its log are back on this side.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Empty    => "empty",
            Phase::Ready    => "ready",
            Phase::Running  => "running",
            Phase::Finished => "finished",
        })
    }
}

// ── Status sharing ────────────────────────────────────────────────────────────

/// Wraps the caller's observer and publishes each status snapshot to the
/// shared slot before forwarding it.
struct PublishingObserver {
    slot:  Arc<Mutex<Option<StatusSnapshot>>>,
    inner: Box<dyn SimObserver + Send>,
}

impl PublishingObserver {
    fn publish(&self, status: &StatusSnapshot) {
        match self.slot.lock() {
            Ok(mut guard) => *guard = Some(status.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(status.clone()),
        }
    }
}

impl SimObserver for PublishingObserver {
    fn on_run_start(&mut self, iterations: u64) {
        self.inner.on_run_start(iterations);
    }

    fn on_micro_step(&mut self, tmu: auton_core::Tmu, delivered: usize) {
        self.inner.on_micro_step(tmu, delivered);
    }

    fn on_macro_step(&mut self, tmu: auton_core::Tmu, acting: usize) {
        self.inner.on_macro_step(tmu, acting);
    }

    fn on_status(&mut self, status: &StatusSnapshot) {
        // The lock is released before the inner observer runs.
        self.publish(status);
        self.inner.on_status(status);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.inner.on_run_end(summary);
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct Session {
    registry:        BehaviorRegistry,
    status_interval: Duration,
    phase:           Phase,
    config:          Option<EnvironmentConfig>,
    master:          Option<Master>,
    /// Lent to the Master while an environment exists.
    ids:             IdAllocator,
    worker:          Option<Worker>,
    stop:            Arc<AtomicBool>,
    status:          Arc<Mutex<Option<StatusSnapshot>>>,
    summary:         Option<RunSummary>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session resolving scripts against the built-in behaviors.
    pub fn new() -> Self {
        Self::with_registry(BehaviorRegistry::with_builtins())
    }

    pub fn with_registry(registry: BehaviorRegistry) -> Self {
        Self {
            registry,
            status_interval: DEFAULT_STATUS_INTERVAL,
            phase:           Phase::Empty,
            config:          None,
            master:          None,
            ids:             IdAllocator::new(),
            worker:          None,
            stop:            Arc::new(AtomicBool::new(false)),
            status:          Arc::new(Mutex::new(None)),
            summary:         None,
        }
    }

    /// Minimum wall-clock gap between status reports of later runs.
    pub fn set_status_interval(&mut self, interval: Duration) {
        self.status_interval = interval;
    }

    pub fn registry(&self) -> &BehaviorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BehaviorRegistry {
        &mut self.registry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Configuration of the current environment.
    pub fn config(&self) -> Option<&EnvironmentConfig> {
        self.config.as_ref()
    }

    /// Summary of the finished run, if any.
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// The Master, when it is not owned by a worker.
    pub fn master(&self) -> Option<&Master> {
        self.master.as_ref()
    }

    /// `true` while a worker exists and has not returned yet.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    // ── Environment ───────────────────────────────────────────────────────

    /// Partition the area and populate it according to `config`.
    pub fn generate_environment(&mut self, config: &EnvironmentConfig) -> SessionResult<()> {
        if self.phase != Phase::Empty {
            return Err(SessionError::AlreadyGenerated);
        }
        config.validate()?;

        let mut builder = MasterBuilder::new(config.sim_config())
            .nestenes(config.nestenes)
            .scream_probability(config.scream_probability)
            .propagation_speed(config.propagation_speed)
            .interaction_range(config.interaction_range)
            .status_interval(self.status_interval)
            .ids(std::mem::take(&mut self.ids));
        if config.needs_script() {
            let model = self
                .registry
                .get(&config.script)
                .ok_or_else(|| SessionError::UnknownBehavior(config.script.clone()))?;
            builder = builder.script(config.script.clone(), model);
        }
        let mut master = builder.build()?;

        match config.layout {
            Layout::Scattered => {
                master.populate(config.screamers, config.listeners, config.scripted)?
            }
            Layout::Square         => master.populate_square(config.scripted)?,
            Layout::SquareListener => master.populate_square_listener(config.listeners)?,
        }

        tracing::info!(
            layout = %config.layout,
            agents = master.agent_count(),
            nestenes = master.nestenes().len(),
            width = config.width,
            height = config.height,
            "environment generated"
        );

        self.master = Some(master);
        self.config = Some(config.clone());
        self.summary = None;
        self.clear_status();
        self.phase = Phase::Ready;
        Ok(())
    }

    /// Queue stimuli for the upcoming run.  Returns how many were injected.
    pub fn inject_initial_events(&mut self, events: &[InitialEvent]) -> SessionResult<usize> {
        self.require(Phase::Ready)?;
        let master = self.master.as_mut().ok_or(SessionError::NoEnvironment)?;
        for event in events {
            master.inject_initial(event.tmu, event.position, event.signal.clone())?;
        }
        tracing::info!(count = events.len(), "initial events injected");
        Ok(events.len())
    }

    // ── Run control ───────────────────────────────────────────────────────

    /// Start a run of `duration_secs` simulated seconds on the worker thread.
    ///
    /// Returns as soon as the worker is spawned; use [`wait`][Self::wait]
    /// to collect the result.
    pub fn run_simulation(
        &mut self,
        duration_secs: f64,
        observer:      Box<dyn SimObserver + Send>,
    ) -> SessionResult<()> {
        self.require(Phase::Ready)?;
        if !(duration_secs >= 0.0) || !duration_secs.is_finite() {
            return Err(SessionError::Config(format!(
                "run duration must be non-negative and finite, got {duration_secs}"
            )));
        }
        let mut master = self.master.take().ok_or(SessionError::NoEnvironment)?;

        self.stop.store(false, Ordering::Relaxed);
        self.clear_status();
        let stop = Arc::clone(&self.stop);
        let mut observer = PublishingObserver { slot: Arc::clone(&self.status), inner: observer };

        let spawned = thread::Builder::new()
            .name(WORKER_NAME.into())
            .spawn(move || {
                let result = master.run_for(duration_secs, &stop, &mut observer);
                (master, result)
            });
        match spawned {
            Ok(handle) => {
                tracing::info!(duration_secs, "simulation run started");
                self.worker = Some(handle);
                self.phase = Phase::Running;
                Ok(())
            }
            Err(e) => {
                // The Master went down with the closure.
                self.config = None;
                self.phase = Phase::Empty;
                Err(e.into())
            }
        }
    }

    /// Ask the worker to stop at its next safe point.
    pub fn request_stop(&self) {
        if self.phase == Phase::Running {
            tracing::info!("stop requested");
        }
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Join the worker, take the Master back, and return the run result.
    ///
    /// A failed run still leaves the environment in `Finished` with
    /// everything recorded up to the failure.
    pub fn wait(&mut self) -> SessionResult<RunSummary> {
        let worker = self.worker.take().ok_or(SessionError::NotRunning)?;
        let Ok((master, result)) = worker.join() else {
            tracing::error!("simulation worker panicked");
            self.config = None;
            self.phase = Phase::Empty;
            return Err(SessionError::WorkerPanicked);
        };

        self.master = Some(master);
        self.phase = Phase::Finished;
        match result {
            Ok(summary) => {
                self.summary = Some(summary.clone());
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(error = %e, "simulation run failed");
                Err(SessionError::RunFailed(e))
            }
        }
    }

    /// Latest status published by the running (or last) run.
    pub fn status(&self) -> Option<StatusSnapshot> {
        match self.status.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn retrieve_positions(&self) -> SessionResult<PositionSnapshot> {
        self.idle_master().map(Master::retrieve_positions)
    }

    /// Write the external event log of the finished run to
    /// `dir/external_events.csv`.  Returns the number of rows.
    pub fn export_external_events(&self, dir: &Path) -> SessionResult<usize> {
        let master = self.idle_master()?;
        if self.phase != Phase::Finished {
            return Err(SessionError::NoCompletedRun);
        }
        Ok(auton_output::export_external_events(
            master.external_events(),
            master.clock(),
            dir,
        )?)
    }

    /// Drop the environment and reset the id allocator it was lent.  A
    /// running worker is stopped and joined first.
    pub fn teardown(&mut self) {
        if self.worker.is_some() {
            self.request_stop();
            if let Err(e) = self.wait() {
                tracing::warn!(error = %e, "run ended with an error during teardown");
            }
        }
        if let Some(master) = self.master.take() {
            self.ids = master.into_ids();
        }
        self.ids.reset();
        self.config = None;
        self.summary = None;
        self.clear_status();
        self.stop.store(false, Ordering::Relaxed);
        self.phase = Phase::Empty;
        tracing::info!("environment torn down");
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn require(&self, wanted: Phase) -> SessionResult<()> {
        if self.phase == wanted {
            return Ok(());
        }
        Err(match self.phase {
            Phase::Empty    => SessionError::NoEnvironment,
            Phase::Running  => SessionError::RunInProgress,
            Phase::Finished => SessionError::EnvironmentSpent,
            Phase::Ready    => SessionError::AlreadyGenerated,
        })
    }

    fn idle_master(&self) -> SessionResult<&Master> {
        if self.phase == Phase::Running {
            return Err(SessionError::RunInProgress);
        }
        self.master.as_ref().ok_or(SessionError::NoEnvironment)
    }

    fn clear_status(&self) {
        match self.status.lock() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.stop.store(true, Ordering::Relaxed);
            let _ = worker.join();
        }
    }
}
