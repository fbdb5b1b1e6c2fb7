//! The `Master` orchestrator and its macro/micro step loop.
//!
//! # Loop
//!
//! ```text
//! current = 0, next_macro = 0
//! while current < iterations:
//!   ⓪ stop flag set?            → Cancelled
//!   ① internal event due now?   → micro step: drain, deliver, apply actions
//!   ② current == next_macro?    → macro step: query every Nestene, apply
//!                                 actions; next_macro += macro_factor
//!   ③ current = next_tick(..)   → jump over empty ticks
//!   ④ status interval elapsed?  → observer.on_status
//! ```
//!
//! Empty ticks are never visited: with a 1 µs resolution and a macro step
//! every 1000 ticks, the loop only touches ticks that have work.
//!
//! # Applying actions
//!
//! | Action        | Effect                                                     |
//! |---------------|------------------------------------------------------------|
//! | `Emit`        | `Emission` external event + one internal event per listener in range, delayed by distance |
//! | `Notify`      | one internal event to the target after the requested delay |
//! | `Record`      | external event at the agent's position                     |
//!
//! Every internal event lands at least one tick after the step that caused
//! it, so a drained tmu is never refilled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use auton_agent::{Action, AutonFactory, AutonKind, StepContext};
use auton_core::{
    AgentId, EventId, IdAllocator, Position, SimClock, SimRng, Tmu,
};
use auton_events::{
    EventQueue, ExternalEvent, ExternalKind, InternalEvent, Signal, Target,
};

use crate::nestene::{Nestene, PendingActions};
use crate::partition::Partition;
use crate::status::{
    PositionSnapshot, RunCounters, RunOutcome, RunSummary, StatusSnapshot, StatusThrottle,
};
use crate::{SimError, SimObserver, SimResult};

/// Default signal speed in metres per second (sound in air).
pub const DEFAULT_PROPAGATION_SPEED: f64 = 343.0;

/// How emitted signals travel between agents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Propagation {
    /// Metres per second.
    pub speed: f64,
    /// Maximum distance in metres; `None` reaches the whole area.
    pub range: Option<f64>,
}

impl Default for Propagation {
    fn default() -> Self {
        Self { speed: DEFAULT_PROPAGATION_SPEED, range: None }
    }
}

/// Where an agent lives: Nestene index and slot within it.
#[derive(Copy, Clone, Debug)]
struct Slot {
    nest: usize,
    slot: usize,
}

/// The orchestrator: owns the clock, the Nestenes, and the event queue, and
/// drives the run loop.
///
/// Create via [`MasterBuilder`][crate::MasterBuilder].
pub struct Master {
    pub(crate) clock:           SimClock,
    pub(crate) ids:             IdAllocator,
    pub(crate) partition:       Partition,
    pub(crate) nestenes:        Vec<Nestene>,
    /// Indexed by `AgentId`: ids are issued densely from 0.
    locator:                    Vec<Slot>,
    pub(crate) queue:           EventQueue,
    pub(crate) rng:             SimRng,
    pub(crate) factory:         AutonFactory,
    pub(crate) propagation:     Propagation,
    pub(crate) status_interval: Duration,
    counters:                   RunCounters,
    populated:                  bool,
    has_run:                    bool,
}

impl Master {
    pub(crate) fn from_parts(
        clock:           SimClock,
        mut ids:         IdAllocator,
        partition:       Partition,
        rng:             SimRng,
        factory:         AutonFactory,
        propagation:     Propagation,
        status_interval: Duration,
    ) -> Self {
        let nestenes = partition
            .cells()
            .iter()
            .map(|&bounds| Nestene::new(ids.next_nest_id(), bounds))
            .collect();
        Self {
            clock,
            ids,
            partition,
            nestenes,
            locator: Vec::new(),
            queue: EventQueue::new(),
            rng,
            factory,
            propagation,
            status_interval,
            counters: RunCounters::default(),
            populated: false,
            has_run: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn nestenes(&self) -> &[Nestene] {
        &self.nestenes
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    pub fn agent_count(&self) -> usize {
        self.locator.len()
    }

    /// `true` once any populate call has succeeded, even with zero agents.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// Every recorded external event ordered by tmu, then insertion.
    pub fn external_events(&self) -> impl Iterator<Item = &ExternalEvent> + '_ {
        self.queue.all_external()
    }

    /// Ids issued so far; agents and events share the allocator's lifetime.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Drop the environment and hand its id allocator back.
    pub fn into_ids(self) -> IdAllocator {
        self.ids
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Spawn agents at uniform random positions.
    ///
    /// Each variant's count is split evenly across Nestenes; the remainder
    /// goes one extra agent each to the lowest-indexed Nestenes.  Ids are
    /// assigned screamers first, then listeners, then scripted agents.
    pub fn populate(&mut self, screamers: u32, listeners: u32, scripted: u32) -> SimResult<()> {
        self.check_can_populate(screamers as u64 + listeners as u64 + scripted as u64)?;
        self.populated = true;

        let n = self.nestenes.len();
        for (kind, count) in [
            (AutonKind::Screamer, screamers),
            (AutonKind::Listener, listeners),
            (AutonKind::Scripted, scripted),
        ] {
            let count = count as usize;
            let (base, extra) = (count / n, count % n);
            for nest in 0..n {
                let here = base + usize::from(nest < extra);
                let bounds = *self.nestenes[nest].bounds();
                for _ in 0..here {
                    let position = self.rng.position_in(&bounds);
                    self.spawn(kind, position, Some(nest))?;
                }
            }
        }

        tracing::info!(
            screamers,
            listeners,
            scripted,
            nestenes = n,
            "population placed"
        );
        Ok(())
    }

    /// Spawn `scripted` agents on a square lattice over the whole area.
    pub fn populate_square(&mut self, scripted: u32) -> SimResult<()> {
        self.populate_lattice(AutonKind::Scripted, scripted)
    }

    /// Spawn `listeners` on a square lattice over the whole area.
    pub fn populate_square_listener(&mut self, listeners: u32) -> SimResult<()> {
        self.populate_lattice(AutonKind::Listener, listeners)
    }

    fn populate_lattice(&mut self, kind: AutonKind, count: u32) -> SimResult<()> {
        self.check_can_populate(count as u64)?;
        self.populated = true;
        for position in lattice(count, self.clock.width(), self.clock.height()) {
            self.spawn(kind, position, None)?;
        }
        tracing::info!(%kind, count, nestenes = self.nestenes.len(), "lattice placed");
        Ok(())
    }

    fn check_can_populate(&self, total: u64) -> SimResult<()> {
        if self.nestenes.is_empty() {
            return Err(SimError::Population("no Nestenes to place agents in".into()));
        }
        if self.is_populated() {
            return Err(SimError::Population("environment is already populated".into()));
        }
        if total > u64::from(self.ids.agents_remaining()) {
            return Err(SimError::Population(format!(
                "{total} agents requested but only {} ids remain",
                self.ids.agents_remaining()
            )));
        }
        Ok(())
    }

    fn spawn(&mut self, kind: AutonKind, position: Position, nest: Option<usize>) -> SimResult<()> {
        let nest = match nest {
            Some(n) => n,
            None => self
                .partition
                .locate(position)
                .ok_or_else(|| SimError::Population(format!("{position} is outside the area")))?,
        };
        let id = self
            .ids
            .next_agent_id()
            .ok_or_else(|| SimError::Population("agent id space exhausted".into()))?;
        let agent = self.factory.build(kind, id, position)?;
        let slot = self.nestenes[nest].place(agent)?;
        debug_assert_eq!(id.index(), self.locator.len());
        self.locator.push(Slot { nest, slot });
        Ok(())
    }

    /// Positions of every agent by variant, ordered by id.
    pub fn retrieve_positions(&self) -> PositionSnapshot {
        let mut snap = PositionSnapshot {
            width: self.clock.width(),
            height: self.clock.height(),
            ..PositionSnapshot::default()
        };
        for loc in &self.locator {
            let Some(agent) = self.nestenes[loc.nest].agent(loc.slot) else {
                continue;
            };
            let list = match agent.kind() {
                AutonKind::Screamer => &mut snap.screamers,
                AutonKind::Listener => &mut snap.listeners,
                AutonKind::Scripted => &mut snap.scripted,
            };
            list.push(agent.position());
        }
        snap
    }

    // ── Seeding ───────────────────────────────────────────────────────────

    /// Record an initialization event at `tmu` and schedule its broadcast
    /// from `position` to every listening agent in range.
    pub fn inject_initial(&mut self, tmu: Tmu, position: Position, signal: Signal) -> SimResult<EventId> {
        if self.has_run {
            return Err(SimError::AlreadyRun);
        }
        let id = self.ids.next_event_id();
        self.queue.schedule_external(ExternalEvent {
            id,
            tmu,
            kind: ExternalKind::Initialization,
            origin: None,
            position,
            signal: signal.clone(),
        })?;
        let activation = self.ids.next_event_id();
        self.queue.schedule_internal(InternalEvent {
            id: activation,
            tmu,
            origin: None,
            cause: Some(id),
            target: Target::Broadcast(position),
            signal,
        })?;
        self.counters.events_initiated += 1;
        tracing::debug!(id = id.0, tmu = tmu.0, %position, "initial event injected");
        Ok(id)
    }

    // ── Run ───────────────────────────────────────────────────────────────

    /// Run for `run_secs` simulated seconds.
    pub fn run_for<O: SimObserver + ?Sized>(
        &mut self,
        run_secs: f64,
        stop:     &AtomicBool,
        observer: &mut O,
    ) -> SimResult<RunSummary> {
        let iterations = self.clock.iterations_for(run_secs);
        self.run(iterations, stop, observer)
    }

    /// Run ticks `0..iterations`, checking `stop` before every step.
    ///
    /// An environment can be run once.  A behavior failure aborts the loop
    /// and is returned; everything recorded up to that point is kept.
    pub fn run<O: SimObserver + ?Sized>(
        &mut self,
        iterations: u64,
        stop:       &AtomicBool,
        observer:   &mut O,
    ) -> SimResult<RunSummary> {
        if self.has_run {
            return Err(SimError::AlreadyRun);
        }
        self.has_run = true;

        let started = Instant::now();
        let macro_factor = self.clock.macro_factor();
        let mut throttle = StatusThrottle::new(self.status_interval);
        let mut current = Tmu::ZERO;
        let mut next_macro = Tmu::ZERO;
        let mut outcome = RunOutcome::Completed;

        self.clock.reset();
        tracing::info!(
            iterations,
            agents = self.locator.len(),
            nestenes = self.nestenes.len(),
            macro_factor,
            "run started"
        );
        observer.on_run_start(iterations);

        while current.0 < iterations {
            if stop.load(Ordering::Relaxed) {
                outcome = RunOutcome::Cancelled;
                break;
            }

            self.clock.advance_to(current)?;
            self.queue.set_now(current)?;

            if self.queue.next_internal_due() == Some(current) {
                let delivered = self.micro_step(current)?;
                observer.on_micro_step(current, delivered);
            }

            if current == next_macro {
                let acting = self.macro_step(current)?;
                observer.on_macro_step(current, acting);
                next_macro = next_macro + macro_factor;
            }

            current = next_tick(current, next_macro, self.queue.next_internal_due(), iterations);

            if throttle.ready() {
                let status = self.status_at(current, iterations);
                tracing::debug!(%status, "status");
                observer.on_status(&status);
            }
        }

        self.clock.advance_to(current)?;
        let status = self.status_at(current, iterations);
        observer.on_status(&status);

        let summary = RunSummary {
            outcome,
            final_tmu: current,
            iterations,
            counters: self.counters,
            queue: self.queue.counts(),
            wall_time: started.elapsed(),
        };
        tracing::info!(
            outcome = ?summary.outcome,
            final_tmu = current.0,
            macro_steps = self.counters.macro_steps,
            micro_steps = self.counters.micro_steps,
            external = summary.queue.external,
            "run ended"
        );
        observer.on_run_end(&summary);
        Ok(summary)
    }

    /// Status at the clock's current tmu, for callers outside the loop.
    pub fn status(&self, iterations: u64) -> StatusSnapshot {
        self.status_at(self.clock.current_tmu(), iterations)
    }

    fn status_at(&self, current: Tmu, iterations: u64) -> StatusSnapshot {
        StatusSnapshot::new(
            current,
            iterations,
            self.clock.secs_for(current),
            &self.counters,
            self.queue.counts(),
        )
    }

    // ── Steps ─────────────────────────────────────────────────────────────

    /// Deliver every internal event due at `now`, applying each recipient's
    /// actions before moving to the next event.
    ///
    /// If a delivery fails, the events behind it in the batch go back on the
    /// queue so the retained state still counts them.
    fn micro_step(&mut self, now: Tmu) -> SimResult<usize> {
        let due = self.queue.drain_internal_due(now);
        let delivered = due.len();
        tracing::trace!(tmu = now.0, delivered, "micro step");

        let mut pending = due.into_iter();
        while let Some(event) = pending.next() {
            if let Err(e) = self.deliver(now, event) {
                let rest: Vec<InternalEvent> = pending.collect();
                if !rest.is_empty() {
                    tracing::warn!(tmu = now.0, undelivered = rest.len(), "micro step aborted");
                    self.queue.restore_due(now, rest);
                }
                return Err(e);
            }
        }

        self.counters.micro_steps += 1;
        Ok(delivered)
    }

    fn deliver(&mut self, now: Tmu, event: InternalEvent) -> SimResult<()> {
        self.counters.events_delivered += 1;
        match event.target {
            Target::Broadcast(position) => {
                self.propagate(now, position, None, event.cause, &event.signal)
            }
            Target::Agent(id) => {
                let slot = self.slot_of(id)?;
                let clock = &self.clock;
                let ctx = StepContext::new(now, clock);
                let Some(agent) = self.nestenes[slot.nest].agent_mut(slot.slot) else {
                    return Err(SimError::UnknownAgent(id));
                };
                let position = agent.position();
                let actions = agent.on_event(&event, &ctx).map_err(|source| {
                    tracing::warn!(agent = %id, tmu = now.0, error = %source, "event handler failed");
                    SimError::Behavior { agent: id, tmu: now, source }
                })?;
                self.apply(now, PendingActions { agent: id, position, actions })
            }
        }
    }

    /// Query every agent, then apply all actions in Nestene order then
    /// agent order.
    fn macro_step(&mut self, now: Tmu) -> SimResult<usize> {
        let pending = self.query_all(now)?;
        let acting = pending.len();
        tracing::trace!(tmu = now.0, acting, "macro step");
        for p in pending {
            self.apply(now, p)?;
        }
        self.counters.macro_steps += 1;
        Ok(acting)
    }

    #[cfg(not(feature = "parallel"))]
    fn query_all(&mut self, now: Tmu) -> SimResult<Vec<PendingActions>> {
        let ctx = StepContext::new(now, &self.clock);
        let mut out = Vec::new();
        for nest in &mut self.nestenes {
            nest.query_step(&ctx, &mut out)?;
        }
        Ok(out)
    }

    #[cfg(feature = "parallel")]
    fn query_all(&mut self, now: Tmu) -> SimResult<Vec<PendingActions>> {
        use rayon::prelude::*;

        let ctx = StepContext::new(now, &self.clock);
        // Indexed collect keeps Nestene order.
        let per_nest: Vec<Vec<PendingActions>> = self
            .nestenes
            .par_iter_mut()
            .map(|nest| {
                let mut out = Vec::new();
                nest.query_step(&ctx, &mut out).map(|()| out)
            })
            .collect::<SimResult<_>>()?;
        Ok(per_nest.into_iter().flatten().collect())
    }

    fn apply(&mut self, now: Tmu, pending: PendingActions) -> SimResult<()> {
        let PendingActions { agent, position, actions } = pending;
        for action in actions {
            match action {
                Action::Emit(signal) => {
                    let id = self.ids.next_event_id();
                    self.queue.record_external(ExternalEvent {
                        id,
                        tmu: now,
                        kind: ExternalKind::Emission,
                        origin: Some(agent),
                        position,
                        signal: signal.clone(),
                    })?;
                    self.counters.events_initiated += 1;
                    self.propagate(now, position, Some(agent), Some(id), &signal)?;
                }
                Action::Notify { target, delay, signal } => {
                    self.slot_of(target)?;
                    let id = self.ids.next_event_id();
                    self.queue.schedule_internal(InternalEvent {
                        id,
                        tmu: now + delay.max(1),
                        origin: Some(agent),
                        cause: None,
                        target: Target::Agent(target),
                        signal,
                    })?;
                }
                Action::Record { kind, signal } => {
                    let id = self.ids.next_event_id();
                    self.queue.record_external(ExternalEvent {
                        id,
                        tmu: now,
                        kind,
                        origin: Some(agent),
                        position,
                        signal,
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Schedule delivery of `signal` from `from` to every listening agent in
    /// range other than `origin`.
    ///
    /// Whole Nestenes farther than the range are skipped without looking at
    /// their agents.
    fn propagate(
        &mut self,
        now:    Tmu,
        from:   Position,
        origin: Option<AgentId>,
        cause:  Option<EventId>,
        signal: &Signal,
    ) -> SimResult<()> {
        let Propagation { speed, range } = self.propagation;
        let limit = range.unwrap_or(f64::INFINITY);

        let mut arrivals: Vec<(AgentId, u64)> = Vec::new();
        for nest in &self.nestenes {
            if nest.bounds().distance_to(from) > limit {
                continue;
            }
            for agent in nest.agents() {
                if !agent.listens() || Some(agent.id()) == origin {
                    continue;
                }
                let d = from.distance(agent.position());
                if d > limit {
                    continue;
                }
                let delay = self.clock.ticks_for_secs(d / speed).max(1);
                arrivals.push((agent.id(), delay));
            }
        }

        tracing::trace!(tmu = now.0, tag = %signal.tag, reached = arrivals.len(), "propagate");
        for (target, delay) in arrivals {
            let id = self.ids.next_event_id();
            self.queue.schedule_internal(InternalEvent {
                id,
                tmu: now + delay,
                origin,
                cause,
                target: Target::Agent(target),
                signal: signal.clone(),
            })?;
        }
        Ok(())
    }

    fn slot_of(&self, id: AgentId) -> SimResult<Slot> {
        self.locator
            .get(id.index())
            .copied()
            .ok_or(SimError::UnknownAgent(id))
    }
}

impl std::fmt::Debug for Master {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Master")
            .field("clock", &self.clock)
            .field("nestenes", &self.nestenes.len())
            .field("agents", &self.locator.len())
            .field("queue", &self.queue.counts())
            .field("has_run", &self.has_run)
            .finish()
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// The next tick the loop visits after `current`.
///
/// The earlier of the next macro boundary and the next internal event,
/// never beyond `iterations` and never earlier than `current + 1`.
pub fn next_tick(current: Tmu, next_macro: Tmu, next_internal: Option<Tmu>, iterations: u64) -> Tmu {
    let candidate = match next_internal {
        Some(t) if t < next_macro => t,
        _ => next_macro,
    };
    candidate.max(current + 1).min(Tmu(iterations))
}

/// `count` points on a square lattice covering `width × height`.
///
/// `side = ceil(sqrt(count))` columns, as many rows as needed, each point at
/// the centre of its lattice cell.  Points are produced row by row.
pub fn lattice(count: u32, width: f64, height: f64) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }
    let count = count as usize;
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    let dx = width / cols as f64;
    let dy = height / rows as f64;
    (0..count)
        .map(|i| {
            let (r, c) = (i / cols, i % cols);
            Position::new((c as f64 + 0.5) * dx, (r as f64 + 0.5) * dy)
        })
        .collect()
}
