//! Unit tests for auton-sim.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use auton_agent::{
    Action, AgentView, BehaviorError, BehaviorModel, BehaviorResult, NoopBehavior, ScriptMemory,
    StepContext,
};
use auton_core::{AgentId, AgentRng, Position, SimConfig, Tmu};
use auton_events::{ExternalEvent, ExternalKind, InternalEvent, Signal};

use crate::{Master, MasterBuilder, NoopObserver, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config() -> SimConfig {
    SimConfig {
        width:           600.0,
        height:          400.0,
        time_resolution: 1e-6,
        macro_factor:    1000,
        seed:            7,
    }
}

fn master(nestenes: u32, model: impl BehaviorModel) -> Master {
    MasterBuilder::new(config())
        .nestenes(nestenes)
        .script("test", Arc::new(model))
        .build()
        .unwrap()
}

fn never_stop() -> AtomicBool {
    AtomicBool::new(false)
}

fn of_kind(m: &Master, kind: ExternalKind) -> Vec<ExternalEvent> {
    m.external_events().filter(|e| e.kind == kind).cloned().collect()
}

/// Records one detection per query; counts queries per agent.
struct Tally;

impl BehaviorModel for Tally {
    fn on_query(
        &self,
        _view:  &AgentView,
        memory: &mut ScriptMemory,
        _ctx:   &StepContext<'_>,
        _rng:   &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>> {
        let n = memory.bump("queries", 1.0);
        Ok(vec![Action::detect(Signal::new("tally", n))])
    }
}

/// Emits once on its first query, records everything it hears.
struct EmitOnce;

impl BehaviorModel for EmitOnce {
    fn on_query(
        &self,
        _view:  &AgentView,
        memory: &mut ScriptMemory,
        _ctx:   &StepContext<'_>,
        _rng:   &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>> {
        if memory.get("done").is_some() {
            return Ok(vec![]);
        }
        memory.set("done", 1.0);
        Ok(vec![Action::Emit(Signal::new("hello", 1.0))])
    }

    fn on_event(
        &self,
        _view:   &AgentView,
        _memory: &mut ScriptMemory,
        event:   &InternalEvent,
        _ctx:    &StepContext<'_>,
        _rng:    &mut AgentRng,
    ) -> BehaviorResult<Vec<Action>> {
        Ok(vec![Action::detect(event.signal.clone())])
    }
}

// ── Partition ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod partition_tests {
    use crate::SimError;
    use crate::partition::{MAX_NESTENES, Partition, grid_shape};
    use auton_core::Position;

    #[test]
    fn grid_shape_follows_aspect_ratio() {
        assert_eq!(grid_shape(1, 600.0, 400.0), (1, 1));
        assert_eq!(grid_shape(4, 600.0, 400.0), (2, 2));
        assert_eq!(grid_shape(6, 600.0, 400.0), (3, 2));
        assert_eq!(grid_shape(6, 400.0, 600.0), (2, 3));
        assert_eq!(grid_shape(7, 600.0, 400.0), (7, 1));
    }

    #[test]
    fn cells_tile_the_area() {
        let p = Partition::new(600.0, 400.0, 6).unwrap();
        assert_eq!(p.len(), 6);
        let total: f64 = p.cells().iter().map(|c| c.surface()).sum();
        assert!((total - 600.0 * 400.0).abs() < 1e-6);
    }

    #[test]
    fn every_point_has_exactly_one_cell() {
        let p = Partition::new(600.0, 400.0, 6).unwrap();
        for i in 0..=60 {
            for j in 0..=40 {
                let pt = Position::new(i as f64 * 10.0, j as f64 * 10.0);
                let owners: Vec<usize> = p
                    .cells()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.contains(pt))
                    .map(|(k, _)| k)
                    .collect();
                assert_eq!(owners.len(), 1, "{pt} owned by {owners:?}");
                assert_eq!(p.locate(pt), Some(owners[0]));
            }
        }
    }

    #[test]
    fn outside_points_have_no_cell() {
        let p = Partition::new(600.0, 400.0, 4).unwrap();
        assert_eq!(p.locate(Position::new(-0.1, 10.0)), None);
        assert_eq!(p.locate(Position::new(10.0, 400.1)), None);
        assert_eq!(p.locate(Position::new(f64::NAN, 1.0)), None);
    }

    #[test]
    fn cell_count_bounds() {
        assert!(matches!(Partition::new(600.0, 400.0, 0), Err(SimError::Config(_))));
        assert!(matches!(
            Partition::new(600.0, 400.0, MAX_NESTENES + 1),
            Err(SimError::Config(_))
        ));
        assert!(matches!(Partition::new(600.0, 400.0, u32::MAX), Err(SimError::Config(_))));
    }
}

// ── Nestene ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod nestene_tests {
    use super::*;
    use crate::nestene::Nestene;
    use crate::SimError;
    use auton_agent::{AutonFactory, AutonKind};
    use auton_core::{NestId, Rect, SimClock};

    #[test]
    fn place_rejects_foreign_positions() {
        let mut nest = Nestene::new(NestId(0), Rect::half_open(0.0, 0.0, 100.0, 100.0));
        let factory = AutonFactory::new(1);
        let inside = factory.build(AutonKind::Listener, AgentId(0), Position::new(50.0, 50.0)).unwrap();
        let outside = factory.build(AutonKind::Listener, AgentId(1), Position::new(100.0, 50.0)).unwrap();

        assert_eq!(nest.place(inside).unwrap(), 0);
        assert!(matches!(
            nest.place(outside),
            Err(SimError::OutOfBounds { agent: AgentId(1), .. })
        ));
        assert_eq!(nest.len(), 1);
    }

    #[test]
    fn query_step_collects_only_acting_agents() {
        let mut nest = Nestene::new(NestId(0), Rect::area(100.0, 100.0));
        let factory = AutonFactory::new(1).scream_probability(1.0);
        nest.place(factory.build(AutonKind::Screamer, AgentId(0), Position::new(1.0, 1.0)).unwrap()).unwrap();
        nest.place(factory.build(AutonKind::Listener, AgentId(1), Position::new(2.0, 2.0)).unwrap()).unwrap();

        let clock = SimClock::configure(100.0, 100.0, 1e-6, 1000).unwrap();
        let mut out = Vec::new();
        nest.query_step(&StepContext::new(Tmu(0), &clock), &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].agent, AgentId(0));
        assert_eq!(out[0].position, Position::new(1.0, 1.0));
    }
}

// ── Population ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod population_tests {
    use super::*;
    use crate::{SimError, lattice};

    #[test]
    fn remainder_goes_to_lowest_cells() {
        let mut m = master(4, NoopBehavior);
        m.populate(10, 0, 0).unwrap();
        let sizes: Vec<usize> = m.nestenes().iter().map(|n| n.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert_eq!(m.agent_count(), 10);
    }

    #[test]
    fn every_agent_is_inside_its_nestene() {
        let mut m = master(6, NoopBehavior);
        m.populate(7, 11, 5).unwrap();
        for nest in m.nestenes() {
            for agent in nest.agents() {
                assert!(nest.bounds().contains(agent.position()));
            }
        }
    }

    #[test]
    fn positions_grouped_by_variant() {
        let mut m = master(4, NoopBehavior);
        m.populate(3, 5, 2).unwrap();
        let snap = m.retrieve_positions();
        assert_eq!(snap.screamers.len(), 3);
        assert_eq!(snap.listeners.len(), 5);
        assert_eq!(snap.scripted.len(), 2);
        assert_eq!(snap.total(), 10);
        assert_eq!((snap.width, snap.height), (600.0, 400.0));
    }

    #[test]
    fn populate_twice_is_rejected() {
        let mut m = master(2, NoopBehavior);
        m.populate(0, 0, 0).unwrap();
        assert!(matches!(m.populate(1, 0, 0), Err(SimError::Population(_))));
        assert!(matches!(m.populate_square(4), Err(SimError::Population(_))));
    }

    #[test]
    fn scripted_agents_need_a_script() {
        let mut m = MasterBuilder::new(config()).build().unwrap();
        assert!(matches!(m.populate(0, 0, 1), Err(SimError::Setup(_))));
    }

    #[test]
    fn square_lattice_placement() {
        let mut m = master(4, NoopBehavior);
        m.populate_square(9).unwrap();
        let snap = m.retrieve_positions();
        assert_eq!(snap.scripted.len(), 9);
        assert_eq!(snap.scripted[0], Position::new(100.0, 400.0 / 6.0));
        let placed: usize = m.nestenes().iter().map(|n| n.len()).sum();
        assert_eq!(placed, 9);
    }

    #[test]
    fn square_listener_lattice() {
        let mut m = master(1, NoopBehavior);
        m.populate_square_listener(4).unwrap();
        assert_eq!(
            m.retrieve_positions().listeners,
            vec![
                Position::new(150.0, 100.0),
                Position::new(450.0, 100.0),
                Position::new(150.0, 300.0),
                Position::new(450.0, 300.0),
            ]
        );
    }

    #[test]
    fn lattice_shape() {
        assert!(lattice(0, 10.0, 10.0).is_empty());
        let pts = lattice(5, 600.0, 400.0);
        assert_eq!(pts.len(), 5);
        // 3 columns, 2 rows
        assert_eq!(pts[3], Position::new(100.0, 300.0));
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loop_tests {
    use super::*;
    use crate::{RunOutcome, RunSummary, SimError, StatusSnapshot, next_tick};

    #[derive(Default)]
    struct Recorder {
        statuses: Vec<StatusSnapshot>,
        macros:   u64,
        ended:    bool,
    }

    impl SimObserver for Recorder {
        fn on_macro_step(&mut self, _tmu: Tmu, _acting: usize) {
            self.macros += 1;
        }
        fn on_status(&mut self, s: &StatusSnapshot) {
            self.statuses.push(s.clone());
        }
        fn on_run_end(&mut self, _summary: &RunSummary) {
            self.ended = true;
        }
    }

    #[test]
    fn one_second_scenario() {
        let mut m = master(1, NoopBehavior);
        m.populate(0, 0, 2).unwrap();
        let mut rec = Recorder::default();
        let summary = m.run_for(1.0, &never_stop(), &mut rec).unwrap();

        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(summary.iterations, 1_000_000);
        assert_eq!(summary.final_tmu, Tmu(1_000_000));
        assert_eq!(summary.counters.macro_steps, 1000);
        assert_eq!(rec.macros, 1000);
        assert!(rec.ended);

        let last = rec.statuses.last().unwrap();
        assert_eq!(last.current_tmu, Tmu(1_000_000));
        assert_eq!(last.percent_complete, 100.0);
        assert_eq!(m.clock().current_tmu(), Tmu(1_000_000));
    }

    #[test]
    fn zero_duration_run() {
        let mut m = master(1, NoopBehavior);
        let summary = m.run_for(0.0, &never_stop(), &mut NoopObserver).unwrap();
        assert!(summary.completed());
        assert_eq!(summary.final_tmu, Tmu(0));
        assert_eq!(summary.counters.macro_steps, 0);
    }

    #[test]
    fn environment_runs_once() {
        let mut m = master(1, NoopBehavior);
        m.run(10, &never_stop(), &mut NoopObserver).unwrap();
        assert!(matches!(
            m.run(10, &never_stop(), &mut NoopObserver),
            Err(SimError::AlreadyRun)
        ));
    }

    #[test]
    fn next_tick_examples() {
        assert_eq!(next_tick(Tmu(0), Tmu(1000), None, 1_000_000), Tmu(1000));
        assert_eq!(next_tick(Tmu(0), Tmu(1000), Some(Tmu(500)), 1_000_000), Tmu(500));
        assert_eq!(next_tick(Tmu(500), Tmu(1000), Some(Tmu(2000)), 1_000_000), Tmu(1000));
        assert_eq!(next_tick(Tmu(999_000), Tmu(1_000_000), None, 999_500), Tmu(999_500));
    }

    #[test]
    fn builder_validation() {
        assert!(matches!(
            MasterBuilder::new(config()).propagation_speed(0.0).build(),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            MasterBuilder::new(config()).interaction_range(Some(f64::NAN)).build(),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            MasterBuilder::new(config()).nestenes(0).build(),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            MasterBuilder::new(SimConfig { macro_factor: 0, ..config() }).build(),
            Err(SimError::Core(_))
        ));
    }

    #[test]
    fn allocator_must_be_reset_before_reuse() {
        let mut m = master(2, NoopBehavior);
        m.populate(0, 3, 0).unwrap();
        let mut ids = m.into_ids();
        assert_eq!(ids.agents_issued(), 3);

        assert!(matches!(
            MasterBuilder::new(config()).ids(ids.clone()).build(),
            Err(SimError::Config(_))
        ));

        ids.reset();
        let mut m = MasterBuilder::new(config()).nestenes(2).ids(ids).build().unwrap();
        m.populate(0, 3, 0).unwrap();
        let nests: Vec<u32> = m.nestenes().iter().map(|n| n.id().0).collect();
        assert_eq!(nests, vec![0, 1]);
        assert_eq!(m.ids().agents_issued(), 3);
    }

    #[test]
    fn same_seed_same_external_log() {
        let build = || {
            let mut m = MasterBuilder::new(config())
                .nestenes(4)
                .scream_probability(0.3)
                .build()
                .unwrap();
            m.populate(6, 10, 0).unwrap();
            m.run_for(0.05, &never_stop(), &mut NoopObserver).unwrap();
            m.external_events().cloned().collect::<Vec<_>>()
        };
        let a = build();
        let b = build();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn behavior_failure_aborts_the_run() {
        struct Broken;
        impl BehaviorModel for Broken {
            fn on_query(
                &self,
                _view:   &AgentView,
                _memory: &mut ScriptMemory,
                _ctx:    &StepContext<'_>,
                _rng:    &mut AgentRng,
            ) -> BehaviorResult<Vec<Action>> {
                Err(BehaviorError::Script { script: "broken".into(), reason: "boom".into() })
            }
        }

        let mut m = master(1, Broken);
        m.populate(0, 0, 1).unwrap();
        let err = m.run(5000, &never_stop(), &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Behavior { agent: AgentId(0), tmu: Tmu(0), .. }));
    }
}

// ── Events between agents ─────────────────────────────────────────────────────

#[cfg(test)]
mod propagation_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn broadcast_delay_follows_distance() {
        let mut m = master(4, NoopBehavior);
        m.populate_square_listener(4).unwrap();
        m.inject_initial(Tmu(0), Position::new(150.0, 100.0), Signal::new("clap", 1.0)).unwrap();
        let summary = m.run_for(1.0, &never_stop(), &mut NoopObserver).unwrap();

        let clock = m.clock().clone();
        let detections = of_kind(&m, ExternalKind::Detection);
        let heard: Vec<(Option<AgentId>, Tmu)> = detections.iter().map(|e| (e.origin, e.tmu)).collect();

        assert_eq!(
            heard,
            vec![
                (Some(AgentId(0)), Tmu(1)),
                (Some(AgentId(2)), Tmu(clock.ticks_for_secs(200.0 / 343.0))),
                (Some(AgentId(1)), Tmu(clock.ticks_for_secs(300.0 / 343.0))),
            ]
        );
        // The diagonal listener is 360 m away: still in flight after 1 s.
        assert_eq!(summary.queue.internal, 1);
        assert_eq!(of_kind(&m, ExternalKind::Initialization).len(), 1);
        assert_eq!(summary.counters.events_initiated, 1);
    }

    #[test]
    fn range_limits_who_hears() {
        let mut m = MasterBuilder::new(config())
            .nestenes(4)
            .interaction_range(Some(250.0))
            .build()
            .unwrap();
        m.populate_square_listener(4).unwrap();
        m.inject_initial(Tmu(0), Position::new(150.0, 100.0), Signal::new("clap", 1.0)).unwrap();
        let summary = m.run_for(2.0, &never_stop(), &mut NoopObserver).unwrap();

        assert_eq!(of_kind(&m, ExternalKind::Detection).len(), 2);
        assert_eq!(summary.queue.internal, 0);
    }

    #[test]
    fn emissions_reach_everyone_but_the_sender() {
        let mut m = master(4, EmitOnce);
        m.populate_square(4).unwrap();
        let summary = m.run_for(2.0, &never_stop(), &mut NoopObserver).unwrap();

        let emissions = of_kind(&m, ExternalKind::Emission);
        assert_eq!(emissions.len(), 4);
        assert!(emissions.iter().all(|e| e.tmu == Tmu(0)));
        assert_eq!(of_kind(&m, ExternalKind::Detection).len(), 12);
        assert_eq!(summary.counters.events_delivered, 12);
        assert_eq!(summary.counters.events_initiated, 4);
    }

    #[test]
    fn screamers_do_not_hear_each_other() {
        let mut m = MasterBuilder::new(config()).scream_probability(1.0).build().unwrap();
        m.populate(3, 0, 0).unwrap();
        let summary = m.run(3000, &never_stop(), &mut NoopObserver).unwrap();
        assert_eq!(of_kind(&m, ExternalKind::Emission).len(), 9);
        assert_eq!(summary.counters.events_delivered, 0);
        assert_eq!(summary.queue.internal, 0);
    }

    struct Pinger {
        target: AgentId,
    }

    impl BehaviorModel for Pinger {
        fn on_query(
            &self,
            view:    &AgentView,
            memory:  &mut ScriptMemory,
            _ctx:    &StepContext<'_>,
            _rng:    &mut AgentRng,
        ) -> BehaviorResult<Vec<Action>> {
            if view.id != AgentId(0) || memory.get("sent").is_some() {
                return Ok(vec![]);
            }
            memory.set("sent", 1.0);
            Ok(vec![Action::Notify { target: self.target, delay: 5, signal: Signal::new("ping", 1.0) }])
        }

        fn on_event(
            &self,
            _view:   &AgentView,
            _memory: &mut ScriptMemory,
            event:   &InternalEvent,
            _ctx:    &StepContext<'_>,
            _rng:    &mut AgentRng,
        ) -> BehaviorResult<Vec<Action>> {
            Ok(vec![Action::detect(event.signal.clone())])
        }
    }

    #[test]
    fn notify_delivers_after_delay() {
        let mut m = master(1, Pinger { target: AgentId(1) });
        m.populate(0, 0, 2).unwrap();
        m.run(2000, &never_stop(), &mut NoopObserver).unwrap();

        let detections = of_kind(&m, ExternalKind::Detection);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].tmu, Tmu(5));
        assert_eq!(detections[0].origin, Some(AgentId(1)));
        assert_eq!(detections[0].signal.tag, "ping");
    }

    /// Agents 0 and 1 notify agent 2 once; agent 2 fails on every event.
    struct Grumpy;

    impl BehaviorModel for Grumpy {
        fn on_query(
            &self,
            view:    &AgentView,
            memory:  &mut ScriptMemory,
            _ctx:    &StepContext<'_>,
            _rng:    &mut AgentRng,
        ) -> BehaviorResult<Vec<Action>> {
            if view.id == AgentId(2) || memory.get("sent").is_some() {
                return Ok(vec![]);
            }
            memory.set("sent", 1.0);
            Ok(vec![Action::Notify { target: AgentId(2), delay: 5, signal: Signal::new("poke", 1.0) }])
        }

        fn on_event(
            &self,
            _view:   &AgentView,
            _memory: &mut ScriptMemory,
            _event:  &InternalEvent,
            _ctx:    &StepContext<'_>,
            _rng:    &mut AgentRng,
        ) -> BehaviorResult<Vec<Action>> {
            Err(BehaviorError::Script { script: "grumpy".into(), reason: "no".into() })
        }
    }

    #[test]
    fn failed_delivery_keeps_the_rest_of_the_batch() {
        let mut m = master(1, Grumpy);
        m.populate(0, 0, 3).unwrap();
        let err = m.run(2000, &never_stop(), &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Behavior { agent: AgentId(2), tmu: Tmu(5), .. }), "{err:?}");

        // The first poke failed; the second is still pending.
        let status = m.status(2000);
        assert_eq!(status.internal_queue_depth, 1);
        assert_eq!(status.micro_steps, 0);
    }

    #[test]
    fn notify_to_unknown_agent_fails() {
        let mut m = master(1, Pinger { target: AgentId(99) });
        m.populate(0, 0, 1).unwrap();
        assert!(matches!(
            m.run(2000, &never_stop(), &mut NoopObserver),
            Err(SimError::UnknownAgent(AgentId(99)))
        ));
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancel_tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::RunOutcome;

    /// Raises the stop flag after `after` macro steps.
    struct StopAfter<'a> {
        flag:  &'a AtomicBool,
        after: u64,
        seen:  u64,
    }

    impl SimObserver for StopAfter<'_> {
        fn on_macro_step(&mut self, _tmu: Tmu, _acting: usize) {
            self.seen += 1;
            if self.seen == self.after {
                self.flag.store(true, Ordering::Relaxed);
            }
        }
    }

    #[test]
    fn stop_before_start() {
        let mut m = master(2, Tally);
        m.populate(0, 0, 4).unwrap();
        let summary = m.run_for(1.0, &AtomicBool::new(true), &mut NoopObserver).unwrap();
        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert_eq!(summary.final_tmu, Tmu(0));
        assert_eq!(summary.counters.macro_steps, 0);
        assert_eq!(m.external_events().count(), 0);
    }

    #[test]
    fn stop_mid_run_leaves_consistent_state() {
        let mut m = master(4, Tally);
        m.populate(0, 0, 12).unwrap();
        let flag = AtomicBool::new(false);
        let mut obs = StopAfter { flag: &flag, after: 37, seen: 0 };
        let summary = m.run_for(1.0, &flag, &mut obs).unwrap();

        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert_eq!(summary.counters.macro_steps, 37);
        assert!(summary.final_tmu < Tmu(1_000_000));

        let mut per_agent: BTreeMap<AgentId, u64> = BTreeMap::new();
        for e in m.external_events() {
            if let Some(origin) = e.origin {
                *per_agent.entry(origin).or_default() += 1;
            }
        }
        assert_eq!(per_agent.len(), 12);
        assert!(per_agent.values().all(|&n| n == 37));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use crate::next_tick;
    use crate::partition::Partition;
    use auton_core::{Position, Tmu};

    proptest! {
        #[test]
        fn next_tick_bounds(
            current in 0u64..1_000_000,
            macro_gap in 1u64..5_000,
            internal_gap in proptest::option::of(1u64..5_000),
            extra in 0u64..10_000,
        ) {
            let iterations = current + 1 + extra;
            let next_macro = Tmu(current + macro_gap);
            let next_internal = internal_gap.map(|g| Tmu(current + g));
            let t = next_tick(Tmu(current), next_macro, next_internal, iterations);

            prop_assert!(t > Tmu(current));
            prop_assert!(t <= Tmu(iterations));
            prop_assert!(t <= next_macro);
            if let Some(i) = next_internal {
                prop_assert!(t <= i);
            }
        }

        #[test]
        fn every_point_in_exactly_one_cell(
            count in 1u32..24,
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
        ) {
            let p = Partition::new(600.0, 400.0, count).unwrap();
            let pt = Position::new(fx * 600.0, fy * 400.0);
            let owners = p.cells().iter().filter(|c| c.contains(pt)).count();
            prop_assert_eq!(owners, 1);
            let idx = p.locate(pt).unwrap();
            prop_assert!(p.cells()[idx].contains(pt));
        }
    }
}
