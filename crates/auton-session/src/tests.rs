//! Unit tests for auton-session.

use auton_sim::NoopObserver;

use crate::{EnvironmentConfig, Layout, Session};

fn scattered(scripted: u32) -> EnvironmentConfig {
    EnvironmentConfig {
        width:    600.0,
        height:   400.0,
        nestenes: 4,
        scripted,
        seed:     11,
        ..Default::default()
    }
}

fn ready(config: &EnvironmentConfig) -> Session {
    let mut s = Session::new();
    s.generate_environment(config).unwrap();
    s
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use crate::{EnvironmentConfig, Layout, SessionError};

    #[test]
    fn defaults() {
        let c = EnvironmentConfig::default();
        assert_eq!(c.width, 600.0);
        assert_eq!(c.height, 400.0);
        assert_eq!(c.time_resolution, 1e-6);
        assert_eq!(c.macro_factor, 1000);
        assert_eq!(c.script, "chorus");
        assert_eq!(c.layout, Layout::Scattered);
        assert_eq!(c.propagation_speed, 343.0);
        assert!(c.interaction_range.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = EnvironmentConfig::from_toml_str(
            "listeners = 9\nlayout = \"square-listener\"\ninteraction_range = 50.0\n",
        )
        .unwrap();
        assert_eq!(c.listeners, 9);
        assert_eq!(c.layout, Layout::SquareListener);
        assert_eq!(c.interaction_range, Some(50.0));
        assert_eq!(c.width, 600.0);
        assert_eq!(c.script, "chorus");
    }

    #[test]
    fn unknown_key_rejected() {
        let err = EnvironmentConfig::from_toml_str("colour = \"green\"\n").unwrap_err();
        assert!(matches!(err, SessionError::Toml(_)), "{err:?}");
    }

    #[test]
    fn bad_layout_rejected() {
        let err = EnvironmentConfig::from_toml_str("layout = \"hexagonal\"\n").unwrap_err();
        assert!(matches!(err, SessionError::Toml(_)), "{err:?}");
    }

    #[test]
    fn invalid_values_rejected() {
        for text in [
            "width = -1.0\n",
            "time_resolution = 0.0\n",
            "macro_factor = 0\n",
            "nestenes = 0\n",
            "nestenes = 4000000000\n",
            "scream_probability = 1.5\n",
            "scripted = 3\nscript = \"  \"\n",
        ] {
            let err = EnvironmentConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, SessionError::Config(_)), "{text}: {err:?}");
        }
    }

    #[test]
    fn empty_script_fine_without_scripted_agents() {
        let c = EnvironmentConfig::from_toml_str("script = \"\"\nlisteners = 4\n").unwrap();
        assert!(!c.needs_script());
    }

    #[test]
    fn population_follows_layout() {
        let mut c = EnvironmentConfig { screamers: 2, listeners: 3, scripted: 4, ..Default::default() };
        assert_eq!(c.population(), 9);
        c.layout = Layout::Square;
        assert_eq!(c.population(), 4);
        assert!(c.needs_script());
        c.layout = Layout::SquareListener;
        assert_eq!(c.population(), 3);
        assert!(!c.needs_script());
    }

    #[test]
    fn serialized_config_reloads() {
        let c = EnvironmentConfig {
            scripted: 5,
            layout: Layout::Square,
            interaction_range: Some(120.0),
            seed: 99,
            ..Default::default()
        };
        let text = c.to_toml_string().unwrap();
        assert!(text.contains("layout = \"square\""), "{text}");
        assert_eq!(EnvironmentConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 100.0\nheight = 50.0\nscreamers = 2").unwrap();
        let c = EnvironmentConfig::load_toml(file.path()).unwrap();
        assert_eq!((c.width, c.height, c.screamers), (100.0, 50.0, 2));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EnvironmentConfig::load_toml(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SessionError::Io(_)), "{err:?}");
    }

    #[test]
    fn sim_config_carries_clock_fields() {
        let c = EnvironmentConfig { width: 10.0, height: 20.0, seed: 3, ..Default::default() };
        let s = c.sim_config();
        assert_eq!((s.width, s.height, s.seed), (10.0, 20.0, 3));
        assert_eq!(s.macro_factor, 1000);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use auton_events::ExternalKind;
    use auton_sim::RunOutcome;

    use super::{NoopObserver, ready, scattered};
    use crate::{Phase, Session, SessionError};

    #[test]
    fn generate_run_export() {
        let mut s = ready(&scattered(2));
        assert_eq!(s.phase(), Phase::Ready);
        assert!(s.status().is_none());

        let positions = s.retrieve_positions().unwrap();
        assert_eq!(positions.scripted.len(), 2);
        assert_eq!((positions.width, positions.height), (600.0, 400.0));

        s.run_simulation(0.01, Box::new(NoopObserver)).unwrap();
        let summary = s.wait().unwrap();
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(summary.outcome, RunOutcome::Completed);
        assert_eq!(summary.counters.macro_steps, 10);
        assert_eq!(s.last_summary(), Some(&summary));

        let status = s.status().expect("final status is always published");
        assert_eq!(status.percent_complete, 100.0);

        let dir = tempfile::tempdir().unwrap();
        let rows = s.export_external_events(dir.path()).unwrap();
        assert_eq!(rows, s.master().unwrap().external_events().count());
        assert!(dir.path().join(auton_output::EVENTS_FILE).exists());
    }

    #[test]
    fn second_generation_rejected_in_every_phase() {
        let config = scattered(1);
        let mut s = ready(&config);
        assert!(matches!(s.generate_environment(&config), Err(SessionError::AlreadyGenerated)));

        s.run_simulation(0.001, Box::new(NoopObserver)).unwrap();
        assert!(matches!(s.generate_environment(&config), Err(SessionError::AlreadyGenerated)));
        s.wait().unwrap();
        assert!(matches!(s.generate_environment(&config), Err(SessionError::AlreadyGenerated)));
    }

    #[test]
    fn nothing_works_without_environment() {
        let mut s = Session::new();
        assert_eq!(s.phase(), Phase::Empty);
        assert!(matches!(
            s.run_simulation(1.0, Box::new(NoopObserver)),
            Err(SessionError::NoEnvironment)
        ));
        assert!(matches!(s.retrieve_positions(), Err(SessionError::NoEnvironment)));
        assert!(matches!(s.inject_initial_events(&[]), Err(SessionError::NoEnvironment)));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(s.export_external_events(dir.path()), Err(SessionError::NoEnvironment)));
        assert!(matches!(s.wait(), Err(SessionError::NotRunning)));
    }

    #[test]
    fn export_needs_a_finished_run() {
        let s = ready(&scattered(1));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(s.export_external_events(dir.path()), Err(SessionError::NoCompletedRun)));
    }

    #[test]
    fn finished_environment_is_spent() {
        let mut s = ready(&scattered(1));
        s.run_simulation(0.001, Box::new(NoopObserver)).unwrap();
        s.wait().unwrap();
        assert!(matches!(
            s.run_simulation(0.001, Box::new(NoopObserver)),
            Err(SessionError::EnvironmentSpent)
        ));
        assert!(matches!(s.inject_initial_events(&[]), Err(SessionError::EnvironmentSpent)));
        // Positions stay available after the run.
        assert_eq!(s.retrieve_positions().unwrap().scripted.len(), 1);
    }

    #[test]
    fn teardown_allows_regeneration() {
        use auton_core::{Position, Tmu};
        use auton_events::{InitialEvent, Signal};

        let config = scattered(3);
        let mut s = ready(&config);
        let clap = InitialEvent { tmu: Tmu(0), position: Position::new(1.0, 1.0), signal: Signal::new("clap", 1.0) };
        s.inject_initial_events(&[clap]).unwrap();
        s.run_simulation(0.001, Box::new(NoopObserver)).unwrap();
        s.wait().unwrap();
        assert!(s.master().unwrap().ids().events_issued() > 0);

        s.teardown();
        assert_eq!(s.phase(), Phase::Empty);
        assert!(s.master().is_none());
        assert!(s.config().is_none());
        assert!(s.last_summary().is_none());
        assert!(s.status().is_none());

        s.generate_environment(&config).unwrap();
        assert_eq!(s.phase(), Phase::Ready);
        let ids = s.master().unwrap().ids();
        assert_eq!(ids.agents_issued(), 3);
        assert_eq!(ids.events_issued(), 0);
    }

    #[test]
    fn unknown_script_leaves_session_empty() {
        let mut s = Session::new();
        let config = crate::EnvironmentConfig { script: "frog".into(), ..scattered(2) };
        let err = s.generate_environment(&config).unwrap_err();
        assert!(matches!(err, SessionError::UnknownBehavior(ref name) if name == "frog"), "{err:?}");
        assert_eq!(s.phase(), Phase::Empty);
    }

    #[test]
    fn listener_lattice_ignores_script() {
        let mut s = Session::new();
        let config = crate::EnvironmentConfig {
            script: "frog".into(),
            listeners: 9,
            layout: crate::Layout::SquareListener,
            ..Default::default()
        };
        s.generate_environment(&config).unwrap();
        assert_eq!(s.retrieve_positions().unwrap().listeners.len(), 9);
    }

    #[test]
    fn square_layout_places_scripted_agents() {
        let config = crate::EnvironmentConfig {
            scripted: 4,
            layout: crate::Layout::Square,
            ..Default::default()
        };
        let s = ready(&config);
        let p = s.retrieve_positions().unwrap();
        assert_eq!(p.scripted.len(), 4);
        assert!(p.listeners.is_empty() && p.screamers.is_empty());
    }

    #[test]
    fn injected_events_reach_the_log() {
        use auton_core::{Position, Tmu};
        use auton_events::{InitialEvent, Signal};

        let mut s = ready(&crate::EnvironmentConfig { listeners: 4, ..Default::default() });
        let events = [
            InitialEvent { tmu: Tmu(5), position: Position::new(10.0, 10.0), signal: Signal::new("clap", 1.0) },
            InitialEvent { tmu: Tmu(900), position: Position::new(500.0, 300.0), signal: Signal::new("clap", 2.0) },
        ];
        assert_eq!(s.inject_initial_events(&events).unwrap(), 2);
        // Long enough for sound to cross the 600 x 400 area.
        s.run_simulation(3.0, Box::new(NoopObserver)).unwrap();
        s.wait().unwrap();

        let master = s.master().unwrap();
        let inits = master
            .external_events()
            .filter(|e| e.kind == ExternalKind::Initialization)
            .count();
        assert_eq!(inits, 2);
        assert!(master.external_events().any(|e| e.kind == ExternalKind::Detection));
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod worker_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use auton_agent::{Action, AgentView, BehaviorError, BehaviorModel, BehaviorResult, ScriptMemory, StepContext};
    use auton_core::AgentRng;
    use auton_sim::{RunOutcome, RunSummary, SimError, SimObserver, StatusSnapshot};

    use super::{NoopObserver, ready, scattered};
    use crate::{EnvironmentConfig, Phase, Session, SessionError, WORKER_NAME};

    #[derive(Default)]
    struct Probe {
        thread:   Arc<Mutex<Option<String>>>,
        statuses: Arc<AtomicUsize>,
        ended:    Arc<AtomicUsize>,
    }

    impl SimObserver for Probe {
        fn on_run_start(&mut self, _iterations: u64) {
            let name = std::thread::current().name().map(str::to_owned);
            *self.thread.lock().unwrap() = name;
        }

        fn on_status(&mut self, _status: &StatusSnapshot) {
            self.statuses.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_end(&mut self, _summary: &RunSummary) {
            self.ended.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn observer_runs_on_named_worker() {
        let probe = Probe::default();
        let (thread, statuses, ended) =
            (Arc::clone(&probe.thread), Arc::clone(&probe.statuses), Arc::clone(&probe.ended));

        let mut s = ready(&scattered(2));
        s.run_simulation(0.005, Box::new(probe)).unwrap();
        s.wait().unwrap();

        assert_eq!(thread.lock().unwrap().as_deref(), Some(WORKER_NAME));
        assert!(statuses.load(Ordering::SeqCst) >= 1);
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_cancels_a_long_run() {
        // A million simulated seconds would take far longer than the test.
        let mut s = ready(&scattered(1));
        s.run_simulation(1.0e6, Box::new(NoopObserver)).unwrap();
        assert_eq!(s.phase(), Phase::Running);

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(s.retrieve_positions(), Err(SessionError::RunInProgress)));
        assert!(matches!(s.export_external_events(dir.path()), Err(SessionError::RunInProgress)));
        assert!(matches!(s.inject_initial_events(&[]), Err(SessionError::RunInProgress)));
        assert!(matches!(
            s.run_simulation(1.0, Box::new(NoopObserver)),
            Err(SessionError::RunInProgress)
        ));

        s.request_stop();
        let summary = s.wait().unwrap();
        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert!(summary.final_tmu.0 < summary.iterations);
        assert_eq!(s.phase(), Phase::Finished);
        assert!(!s.is_running());

        // A cancelled run is still exportable.
        assert!(s.export_external_events(dir.path()).is_ok());
    }

    #[test]
    fn teardown_stops_a_running_worker() {
        let mut s = ready(&scattered(1));
        s.run_simulation(1.0e6, Box::new(NoopObserver)).unwrap();
        s.teardown();
        assert_eq!(s.phase(), Phase::Empty);
        assert!(!s.is_running());
    }

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

    #[test]
    fn behavior_failure_surfaces_as_run_failed() {
        let mut s = Session::new();
        s.registry_mut().register("broken", Broken);
        let config = EnvironmentConfig { script: "broken".into(), ..scattered(1) };
        s.generate_environment(&config).unwrap();
        s.run_simulation(0.01, Box::new(NoopObserver)).unwrap();

        let err = s.wait().unwrap_err();
        assert!(matches!(err, SessionError::RunFailed(SimError::Behavior { .. })), "{err:?}");
        assert_eq!(s.phase(), Phase::Finished);
        assert!(s.master().is_some());
        assert!(s.last_summary().is_none());
    }

    #[test]
    fn negative_duration_rejected() {
        let mut s = ready(&scattered(1));
        assert!(matches!(
            s.run_simulation(-1.0, Box::new(NoopObserver)),
            Err(SessionError::Config(_))
        ));
        assert_eq!(s.phase(), Phase::Ready);
    }
}

#[test]
fn layout_names() {
    assert_eq!(Layout::SquareListener.to_string(), "square-listener");
    assert_eq!(Layout::default(), Layout::Scattered);
}
