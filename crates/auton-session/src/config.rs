//! `EnvironmentConfig`: everything needed to generate one environment.
//!
//! Loaded from TOML with every field optional:
//!
//! ```toml
//! width     = 600.0
//! height    = 400.0
//! nestenes  = 4
//! scripted  = 12
//! script    = "chorus"
//! layout    = "square"
//! seed      = 7
//! ```

use std::fmt;
use std::path::Path;

use auton_agent::factory::DEFAULT_SCREAM_PROBABILITY;
use auton_core::SimConfig;
use auton_sim::master::DEFAULT_PROPAGATION_SPEED;
use auton_sim::partition::MAX_NESTENES;
use serde::{Deserialize, Serialize};

use crate::{SessionError, SessionResult};

// ── Layout ────────────────────────────────────────────────────────────────────

/// How agents are placed when an environment is generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Screamers, listeners and scripted agents spread evenly over the
    /// Nestenes, each at a random position inside its cell.
    #[default]
    Scattered,
    /// `scripted` agents on a square lattice over the whole area.
    Square,
    /// `listeners` on a square lattice over the whole area.
    SquareListener,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Scattered      => "scattered",
            Layout::Square         => "square",
            Layout::SquareListener => "square-listener",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EnvironmentConfig ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Area extent in metres.
    pub width:              f64,
    pub height:             f64,
    /// Number of Nestenes the area is partitioned into.
    pub nestenes:           u32,
    pub screamers:          u32,
    pub listeners:          u32,
    pub scripted:           u32,
    /// Seconds per tick.
    pub time_resolution:    f64,
    /// Ticks per macro step.
    pub macro_factor:       u64,
    /// Registry name of the behavior driving scripted agents.
    pub script:             String,
    pub layout:             Layout,
    pub seed:               u64,
    /// Metres per second.
    pub propagation_speed:  f64,
    /// Maximum broadcast distance; `None` reaches the whole area.
    pub interaction_range:  Option<f64>,
    pub scream_probability: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            width:              600.0,
            height:             400.0,
            nestenes:           4,
            screamers:          0,
            listeners:          0,
            scripted:           0,
            time_resolution:    0.000_001,
            macro_factor:       1000,
            script:             "chorus".into(),
            layout:             Layout::Scattered,
            seed:               42,
            propagation_speed:  DEFAULT_PROPAGATION_SPEED,
            interaction_range:  None,
            scream_probability: DEFAULT_SCREAM_PROBABILITY,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_toml_str(s: &str) -> SessionResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_toml(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "environment config loaded");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> SessionResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// The clock and RNG part of the configuration.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            width:           self.width,
            height:          self.height,
            time_resolution: self.time_resolution,
            macro_factor:    self.macro_factor,
            seed:            self.seed,
        }
    }

    /// Agents the configured layout will place.
    pub fn population(&self) -> u64 {
        match self.layout {
            Layout::Scattered => {
                u64::from(self.screamers) + u64::from(self.listeners) + u64::from(self.scripted)
            }
            Layout::Square         => u64::from(self.scripted),
            Layout::SquareListener => u64::from(self.listeners),
        }
    }

    /// Whether generation needs the configured script.
    pub fn needs_script(&self) -> bool {
        match self.layout {
            Layout::Scattered | Layout::Square => self.scripted > 0,
            Layout::SquareListener             => false,
        }
    }

    /// Check the parameters that are not re-checked by the Master builder.
    pub fn validate(&self) -> SessionResult<()> {
        self.sim_config()
            .validate()
            .map_err(|e| SessionError::Config(e.to_string()))?;
        if self.nestenes == 0 {
            return Err(SessionError::Config("nestenes must be at least 1".into()));
        }
        if self.nestenes > MAX_NESTENES {
            return Err(SessionError::Config(format!(
                "nestenes must be at most {MAX_NESTENES}, got {}",
                self.nestenes
            )));
        }
        if !(0.0..=1.0).contains(&self.scream_probability) {
            return Err(SessionError::Config(format!(
                "scream_probability must lie in [0, 1], got {}",
                self.scream_probability
            )));
        }
        if self.needs_script() && self.script.trim().is_empty() {
            return Err(SessionError::Config("scripted agents need a script name".into()));
        }
        Ok(())
    }
}
