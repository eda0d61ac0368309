/*!
 * Simulation Configuration
 * Tunable parameters with defaults, presets, validation and JSON loading
 */

use super::errors::{SimError, SimResult};
use super::limits::*;
use super::types::Millis;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimConfig {
    pub name: String,
    pub num_cpus: usize,
    pub num_processes_at_startup: usize,
    /// Number of process slots; fixed for the lifetime of a simulation
    pub max_processes: usize,
    pub num_ram_rows: usize,
    pub new_process_probability: f64,
    pub io_probability: f64,
    pub graceful_termination_probability: f64,
    pub page_growth_probability: f64,
    pub starvation_interval_ms: Millis,
    pub unstarve_ms: Millis,
    pub io_duration_ms: Millis,
    pub io_cooldown_ms: Millis,
    pub event_check_interval_ms: Millis,
    pub blink_interval_ms: Millis,
    pub max_pages_per_process: usize,
    pub last_alive_starvation_level: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            num_cpus: DEFAULT_NUM_CPUS,
            num_processes_at_startup: DEFAULT_PROCESSES_AT_STARTUP,
            max_processes: DEFAULT_MAX_PROCESSES,
            num_ram_rows: DEFAULT_RAM_ROWS,
            new_process_probability: DEFAULT_NEW_PROCESS_PROBABILITY,
            io_probability: DEFAULT_IO_PROBABILITY,
            graceful_termination_probability: DEFAULT_GRACEFUL_TERMINATION_PROBABILITY,
            page_growth_probability: DEFAULT_PAGE_GROWTH_PROBABILITY,
            starvation_interval_ms: DEFAULT_STARVATION_INTERVAL,
            unstarve_ms: DEFAULT_UNSTARVE_DURATION,
            io_duration_ms: DEFAULT_IO_DURATION,
            io_cooldown_ms: DEFAULT_IO_COOLDOWN,
            event_check_interval_ms: DEFAULT_EVENT_CHECK_INTERVAL,
            blink_interval_ms: DEFAULT_BLINK_INTERVAL,
            max_pages_per_process: MAX_PAGES_PER_PROCESS,
            last_alive_starvation_level: LAST_ALIVE_STARVATION_LEVEL,
        }
    }
}

impl SimConfig {
    /// Load from a JSON document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), name = %config.name, "Configuration loaded");
        Ok(config)
    }

    /// Terminal starvation sentinel
    #[inline]
    pub fn dead_starvation_level(&self) -> u8 {
        self.last_alive_starvation_level + 1
    }

    /// Page capacity of RAM
    #[inline]
    pub fn ram_capacity(&self) -> usize {
        self.num_ram_rows * PAGES_PER_RAM_ROW
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.num_cpus == 0 {
            return Err(SimError::Configuration("num_cpus must be at least 1".into()));
        }
        if self.max_processes == 0 {
            return Err(SimError::Configuration(
                "max_processes must be at least 1".into(),
            ));
        }
        if self.num_processes_at_startup > self.max_processes {
            return Err(SimError::Configuration(format!(
                "num_processes_at_startup ({}) exceeds max_processes ({})",
                self.num_processes_at_startup, self.max_processes
            )));
        }
        if self.max_pages_per_process == 0 || self.max_pages_per_process > u8::MAX as usize {
            return Err(SimError::Configuration(format!(
                "max_pages_per_process must be in 1..=255, got {}",
                self.max_pages_per_process
            )));
        }
        if self.last_alive_starvation_level == 0 || self.last_alive_starvation_level == u8::MAX {
            return Err(SimError::Configuration(format!(
                "last_alive_starvation_level must be in 1..=254, got {}",
                self.last_alive_starvation_level
            )));
        }
        if self.starvation_interval_ms == 0 || self.unstarve_ms == 0 {
            return Err(SimError::Configuration(
                "starvation_interval_ms and unstarve_ms must be positive".into(),
            ));
        }
        for (name, p) in [
            ("new_process_probability", self.new_process_probability),
            ("io_probability", self.io_probability),
            (
                "graceful_termination_probability",
                self.graceful_termination_probability,
            ),
            ("page_growth_probability", self.page_growth_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_num_cpus(mut self, num_cpus: usize) -> Self {
        self.num_cpus = num_cpus;
        self
    }

    #[must_use]
    pub fn with_processes_at_startup(mut self, count: usize) -> Self {
        self.num_processes_at_startup = count;
        self
    }

    #[must_use]
    pub fn with_max_processes(mut self, count: usize) -> Self {
        self.max_processes = count;
        self
    }

    #[must_use]
    pub fn with_ram_rows(mut self, rows: usize) -> Self {
        self.num_ram_rows = rows;
        self
    }

    #[must_use]
    pub fn with_new_process_probability(mut self, p: f64) -> Self {
        self.new_process_probability = p;
        self
    }

    #[must_use]
    pub fn with_io_probability(mut self, p: f64) -> Self {
        self.io_probability = p;
        self
    }

    #[must_use]
    pub fn with_graceful_termination_probability(mut self, p: f64) -> Self {
        self.graceful_termination_probability = p;
        self
    }

    #[must_use]
    pub fn with_page_growth_probability(mut self, p: f64) -> Self {
        self.page_growth_probability = p;
        self
    }

    #[must_use]
    pub fn with_io_timing(mut self, duration_ms: Millis, cooldown_ms: Millis) -> Self {
        self.io_duration_ms = duration_ms;
        self.io_cooldown_ms = cooldown_ms;
        self
    }

    #[must_use]
    pub fn with_starvation_timing(mut self, interval_ms: Millis, unstarve_ms: Millis) -> Self {
        self.starvation_interval_ms = interval_ms;
        self.unstarve_ms = unstarve_ms;
        self
    }
}

/// Built-in configuration presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" | "default" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("Invalid difficulty '{}'. Valid: easy, normal, hard", s)),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    pub fn config(&self) -> SimConfig {
        let base = SimConfig::default().with_name(self.as_str());
        match self {
            Self::Easy => base
                .with_num_cpus(8)
                .with_processes_at_startup(10)
                .with_ram_rows(10)
                .with_new_process_probability(0.02)
                .with_io_probability(0.005),
            Self::Normal => base,
            Self::Hard => base
                .with_num_cpus(2)
                .with_processes_at_startup(20)
                .with_ram_rows(6)
                .with_new_process_probability(0.1)
                .with_io_probability(0.02),
        }
    }
}
