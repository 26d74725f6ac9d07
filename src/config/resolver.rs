//! Precedence resolution for garden configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Session config.kdl (`~/.local/share/plotkeeper/<path-hash>/config.kdl`)
//! 3. System config.kdl (`~/.config/plotkeeper/config.kdl`)
//! 4. Built-in defaults

use crate::Result;
use crate::config::{GardenConfig, OutputFormat};
use crate::registry::DEFAULT_HARVEST_WINDOW_DAYS;
use crate::storage::Storage;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from session-level config
    Session,
    /// Value from system-level config
    System,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Session => write!(f, "session"),
            ValueSource::System => write!(f, "system"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub output_format: Resolved<OutputFormat>,
    pub harvest_window: Resolved<u32>,
    pub action_log: Resolved<bool>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            harvest_window: Resolved::new(DEFAULT_HARVEST_WINDOW_DAYS as u32, ValueSource::Default),
            action_log: Resolved::new(true, ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn harvest_window(&self) -> u32 {
        self.harvest_window.value
    }

    pub fn action_log_enabled(&self) -> bool {
        self.action_log.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_format: Option<OutputFormat>,
    pub harvest_window: Option<u32>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_harvest_window(mut self, days: u32) -> Self {
        self.harvest_window = Some(days);
        self
    }
}

/// Resolve configuration for an opened garden.
pub fn resolve_config(storage: &Storage, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let system = Storage::read_system_garden_config()?;
    let session = storage.read_garden_config()?;
    Ok(resolve_layers(overrides, Some(&session), &system))
}

/// Resolve configuration when no garden exists yet (e.g., before `pk init`).
pub fn resolve_config_without_session(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let system = Storage::read_system_garden_config()?;
    Ok(resolve_layers(overrides, None, &system))
}

fn resolve_layers(
    overrides: &ConfigOverrides,
    session: Option<&GardenConfig>,
    system: &GardenConfig,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    if let Some(v) = pick(
        overrides.output_format,
        session.and_then(|s| s.output_format),
        system.output_format,
    ) {
        result.output_format = v;
    }

    if let Some(v) = pick(
        overrides.harvest_window,
        session.and_then(|s| s.harvest_window),
        system.harvest_window,
    ) {
        result.harvest_window = v;
    }

    if let Some(v) = pick(None, session.and_then(|s| s.action_log), system.action_log) {
        result.action_log = v;
    }

    result
}

fn pick<T>(cli: Option<T>, session: Option<T>, system: Option<T>) -> Option<Resolved<T>> {
    cli.map(|v| Resolved::new(v, ValueSource::CliFlag))
        .or_else(|| session.map(|v| Resolved::new(v, ValueSource::Session)))
        .or_else(|| system.map(|v| Resolved::new(v, ValueSource::System)))
}
