//! Configuration for Plotkeeper.
//!
//! Preferences live in `config.kdl` files at two levels:
//! - System: `~/.config/plotkeeper/config.kdl`
//! - Session: `~/.local/share/plotkeeper/<path-hash>/config.kdl`
//!
//! Contains:
//! - `output-format` - "json" or "human"
//! - `harvest-window` - default look-ahead for `pk harvests`, in days
//! - `action-log` - whether CLI invocations are recorded
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config,
    resolve_config_without_session,
};
pub use schema::{CONFIG_KEYS, GardenConfig, MAX_HARVEST_WINDOW, OutputFormat};
