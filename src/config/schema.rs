//! KDL schema for config.kdl.
//!
//! # KDL Schema
//!
//! ```kdl
//! // Garden preferences
//! output-format "human"  // or "json"
//! harvest-window 14      // days ahead for `pk harvests`
//! action-log #false      // disable the JSONL audit trail
//! ```

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Keys accepted by `pk config get/set`.
pub const CONFIG_KEYS: &[&str] = &["output-format", "harvest-window", "action-log"];

/// Upper bound for `harvest-window`, roughly ten years.
pub const MAX_HARVEST_WINDOW: u32 = 3650;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preferences stored in config.kdl. Unset values fall through to the next
/// layer during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Days ahead `pk harvests` looks when `--days` is not given
    pub harvest_window: Option<u32>,

    /// Whether CLI invocations are appended to action.log
    pub action_log: Option<bool>,
}

impl GardenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(window) = self.harvest_window {
            if window > MAX_HARVEST_WINDOW {
                return Err(format!(
                    "harvest-window must be 0-{}, got {}",
                    MAX_HARVEST_WINDOW, window
                ));
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown keys and ill-typed values are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(value) = first_value(doc, "output-format") {
            if let Some(s) = value.as_string() {
                config.output_format = OutputFormat::parse(s);
            }
        }

        if let Some(value) = first_value(doc, "harvest-window") {
            if let Some(i) = value.as_integer() {
                if (0..=i128::from(MAX_HARVEST_WINDOW)).contains(&i) {
                    config.harvest_window = Some(i as u32);
                }
            }
        }

        if let Some(value) = first_value(doc, "action-log") {
            config.action_log = value.as_bool();
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(format) = self.output_format {
            push_node(&mut doc, "output-format", KdlValue::String(format.as_str().to_string()));
        }
        if let Some(window) = self.harvest_window {
            push_node(&mut doc, "harvest-window", KdlValue::Integer(i128::from(window)));
        }
        if let Some(enabled) = self.action_log {
            push_node(&mut doc, "action-log", KdlValue::Bool(enabled));
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &GardenConfig) {
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.harvest_window.is_some() {
            self.harvest_window = other.harvest_window;
        }
        if other.action_log.is_some() {
            self.action_log = other.action_log;
        }
    }

    /// Read a single key as a display string.
    pub fn get(&self, key: &str) -> Result<Option<String>, String> {
        match key {
            "output-format" => Ok(self.output_format.map(|f| f.as_str().to_string())),
            "harvest-window" => Ok(self.harvest_window.map(|w| w.to_string())),
            "action-log" => Ok(self.action_log.map(|b| b.to_string())),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a single key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "output-format" => {
                let format = OutputFormat::parse(value).ok_or_else(|| {
                    format!("output-format must be \"json\" or \"human\", got {}", value)
                })?;
                self.output_format = Some(format);
            }
            "harvest-window" => {
                let window = value.parse::<u32>().map_err(|_| {
                    format!("harvest-window must be a non-negative integer, got {}", value)
                })?;
                self.harvest_window = Some(window);
            }
            "action-log" => {
                self.action_log = Some(parse_bool(value).ok_or_else(|| {
                    format!("action-log must be true or false, got {}", value)
                })?);
            }
            _ => return Err(unknown_key(key)),
        }
        self.validate()
    }
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn push_node(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    )
}
